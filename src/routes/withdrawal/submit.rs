use crate::lifecycle::LifecycleEngine;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::withdrawal::RWithdrawalSubmit;
use actix_web::{post, web};
use entity::withdrawal_request::Model as RequestModel;
use std::sync::Arc;

/// A player asks to leave their partnership. Stays PENDING until an admin decides.
#[post("")]
pub async fn submit(
    _req: actix_web::HttpRequest,
    engine: web::Data<Arc<LifecycleEngine>>,
    data: web::Json<RWithdrawalSubmit>,
) -> ApiResult<RequestModel> {
    let request = engine
        .submit_withdrawal(data.partnership_id, data.requesting_user_id, &data.reason)
        .await?;
    Ok(ApiResponse::Created(request))
}
