use crate::lifecycle::LifecycleEngine;
use crate::types::partnership::RPartnershipRegister;
use crate::types::response::{ApiResponse, ApiResult};
use actix_web::{post, web};
use entity::partnership::Model as PartnershipModel;
use std::sync::Arc;

#[post("")]
pub async fn register(
    _req: actix_web::HttpRequest,
    engine: web::Data<Arc<LifecycleEngine>>,
    data: web::Json<RPartnershipRegister>,
) -> ApiResult<PartnershipModel> {
    let team = engine
        .register_partnership(data.captain_id, data.partner_id, data.division_id, data.season_id)
        .await?;
    Ok(ApiResponse::Created(team))
}
