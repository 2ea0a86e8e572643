use crate::lifecycle::{ApprovalOutcome, LifecycleEngine};
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::withdrawal::RWithdrawalDecision;
use actix_web::{post, web};
use entity::withdrawal_request::Model as RequestModel;
use std::sync::Arc;
use uuid::Uuid;

// A lost race comes back as 409 INVALID_STATE; the dashboard re-reads instead of retrying.

#[post("/{id}/approve")]
pub async fn approve(
    _req: actix_web::HttpRequest,
    engine: web::Data<Arc<LifecycleEngine>>,
    path: web::Path<Uuid>,
    data: web::Json<RWithdrawalDecision>,
) -> ApiResult<ApprovalOutcome> {
    let outcome = engine
        .approve_withdrawal(path.into_inner(), data.admin_id, data.notes.as_deref())
        .await?;
    Ok(ApiResponse::Ok(outcome))
}

#[post("/{id}/reject")]
pub async fn reject(
    _req: actix_web::HttpRequest,
    engine: web::Data<Arc<LifecycleEngine>>,
    path: web::Path<Uuid>,
    data: web::Json<RWithdrawalDecision>,
) -> ApiResult<RequestModel> {
    let request = engine
        .reject_withdrawal(path.into_inner(), data.admin_id, data.notes.as_deref())
        .await?;
    Ok(ApiResponse::Ok(request))
}
