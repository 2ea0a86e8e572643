use crate::lifecycle::LifecycleEngine;
use crate::types::partnership::RPartnershipComplete;
use crate::types::response::{ApiResponse, ApiResult};
use actix_web::{post, web};
use entity::partnership::Model as PartnershipModel;
use std::sync::Arc;
use uuid::Uuid;

#[post("/{id}/partner")]
pub async fn complete(
    _req: actix_web::HttpRequest,
    engine: web::Data<Arc<LifecycleEngine>>,
    path: web::Path<Uuid>,
    data: web::Json<RPartnershipComplete>,
) -> ApiResult<PartnershipModel> {
    let team = engine.complete_partnership(path.into_inner(), data.partner_id).await?;
    Ok(ApiResponse::Ok(team))
}
