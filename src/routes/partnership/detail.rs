use crate::lifecycle::TimelineEvent;
use crate::review::{PartnershipView, ReviewService, TimelineTarget};
use crate::types::response::{ApiResponse, ApiResult};
use actix_web::{get, web};
use std::sync::Arc;
use uuid::Uuid;

#[get("/{id}")]
pub async fn detail(
    _req: actix_web::HttpRequest,
    review: web::Data<Arc<ReviewService>>,
    path: web::Path<Uuid>,
) -> ApiResult<PartnershipView> {
    Ok(ApiResponse::Ok(review.partnership_detail(path.into_inner()).await?))
}

#[get("/{id}/timeline")]
pub async fn timeline(
    _req: actix_web::HttpRequest,
    review: web::Data<Arc<ReviewService>>,
    path: web::Path<Uuid>,
) -> ApiResult<Vec<TimelineEvent>> {
    let events = review.timeline(TimelineTarget::Partnership(path.into_inner())).await?;
    Ok(ApiResponse::Ok(events))
}
