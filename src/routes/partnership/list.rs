use crate::review::{PartnershipView, ReviewService};
use crate::types::partnership::PartnershipQuery;
use crate::types::response::{ApiResponse, ApiResult, Page};
use actix_web::{get, web};
use std::sync::Arc;

#[get("/dissolved")]
pub async fn list_dissolved(
    _req: actix_web::HttpRequest,
    review: web::Data<Arc<ReviewService>>,
    query: web::Query<PartnershipQuery>,
) -> ApiResult<Page<PartnershipView>> {
    Ok(ApiResponse::Ok(review.list_dissolved_partnerships(&query).await?))
}
