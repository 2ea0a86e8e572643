use crate::review::{ReviewService, WithdrawalView};
use crate::types::response::{ApiResponse, ApiResult, Page};
use crate::types::withdrawal::WithdrawalQuery;
use actix_web::{get, web};
use std::sync::Arc;

#[get("")]
pub async fn list(
    _req: actix_web::HttpRequest,
    review: web::Data<Arc<ReviewService>>,
    query: web::Query<WithdrawalQuery>,
) -> ApiResult<Page<WithdrawalView>> {
    Ok(ApiResponse::Ok(review.list_withdrawals(&query).await?))
}
