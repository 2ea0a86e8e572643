use actix_web::get;

use crate::types::response::{ApiResponse, ApiResult};

/// Liveness check. Open, so orchestrators need no API key.
#[get("")]
pub async fn health(
    _req: actix_web::HttpRequest
) -> ApiResult<()> {
    Ok(ApiResponse::EmptyOk)
}
