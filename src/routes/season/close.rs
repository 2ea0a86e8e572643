use crate::lifecycle::LifecycleEngine;
use crate::types::partnership::{RSeasonClose, SeasonCloseSummary};
use crate::types::response::{ApiResponse, ApiResult};
use actix_web::{post, web};
use std::sync::Arc;

#[post("/close")]
pub async fn close(
    _req: actix_web::HttpRequest,
    engine: web::Data<Arc<LifecycleEngine>>,
    data: web::Json<RSeasonClose>,
) -> ApiResult<SeasonCloseSummary> {
    let summary = engine
        .close_season(data.division_id, data.season_id, data.admin_id)
        .await?;
    Ok(ApiResponse::Ok(summary))
}
