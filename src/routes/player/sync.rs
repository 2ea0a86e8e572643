use crate::db::database_service::DatabaseService;
use crate::types::partnership::RPlayerSync;
use crate::types::response::{ApiResponse, ApiResult};
use actix_web::{put, web};
use entity::player::Model as PlayerModel;
use std::sync::Arc;
use uuid::Uuid;

/// Mirrors a player from the league directory so partnerships can reference it.
#[put("/{id}")]
pub async fn sync_player(
    _req: actix_web::HttpRequest,
    db: web::Data<Arc<DatabaseService>>,
    path: web::Path<Uuid>,
    data: web::Json<RPlayerSync>,
) -> ApiResult<PlayerModel> {
    let player = db.sync_player(path.into_inner(), &data.name).await?;
    Ok(ApiResponse::Ok(player))
}
