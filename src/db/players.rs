use crate::types::error::AppError;
use chrono::Utc;
use entity::player::{self, ActiveModel as PlayerActive, Entity as Player, Model as PlayerModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set,
};
use sea_orm::sea_query::SelectStatement;
use std::collections::HashMap;
use uuid::Uuid;

use super::{contains_ci, search_key};
use super::database_service::DatabaseService;

pub struct PlayerStore;

impl PlayerStore {
    /// Inserts or renames a directory entry.
    pub async fn upsert<C: ConnectionTrait>(conn: &C, id: Uuid, name: &str) -> Result<PlayerModel, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("player name must not be empty".into()));
        }
        let now = Utc::now();
        match Player::find_by_id(id).one(conn).await? {
            Some(existing) => {
                let mut am: PlayerActive = existing.into();
                am.name = Set(name.to_string());
                am.name_key = Set(search_key(name));
                am.updated_at = Set(now);
                Ok(am.update(conn).await?)
            }
            None => Ok(PlayerActive {
                id: Set(id),
                name: Set(name.to_string()),
                name_key: Set(search_key(name)),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(conn)
            .await?),
        }
    }

    pub async fn get<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<PlayerModel, AppError> {
        Ok(Player::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Player {id} not found")))?)
    }

    pub async fn get_many<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<HashMap<Uuid, PlayerModel>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(Player::find()
            .filter(player::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }

    /// Row-locks the given players (`FOR UPDATE`, ascending id) until the transaction
    /// ends. Every write that books a player into a division/season takes this lock
    /// before checking the player is free. SQLite has no row locks; its writers are
    /// serialized already.
    pub async fn lock<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<HashMap<Uuid, PlayerModel>, AppError> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        Ok(Player::find()
            .filter(player::Column::Id.is_in(ids))
            .order_by_asc(player::Column::Id)
            .lock_exclusive()
            .all(conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }

    /// `SELECT id FROM players WHERE name ~ needle`, for use with `in_subquery`.
    pub fn ids_matching_name(needle: &str) -> SelectStatement {
        Player::find()
            .select_only()
            .column(player::Column::Id)
            .filter(contains_ci(player::Column::NameKey, needle))
            .into_query()
    }
}

impl DatabaseService {
    pub async fn sync_player(&self, id: Uuid, name: &str) -> Result<PlayerModel, AppError> {
        PlayerStore::upsert(&self.database_connection, id, name).await
    }

    pub async fn get_player(&self, id: Uuid) -> Result<PlayerModel, AppError> {
        PlayerStore::get(&self.database_connection, id).await
    }
}
