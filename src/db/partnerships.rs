use crate::db::pagination::{fetch_page, PageRequest};
use crate::db::players::PlayerStore;
use crate::db::{contains_ci, search_term};
use crate::types::{error::AppError, response::Page};
use chrono::{DateTime, Utc};
use entity::partnership::{self, ActiveModel as PartnershipActive, Entity as Partnership, Model as PartnershipModel, PartnershipStatus};
use entity::withdrawal_request;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Set, SqlErr,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Fields of a partnership the engine decides when creating one.
#[derive(Debug, Clone)]
pub struct NewPartnership {
    pub captain_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub division_id: Uuid,
    pub season_id: Uuid,
    pub predecessor_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct PartnershipFilter {
    /// Empty means any status.
    pub statuses: Vec<PartnershipStatus>,
    pub search: Option<String>,
    pub division_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    /// Bounds on `updated_at`, i.e. the last transition.
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub struct PartnershipStore;

impl PartnershipStore {
    /// Status follows the slots: both filled is ACTIVE, partner missing is FORMING.
    pub async fn insert<C: ConnectionTrait>(conn: &C, new: NewPartnership) -> Result<PartnershipModel, AppError> {
        let now = Utc::now();
        let status = if new.partner_id.is_some() { PartnershipStatus::Active } else { PartnershipStatus::Forming };
        PartnershipActive {
            id: Set(Uuid::now_v7()),
            captain_id: Set(new.captain_id),
            partner_id: Set(new.partner_id),
            division_id: Set(new.division_id),
            season_id: Set(new.season_id),
            status: Set(status),
            created_at: Set(now),
            dissolved_at: Set(None),
            expired_at: Set(None),
            predecessor_id: Set(new.predecessor_id),
            withdrawal_request_id: Set(None),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
                "player already holds an open partnership in this division and season".into(),
            ),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                AppError::NotFound("referenced player or predecessor does not exist".into())
            }
            _ => err.into(),
        })
    }

    pub async fn find<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<PartnershipModel>, AppError> {
        Ok(Partnership::find_by_id(id).one(conn).await?)
    }

    pub async fn get<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<PartnershipModel, AppError> {
        Ok(Self::find(conn, id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Partnership {id} not found")))?)
    }

    /// `get` plus a row lock held until the transaction ends.
    pub async fn lock<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<PartnershipModel, AppError> {
        Ok(Partnership::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Partnership {id} not found")))?)
    }

    pub async fn get_many<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<HashMap<Uuid, PartnershipModel>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(Partnership::find()
            .filter(partnership::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }

    /// Forward link of the chain, found through the `predecessor_id` index.
    pub async fn find_successor<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<PartnershipModel>, AppError> {
        Ok(Partnership::find()
            .filter(partnership::Column::PredecessorId.eq(id))
            .order_by_asc(partnership::Column::CreatedAt)
            .one(conn)
            .await?)
    }

    /// Successors keyed by the predecessor they replace.
    pub async fn find_successors<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<HashMap<Uuid, PartnershipModel>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = Partnership::find()
            .filter(partnership::Column::PredecessorId.is_in(ids.iter().copied()))
            .order_by_desc(partnership::Column::CreatedAt)
            .all(conn)
            .await?;
        // descending, so the earliest successor wins the insert race
        Ok(rows
            .into_iter()
            .filter_map(|p| p.predecessor_id.map(|pred| (pred, p)))
            .collect())
    }

    /// The ACTIVE/FORMING partnership `player_id` holds in a division/season, if any.
    pub async fn find_open_for_player<C: ConnectionTrait>(
        conn: &C,
        player_id: Uuid,
        division_id: Uuid,
        season_id: Uuid,
    ) -> Result<Option<PartnershipModel>, AppError> {
        Ok(Partnership::find()
            .filter(partnership::Column::DivisionId.eq(division_id))
            .filter(partnership::Column::SeasonId.eq(season_id))
            .filter(partnership::Column::Status.is_in(PartnershipStatus::OPEN))
            .filter(
                Condition::any()
                    .add(partnership::Column::CaptainId.eq(player_id))
                    .add(partnership::Column::PartnerId.eq(player_id)),
            )
            .one(conn)
            .await?)
    }

    /// Ids of the open partnerships of a division/season, ascending. Takes no lock.
    pub async fn open_ids_in<C: ConnectionTrait>(
        conn: &C,
        division_id: Uuid,
        season_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        Ok(Partnership::find()
            .select_only()
            .column(partnership::Column::Id)
            .filter(partnership::Column::DivisionId.eq(division_id))
            .filter(partnership::Column::SeasonId.eq(season_id))
            .filter(partnership::Column::Status.is_in(PartnershipStatus::OPEN))
            .order_by_asc(partnership::Column::Id)
            .into_tuple::<Uuid>()
            .all(conn)
            .await?)
    }

    /// ACTIVE → DISSOLVED. Returns false when the row was not ACTIVE any more.
    pub async fn dissolve<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        withdrawal_request_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let res = Partnership::update_many()
            .col_expr(partnership::Column::Status, Expr::value(PartnershipStatus::Dissolved))
            .col_expr(partnership::Column::DissolvedAt, Expr::value(Some(at)))
            .col_expr(partnership::Column::WithdrawalRequestId, Expr::value(Some(withdrawal_request_id)))
            .col_expr(partnership::Column::UpdatedAt, Expr::value(at))
            .filter(partnership::Column::Id.eq(id))
            .filter(partnership::Column::Status.eq(PartnershipStatus::Active))
            .exec(conn)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// FORMING → ACTIVE by filling the open slot. Returns false when the row was not FORMING.
    pub async fn fill_partner<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        partner_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let res = Partnership::update_many()
            .col_expr(partnership::Column::Status, Expr::value(PartnershipStatus::Active))
            .col_expr(partnership::Column::PartnerId, Expr::value(Some(partner_id)))
            .col_expr(partnership::Column::UpdatedAt, Expr::value(at))
            .filter(partnership::Column::Id.eq(id))
            .filter(partnership::Column::Status.eq(PartnershipStatus::Forming))
            .filter(partnership::Column::PartnerId.is_null())
            .exec(conn)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// ACTIVE/FORMING → EXPIRED. Returns false when the row was already terminal.
    pub async fn expire<C: ConnectionTrait>(conn: &C, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError> {
        let res = Partnership::update_many()
            .col_expr(partnership::Column::Status, Expr::value(PartnershipStatus::Expired))
            .col_expr(partnership::Column::ExpiredAt, Expr::value(Some(at)))
            .col_expr(partnership::Column::UpdatedAt, Expr::value(at))
            .filter(partnership::Column::Id.eq(id))
            .filter(partnership::Column::Status.is_in(PartnershipStatus::OPEN))
            .exec(conn)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// Newest transition first; ties broken by id so pages never overlap.
    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        filter: &PartnershipFilter,
        page: PageRequest,
    ) -> Result<Page<PartnershipModel>, AppError> {
        let mut select = Partnership::find();
        if !filter.statuses.is_empty() {
            select = select.filter(partnership::Column::Status.is_in(filter.statuses.iter().copied()));
        }
        if let Some(division_id) = filter.division_id {
            select = select.filter(partnership::Column::DivisionId.eq(division_id));
        }
        if let Some(season_id) = filter.season_id {
            select = select.filter(partnership::Column::SeasonId.eq(season_id));
        }
        if let Some(from) = filter.from {
            select = select.filter(partnership::Column::UpdatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            select = select.filter(partnership::Column::UpdatedAt.lte(to));
        }
        if let Some(needle) = search_term(filter.search.as_deref()) {
            let reasons = withdrawal_request::Entity::find()
                .select_only()
                .column(withdrawal_request::Column::PartnershipId)
                .filter(contains_ci(withdrawal_request::Column::ReasonKey, needle))
                .into_query();
            select = select.filter(
                Condition::any()
                    .add(partnership::Column::CaptainId.in_subquery(PlayerStore::ids_matching_name(needle)))
                    .add(partnership::Column::PartnerId.in_subquery(PlayerStore::ids_matching_name(needle)))
                    .add(partnership::Column::Id.in_subquery(reasons)),
            );
        }
        let select = select
            .order_by_desc(partnership::Column::UpdatedAt)
            .order_by_desc(partnership::Column::Id);
        fetch_page(conn, select, page).await
    }
}
