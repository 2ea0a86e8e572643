use crate::db::pagination::{fetch_page, PageRequest};
use crate::db::players::PlayerStore;
use crate::db::{contains_ci, search_key, search_term};
use crate::types::{error::AppError, response::Page};
use chrono::{DateTime, Utc};
use entity::partnership;
use entity::withdrawal_request::{
    self, ActiveModel as RequestActive, Entity as WithdrawalRequest, Model as RequestModel, WithdrawalStatus,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Set, SqlErr,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct WithdrawalFilter {
    pub status: Option<WithdrawalStatus>,
    pub search: Option<String>,
    pub division_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    /// Bounds on `request_date`.
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Outcome written by an admin decision.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub status: WithdrawalStatus,
    pub admin_id: Uuid,
    pub notes: Option<String>,
    pub at: DateTime<Utc>,
}

pub struct WithdrawalRequestStore;

impl WithdrawalRequestStore {
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        partnership_id: Uuid,
        requesting_user_id: Uuid,
        reason: String,
    ) -> Result<RequestModel, AppError> {
        RequestActive {
            id: Set(Uuid::now_v7()),
            partnership_id: Set(partnership_id),
            requesting_user_id: Set(requesting_user_id),
            reason_key: Set(search_key(&reason)),
            reason: Set(reason),
            status: Set(WithdrawalStatus::Pending),
            request_date: Set(Utc::now()),
            processed_at: Set(None),
            processed_by_admin_id: Set(None),
            admin_notes: Set(None),
        }
        .insert(conn)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(format!(
                "a pending withdrawal request already exists for partnership {partnership_id}"
            )),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                AppError::NotFound(format!("Partnership {partnership_id} or requesting player not found"))
            }
            _ => err.into(),
        })
    }

    pub async fn find<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<RequestModel>, AppError> {
        Ok(WithdrawalRequest::find_by_id(id).one(conn).await?)
    }

    pub async fn get<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<RequestModel, AppError> {
        Ok(Self::find(conn, id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Withdrawal request {id} not found")))?)
    }

    pub async fn get_many<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<HashMap<Uuid, RequestModel>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(WithdrawalRequest::find()
            .filter(withdrawal_request::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect())
    }

    pub async fn find_pending_for<C: ConnectionTrait>(conn: &C, partnership_id: Uuid) -> Result<Option<RequestModel>, AppError> {
        Ok(WithdrawalRequest::find()
            .filter(withdrawal_request::Column::PartnershipId.eq(partnership_id))
            .filter(withdrawal_request::Column::Status.eq(WithdrawalStatus::Pending))
            .one(conn)
            .await?)
    }

    /// Every request filed against any of `partnership_ids`, oldest first.
    pub async fn list_for_partnerships<C: ConnectionTrait>(
        conn: &C,
        partnership_ids: &[Uuid],
    ) -> Result<Vec<RequestModel>, AppError> {
        if partnership_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(WithdrawalRequest::find()
            .filter(withdrawal_request::Column::PartnershipId.is_in(partnership_ids.iter().copied()))
            .order_by_asc(withdrawal_request::Column::RequestDate)
            .order_by_asc(withdrawal_request::Column::Id)
            .all(conn)
            .await?)
    }

    /// PENDING → `resolution.status`. Returns false when another decision got there first.
    pub async fn resolve<C: ConnectionTrait>(conn: &C, id: Uuid, resolution: Resolution) -> Result<bool, AppError> {
        let res = WithdrawalRequest::update_many()
            .col_expr(withdrawal_request::Column::Status, Expr::value(resolution.status))
            .col_expr(withdrawal_request::Column::ProcessedAt, Expr::value(Some(resolution.at)))
            .col_expr(withdrawal_request::Column::ProcessedByAdminId, Expr::value(Some(resolution.admin_id)))
            .col_expr(withdrawal_request::Column::AdminNotes, Expr::value(resolution.notes))
            .filter(withdrawal_request::Column::Id.eq(id))
            .filter(withdrawal_request::Column::Status.eq(WithdrawalStatus::Pending))
            .exec(conn)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// Newest request first; ties broken by id so pages never overlap.
    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        filter: &WithdrawalFilter,
        page: PageRequest,
    ) -> Result<Page<RequestModel>, AppError> {
        let mut select = WithdrawalRequest::find();
        if let Some(status) = filter.status {
            select = select.filter(withdrawal_request::Column::Status.eq(status));
        }
        if let Some(from) = filter.from {
            select = select.filter(withdrawal_request::Column::RequestDate.gte(from));
        }
        if let Some(to) = filter.to {
            select = select.filter(withdrawal_request::Column::RequestDate.lte(to));
        }
        if filter.division_id.is_some() || filter.season_id.is_some() {
            let mut context = partnership::Entity::find()
                .select_only()
                .column(partnership::Column::Id);
            if let Some(division_id) = filter.division_id {
                context = context.filter(partnership::Column::DivisionId.eq(division_id));
            }
            if let Some(season_id) = filter.season_id {
                context = context.filter(partnership::Column::SeasonId.eq(season_id));
            }
            select = select.filter(withdrawal_request::Column::PartnershipId.in_subquery(context.into_query()));
        }
        if let Some(needle) = search_term(filter.search.as_deref()) {
            let teams = partnership::Entity::find()
                .select_only()
                .column(partnership::Column::Id)
                .filter(
                    Condition::any()
                        .add(partnership::Column::CaptainId.in_subquery(PlayerStore::ids_matching_name(needle)))
                        .add(partnership::Column::PartnerId.in_subquery(PlayerStore::ids_matching_name(needle))),
                )
                .into_query();
            select = select.filter(
                Condition::any()
                    .add(contains_ci((withdrawal_request::Entity, withdrawal_request::Column::ReasonKey), needle))
                    .add(withdrawal_request::Column::PartnershipId.in_subquery(teams)),
            );
        }
        let select = select
            .order_by_desc(withdrawal_request::Column::RequestDate)
            .order_by_desc(withdrawal_request::Column::Id);
        fetch_page(conn, select, page).await
    }
}
