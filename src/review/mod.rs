//! Read side of the admin dashboard. Joins requests, partnerships, players and
//! successors for display; never writes.

use crate::config::ReadRetryConfig;
use crate::db::pagination::PageRequest;
use crate::db::partnerships::{PartnershipFilter, PartnershipStore};
use crate::db::players::PlayerStore;
use crate::db::retry::retry_read;
use crate::db::withdrawal_requests::{WithdrawalFilter, WithdrawalRequestStore};
use crate::lifecycle::timeline::{Timeline, TimelineEvent};
use crate::types::error::AppError;
use crate::types::partnership::PartnershipQuery;
use crate::types::response::Page;
use crate::types::withdrawal::WithdrawalQuery;
use entity::partnership::{Model as PartnershipModel, PartnershipStatus};
use entity::player::Model as PlayerModel;
use entity::withdrawal_request::Model as RequestModel;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub id: Uuid,
    /// `None` when the directory has no entry for the id.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipSummary {
    pub partnership: PartnershipModel,
    pub captain: PlayerRef,
    pub partner: Option<PlayerRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalView {
    pub request: RequestModel,
    pub requester: PlayerRef,
    pub partnership: PartnershipSummary,
    /// Set once the request was approved.
    pub successor: Option<PartnershipSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipView {
    #[serde(flatten)]
    pub summary: PartnershipSummary,
    /// The request that dissolved it, if any.
    pub withdrawal_request: Option<RequestModel>,
    pub successor: Option<PartnershipSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineTarget {
    Partnership(Uuid),
    Request(Uuid),
}

#[derive(Clone)]
pub struct ReviewService {
    db: DatabaseConnection,
    retry: ReadRetryConfig,
}

impl ReviewService {
    pub fn new(db: DatabaseConnection, retry: ReadRetryConfig) -> Self {
        Self { db, retry }
    }

    pub async fn list_withdrawals(&self, query: &WithdrawalQuery) -> Result<Page<WithdrawalView>, AppError> {
        let page = PageRequest::new(query.page, query.page_size)?;
        let filter = WithdrawalFilter {
            status: query.status,
            search: query.search.clone(),
            division_id: query.division_id,
            season_id: query.season_id,
            from: query.from,
            to: query.to,
        };
        let (db, filter) = (&self.db, &filter);
        retry_read(self.retry, move || async move {
            let mut rows = WithdrawalRequestStore::list(db, filter, page).await?;
            let requests = std::mem::take(&mut rows.items);
            Ok(rows.with_items(compose_withdrawals(db, requests).await?))
        })
        .await
    }

    /// Terminal partnerships; `status` narrows to DISSOLVED or EXPIRED, default both.
    pub async fn list_dissolved_partnerships(&self, query: &PartnershipQuery) -> Result<Page<PartnershipView>, AppError> {
        let statuses = match query.status {
            None => vec![PartnershipStatus::Dissolved, PartnershipStatus::Expired],
            Some(status) if status.is_terminal() => vec![status],
            Some(status) => {
                return Err(AppError::Validation(format!(
                    "status filter must be DISSOLVED or EXPIRED, got {status:?}"
                )))
            }
        };
        let page = PageRequest::new(query.page, query.page_size)?;
        let filter = PartnershipFilter {
            statuses,
            search: query.search.clone(),
            division_id: query.division_id,
            season_id: query.season_id,
            from: query.from,
            to: query.to,
        };
        let (db, filter) = (&self.db, &filter);
        retry_read(self.retry, move || async move {
            let mut rows = PartnershipStore::list(db, filter, page).await?;
            let teams = std::mem::take(&mut rows.items);
            Ok(rows.with_items(compose_partnerships(db, teams).await?))
        })
        .await
    }

    pub async fn withdrawal_detail(&self, request_id: Uuid) -> Result<WithdrawalView, AppError> {
        let db = &self.db;
        retry_read(self.retry, move || async move {
            let request = WithdrawalRequestStore::get(db, request_id).await?;
            single(compose_withdrawals(db, vec![request]).await?)
        })
        .await
    }

    pub async fn partnership_detail(&self, partnership_id: Uuid) -> Result<PartnershipView, AppError> {
        let db = &self.db;
        retry_read(self.retry, move || async move {
            let partnership = PartnershipStore::get(db, partnership_id).await?;
            single(compose_partnerships(db, vec![partnership]).await?)
        })
        .await
    }

    pub async fn timeline(&self, target: TimelineTarget) -> Result<Vec<TimelineEvent>, AppError> {
        let db = &self.db;
        let timeline = retry_read(self.retry, move || async move {
            match target {
                TimelineTarget::Partnership(id) => Timeline::load(db, id).await,
                TimelineTarget::Request(id) => Timeline::load_for_request(db, id).await,
            }
        })
        .await?;
        Ok(timeline.events().collect())
    }
}

fn single<T>(mut items: Vec<T>) -> Result<T, AppError> {
    items.pop().ok_or_else(|| AppError::Internal("composed view missing".into()))
}

fn player_ref(players: &HashMap<Uuid, PlayerModel>, id: Uuid) -> PlayerRef {
    PlayerRef { id, name: players.get(&id).map(|p| p.name.clone()) }
}

fn summarize(players: &HashMap<Uuid, PlayerModel>, partnership: PartnershipModel) -> PartnershipSummary {
    PartnershipSummary {
        captain: player_ref(players, partnership.captain_id),
        partner: partnership.partner_id.map(|id| player_ref(players, id)),
        partnership,
    }
}

fn player_ids<'a>(teams: impl Iterator<Item = &'a PartnershipModel>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = teams.flat_map(|t| t.players()).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn compose_withdrawals<C: ConnectionTrait>(conn: &C, requests: Vec<RequestModel>) -> Result<Vec<WithdrawalView>, AppError> {
    let team_ids: Vec<Uuid> = requests.iter().map(|r| r.partnership_id).collect();
    let teams = PartnershipStore::get_many(conn, &team_ids).await?;
    let mut successors = PartnershipStore::find_successors(conn, &team_ids).await?;

    let mut ids = player_ids(teams.values().chain(successors.values()));
    ids.extend(requests.iter().map(|r| r.requesting_user_id));
    let players = PlayerStore::get_many(conn, &ids).await?;

    requests
        .into_iter()
        .map(|request| {
            let team = teams.get(&request.partnership_id).cloned().ok_or_else(|| {
                AppError::Internal(format!("withdrawal request {} references a missing partnership", request.id))
            })?;
            // only the approved request owns the successor
            let successor = (team.withdrawal_request_id == Some(request.id))
                .then(|| successors.remove(&team.id))
                .flatten()
                .map(|s| summarize(&players, s));
            Ok(WithdrawalView {
                requester: player_ref(&players, request.requesting_user_id),
                partnership: summarize(&players, team),
                successor,
                request,
            })
        })
        .collect()
}

async fn compose_partnerships<C: ConnectionTrait>(conn: &C, teams: Vec<PartnershipModel>) -> Result<Vec<PartnershipView>, AppError> {
    let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
    let request_ids: Vec<Uuid> = teams.iter().filter_map(|t| t.withdrawal_request_id).collect();
    let mut requests = WithdrawalRequestStore::get_many(conn, &request_ids).await?;
    let mut successors = PartnershipStore::find_successors(conn, &team_ids).await?;
    let players = PlayerStore::get_many(conn, &player_ids(teams.iter().chain(successors.values()))).await?;

    Ok(teams
        .into_iter()
        .map(|team| PartnershipView {
            withdrawal_request: team.withdrawal_request_id.and_then(|id| requests.remove(&id)),
            successor: successors.remove(&team.id).map(|s| summarize(&players, s)),
            summary: summarize(&players, team),
        })
        .collect())
}
