use crate::db::partnerships::{NewPartnership, PartnershipStore};
use crate::db::players::PlayerStore;
use crate::db::withdrawal_requests::{Resolution, WithdrawalRequestStore};
use crate::lifecycle::timeline::Timeline;
use crate::types::error::AppError;
use crate::types::partnership::SeasonCloseSummary;
use chrono::Utc;
use entity::partnership::{Model as PartnershipModel, PartnershipStatus};
use entity::withdrawal_request::{Model as RequestModel, WithdrawalStatus};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

pub const MAX_REASON_LEN: usize = 2000;
pub const MAX_NOTES_LEN: usize = 2000;
pub const SEASON_CLOSED_NOTE: &str = "season closed";

/// Result of an approved withdrawal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    pub withdrawal_request: RequestModel,
    pub dissolved_partnership: PartnershipModel,
    pub successor_partnership: PartnershipModel,
}

/// Sole writer of partnerships and withdrawal requests.
///
/// Every mutating call is one transaction: lock, check preconditions, write with
/// compare-and-set guards, commit. Returning early with `?` drops the transaction,
/// which rolls it back, so callers never observe a half-applied change.
///
/// Lock order, taken with `FOR UPDATE`: partnership rows (ascending id), then
/// player rows (ascending id), then withdrawal request rows. Any write that books
/// a player into a division/season holds that player's row lock across the
/// "player is free" check and the insert.
#[derive(Clone)]
pub struct LifecycleEngine {
    db: DatabaseConnection,
}

impl LifecycleEngine {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Team formation. Both slots filled registers an ACTIVE team, one slot a FORMING one.
    pub async fn register_partnership(
        &self,
        captain_id: Uuid,
        partner_id: Option<Uuid>,
        division_id: Uuid,
        season_id: Uuid,
    ) -> Result<PartnershipModel, AppError> {
        if partner_id == Some(captain_id) {
            return Err(AppError::Validation("captain and partner must be different players".into()));
        }

        let players: Vec<Uuid> = std::iter::once(captain_id).chain(partner_id).collect();
        let txn = self.db.begin().await?;
        lock_players(&txn, &players).await?;
        for &player_id in &players {
            ensure_unbooked(&txn, player_id, division_id, season_id).await?;
        }

        let created = PartnershipStore::insert(
            &txn,
            NewPartnership { captain_id, partner_id, division_id, season_id, predecessor_id: None },
        )
        .await?;
        txn.commit().await?;

        info!("Registered partnership {} ({:?})", created.id, created.status);
        Ok(created)
    }

    /// Fills the open slot of a FORMING partnership once a new partner has been found.
    pub async fn complete_partnership(&self, partnership_id: Uuid, partner_id: Uuid) -> Result<PartnershipModel, AppError> {
        let txn = self.db.begin().await?;
        let team = PartnershipStore::lock(&txn, partnership_id).await?;
        if team.status != PartnershipStatus::Forming {
            return Err(AppError::InvalidState(format!(
                "partnership {partnership_id} is {:?}; only FORMING partnerships take a new partner",
                team.status
            )));
        }
        if team.captain_id == partner_id {
            return Err(AppError::Validation("captain and partner must be different players".into()));
        }
        lock_players(&txn, &[partner_id]).await?;
        ensure_unbooked(&txn, partner_id, team.division_id, team.season_id).await?;

        if !PartnershipStore::fill_partner(&txn, partnership_id, partner_id, Utc::now()).await? {
            return Err(AppError::InvalidState(format!(
                "partnership {partnership_id} changed while it was being completed"
            )));
        }
        let completed = PartnershipStore::get(&txn, partnership_id).await?;
        txn.commit().await?;

        info!("Partnership {} is ACTIVE with partner {}", completed.id, partner_id);
        Ok(completed)
    }

    pub async fn submit_withdrawal(
        &self,
        partnership_id: Uuid,
        requesting_user_id: Uuid,
        reason: &str,
    ) -> Result<RequestModel, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("a reason is required".into()));
        }
        if reason.chars().count() > MAX_REASON_LEN {
            return Err(AppError::Validation(format!("reason exceeds {MAX_REASON_LEN} characters")));
        }

        // row lock: season close and other submits on this team wait for us, or we for them
        let txn = self.db.begin().await?;
        let team = PartnershipStore::lock(&txn, partnership_id).await?;
        if team.status != PartnershipStatus::Active {
            return Err(AppError::InvalidState(format!(
                "partnership {partnership_id} is {:?}; only ACTIVE partnerships accept withdrawal requests",
                team.status
            )));
        }
        if !team.has_player(requesting_user_id) {
            return Err(AppError::Validation(format!(
                "player {requesting_user_id} is not part of partnership {partnership_id}"
            )));
        }
        if let Some(pending) = WithdrawalRequestStore::find_pending_for(&txn, partnership_id).await? {
            return Err(AppError::Conflict(format!(
                "withdrawal request {} is already pending for partnership {partnership_id}",
                pending.id
            )));
        }

        let request = WithdrawalRequestStore::insert(&txn, partnership_id, requesting_user_id, reason.to_string()).await?;
        txn.commit().await?;

        info!("Withdrawal request {} filed against partnership {}", request.id, partnership_id);
        Ok(request)
    }

    pub async fn approve_withdrawal(
        &self,
        request_id: Uuid,
        admin_id: Uuid,
        notes: Option<&str>,
    ) -> Result<ApprovalOutcome, AppError> {
        let notes = clean_notes(notes)?;
        let txn = self.db.begin().await?;

        let request = pending_request(&txn, request_id).await?;
        let team = PartnershipStore::lock(&txn, request.partnership_id).await?;
        if team.status != PartnershipStatus::Active {
            return Err(AppError::InvalidState(format!(
                "partnership {} is {:?} and cannot be dissolved",
                team.id, team.status
            )));
        }
        let remaining = team.remaining_player(request.requesting_user_id).ok_or_else(|| {
            AppError::InvalidState(format!(
                "partnership {} has no remaining player once {} leaves",
                team.id, request.requesting_user_id
            ))
        })?;
        lock_players(&txn, &[remaining]).await?;

        let now = Utc::now();
        let resolution = Resolution { status: WithdrawalStatus::Approved, admin_id, notes, at: now };
        if !WithdrawalRequestStore::resolve(&txn, request_id, resolution).await? {
            return Err(already_processed(request_id));
        }
        if !PartnershipStore::dissolve(&txn, team.id, request_id, now).await? {
            return Err(AppError::InvalidState(format!("partnership {} is no longer ACTIVE", team.id)));
        }

        // re-checked inside the transaction, after the dissolved team stopped counting
        if let Some(other) = PartnershipStore::find_open_for_player(&txn, remaining, team.division_id, team.season_id).await? {
            warn!("Player {} already holds partnership {} while approving {}", remaining, other.id, request_id);
            return Err(AppError::Conflict(format!(
                "player {remaining} already holds partnership {} in this division and season",
                other.id
            )));
        }

        let successor = PartnershipStore::insert(
            &txn,
            NewPartnership {
                captain_id: remaining,
                partner_id: None,
                division_id: team.division_id,
                season_id: team.season_id,
                predecessor_id: Some(team.id),
            },
        )
        .await?;

        let withdrawal_request = WithdrawalRequestStore::get(&txn, request_id).await?;
        let dissolved_partnership = PartnershipStore::get(&txn, team.id).await?;
        txn.commit().await?;

        info!(
            "Admin {} approved withdrawal {}: partnership {} dissolved, successor {} forming",
            admin_id, request_id, dissolved_partnership.id, successor.id
        );
        Ok(ApprovalOutcome { withdrawal_request, dissolved_partnership, successor_partnership: successor })
    }

    pub async fn reject_withdrawal(
        &self,
        request_id: Uuid,
        admin_id: Uuid,
        notes: Option<&str>,
    ) -> Result<RequestModel, AppError> {
        let notes = clean_notes(notes)?;
        let txn = self.db.begin().await?;

        pending_request(&txn, request_id).await?;
        let resolution = Resolution { status: WithdrawalStatus::Rejected, admin_id, notes, at: Utc::now() };
        if !WithdrawalRequestStore::resolve(&txn, request_id, resolution).await? {
            return Err(already_processed(request_id));
        }
        let rejected = WithdrawalRequestStore::get(&txn, request_id).await?;
        txn.commit().await?;

        info!("Admin {} rejected withdrawal {}", admin_id, request_id);
        Ok(rejected)
    }

    /// Season-close event: pending requests are rejected, open partnerships expire.
    pub async fn close_season(&self, division_id: Uuid, season_id: Uuid, admin_id: Uuid) -> Result<SeasonCloseSummary, AppError> {
        let txn = self.db.begin().await?;
        let now = Utc::now();
        let mut summary = SeasonCloseSummary { expired_partnerships: 0, rejected_requests: 0 };

        // Every pass re-reads the open set, so a successor committed by an approval
        // we waited on is picked up by the next pass.
        loop {
            let open = PartnershipStore::open_ids_in(&txn, division_id, season_id).await?;
            if open.is_empty() {
                break;
            }
            for id in open {
                let team = PartnershipStore::lock(&txn, id).await?;
                if !team.status.is_open() {
                    continue;
                }
                if let Some(pending) = WithdrawalRequestStore::find_pending_for(&txn, team.id).await? {
                    let resolution = Resolution {
                        status: WithdrawalStatus::Rejected,
                        admin_id,
                        notes: Some(SEASON_CLOSED_NOTE.to_string()),
                        at: now,
                    };
                    if WithdrawalRequestStore::resolve(&txn, pending.id, resolution).await? {
                        summary.rejected_requests += 1;
                    }
                }
                if !PartnershipStore::expire(&txn, team.id, now).await? {
                    return Err(AppError::InvalidState(format!("partnership {} changed while the season closed", team.id)));
                }
                summary.expired_partnerships += 1;
            }
        }
        txn.commit().await?;

        info!(
            "Admin {} closed division {} season {}: {} partnerships expired, {} requests rejected",
            admin_id, division_id, season_id, summary.expired_partnerships, summary.rejected_requests
        );
        Ok(summary)
    }

    pub async fn partnership_timeline(&self, partnership_id: Uuid) -> Result<Timeline, AppError> {
        Timeline::load(&self.db, partnership_id).await
    }

    pub async fn request_timeline(&self, request_id: Uuid) -> Result<Timeline, AppError> {
        Timeline::load_for_request(&self.db, request_id).await
    }
}

async fn pending_request(txn: &DatabaseTransaction, request_id: Uuid) -> Result<RequestModel, AppError> {
    let request = WithdrawalRequestStore::get(txn, request_id).await?;
    if request.status != WithdrawalStatus::Pending {
        return Err(already_processed(request_id));
    }
    Ok(request)
}

/// Takes the booking lock on `player_ids` and checks they are in the directory.
async fn lock_players(txn: &DatabaseTransaction, player_ids: &[Uuid]) -> Result<(), AppError> {
    let found = PlayerStore::lock(txn, player_ids).await?;
    match player_ids.iter().find(|id| !found.contains_key(id)) {
        Some(missing) => Err(AppError::NotFound(format!("Player {missing} not found"))),
        None => Ok(()),
    }
}

async fn ensure_unbooked(
    txn: &DatabaseTransaction,
    player_id: Uuid,
    division_id: Uuid,
    season_id: Uuid,
) -> Result<(), AppError> {
    match PartnershipStore::find_open_for_player(txn, player_id, division_id, season_id).await? {
        Some(existing) => Err(AppError::Conflict(format!(
            "player {player_id} already holds partnership {} in this division and season",
            existing.id
        ))),
        None => Ok(()),
    }
}

fn already_processed(request_id: Uuid) -> AppError {
    AppError::InvalidState(format!("withdrawal request {request_id} was already processed by another admin"))
}

fn clean_notes(notes: Option<&str>) -> Result<Option<String>, AppError> {
    let notes = notes.map(str::trim).filter(|n| !n.is_empty());
    if notes.is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        return Err(AppError::Validation(format!("notes exceed {MAX_NOTES_LEN} characters")));
    }
    Ok(notes.map(str::to_string))
}
