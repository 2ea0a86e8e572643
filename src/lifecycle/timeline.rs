use crate::db::partnerships::PartnershipStore;
use crate::db::withdrawal_requests::WithdrawalRequestStore;
use crate::types::error::AppError;
use chrono::{DateTime, Utc};
use entity::partnership::{Model as PartnershipModel, PartnershipStatus};
use entity::withdrawal_request::{Model as RequestModel, WithdrawalStatus};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineEventKind {
    PartnershipCreated,
    SuccessorCreated,
    WithdrawalRequested,
    WithdrawalApproved,
    WithdrawalRejected,
    PartnershipDissolved,
    PartnershipExpired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub kind: TimelineEventKind,
    pub partnership_id: Uuid,
    pub withdrawal_request_id: Option<Uuid>,
    /// Predecessor for `SuccessorCreated`.
    pub related_partnership_id: Option<Uuid>,
    /// Requesting player or deciding admin, where one exists.
    pub actor_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
    pub detail: Option<String>,
}

/// One partnership of the chain with the requests filed against it.
#[derive(Debug, Clone)]
struct Segment {
    partnership: PartnershipModel,
    requests: Vec<RequestModel>,
}

/// History of a predecessor chain, oldest partnership first.
///
/// Loaded once; [`Timeline::events`] can be iterated any number of times.
#[derive(Debug, Clone)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    /// Walks `predecessor_id` back to the root and the successor index forward to
    /// the newest partnership, so any member of the chain yields the same timeline.
    pub async fn load<C: ConnectionTrait>(conn: &C, partnership_id: Uuid) -> Result<Self, AppError> {
        let origin = PartnershipStore::get(conn, partnership_id).await?;
        let mut seen = HashSet::from([origin.id]);
        let mut chain = VecDeque::from([origin]);

        while let Some(pred_id) = chain.front().and_then(|p| p.predecessor_id) {
            if !seen.insert(pred_id) {
                warn!("Predecessor cycle at partnership {pred_id}");
                break;
            }
            chain.push_front(PartnershipStore::get(conn, pred_id).await?);
        }

        while let Some(last_id) = chain.back().map(|p| p.id) {
            match PartnershipStore::find_successor(conn, last_id).await? {
                Some(next) if seen.insert(next.id) => chain.push_back(next),
                Some(next) => {
                    warn!("Successor cycle at partnership {}", next.id);
                    break;
                }
                None => break,
            }
        }

        let ids: Vec<Uuid> = chain.iter().map(|p| p.id).collect();
        let mut requests: HashMap<Uuid, Vec<RequestModel>> = HashMap::new();
        for request in WithdrawalRequestStore::list_for_partnerships(conn, &ids).await? {
            requests.entry(request.partnership_id).or_default().push(request);
        }

        Ok(Self {
            segments: chain
                .into_iter()
                .map(|partnership| Segment {
                    requests: requests.remove(&partnership.id).unwrap_or_default(),
                    partnership,
                })
                .collect(),
        })
    }

    pub async fn load_for_request<C: ConnectionTrait>(conn: &C, request_id: Uuid) -> Result<Self, AppError> {
        let request = WithdrawalRequestStore::get(conn, request_id).await?;
        Self::load(conn, request.partnership_id).await
    }

    /// Partnership ids in chain order.
    pub fn partnership_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.segments.iter().map(|s| s.partnership.id)
    }

    pub fn events(&self) -> impl Iterator<Item = TimelineEvent> + '_ {
        self.segments.iter().flat_map(Segment::events)
    }
}

impl Segment {
    fn events(&self) -> impl Iterator<Item = TimelineEvent> + '_ {
        let p = &self.partnership;
        let created = match p.predecessor_id {
            Some(pred) => event(TimelineEventKind::SuccessorCreated, p.id, p.created_at).related(pred),
            None => event(TimelineEventKind::PartnershipCreated, p.id, p.created_at),
        }
        .actor(p.captain_id);

        std::iter::once(created)
            .chain(self.requests.iter().flat_map(request_events))
            .chain(closing_event(p))
    }
}

fn request_events(r: &RequestModel) -> impl Iterator<Item = TimelineEvent> {
    let requested = event(TimelineEventKind::WithdrawalRequested, r.partnership_id, r.request_date)
        .request(r.id)
        .actor(r.requesting_user_id)
        .detail(Some(r.reason.clone()));

    let resolved = match r.status {
        WithdrawalStatus::Approved => Some(TimelineEventKind::WithdrawalApproved),
        WithdrawalStatus::Rejected => Some(TimelineEventKind::WithdrawalRejected),
        WithdrawalStatus::Pending => None,
    }
    .zip(r.processed_at)
    .map(|(kind, at)| {
        let mut e = event(kind, r.partnership_id, at).request(r.id).detail(r.admin_notes.clone());
        e.actor_id = r.processed_by_admin_id;
        e
    });

    std::iter::once(requested).chain(resolved)
}

fn closing_event(p: &PartnershipModel) -> Option<TimelineEvent> {
    match p.status {
        PartnershipStatus::Dissolved => p.dissolved_at.map(|at| {
            let mut e = event(TimelineEventKind::PartnershipDissolved, p.id, at);
            e.withdrawal_request_id = p.withdrawal_request_id;
            e
        }),
        PartnershipStatus::Expired => p.expired_at.map(|at| event(TimelineEventKind::PartnershipExpired, p.id, at)),
        PartnershipStatus::Active | PartnershipStatus::Forming => None,
    }
}

fn event(kind: TimelineEventKind, partnership_id: Uuid, occurred_at: DateTime<Utc>) -> TimelineEvent {
    TimelineEvent {
        kind,
        partnership_id,
        withdrawal_request_id: None,
        related_partnership_id: None,
        actor_id: None,
        occurred_at,
        detail: None,
    }
}

impl TimelineEvent {
    fn request(mut self, id: Uuid) -> Self {
        self.withdrawal_request_id = Some(id);
        self
    }

    fn related(mut self, id: Uuid) -> Self {
        self.related_partnership_id = Some(id);
        self
    }

    fn actor(mut self, id: Uuid) -> Self {
        self.actor_id = Some(id);
        self
    }

    fn detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}
