use chrono::{DateTime, Utc};
use entity::withdrawal_request::WithdrawalStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RWithdrawalSubmit {
    pub partnership_id: Uuid,
    pub requesting_user_id: Uuid,
    pub reason: String,
}

/// Body of approve and reject. The acting admin is always explicit.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RWithdrawalDecision {
    pub admin_id: Uuid,
    pub notes: Option<String>,
}

/// Query string of `GET /withdrawals`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalQuery {
    pub status: Option<WithdrawalStatus>,
    pub search: Option<String>,
    pub division_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
