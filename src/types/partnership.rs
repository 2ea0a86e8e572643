use chrono::{DateTime, Utc};
use entity::partnership::PartnershipStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RPartnershipRegister {
    pub captain_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub division_id: Uuid,
    pub season_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RPartnershipComplete {
    pub partner_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RSeasonClose {
    pub division_id: Uuid,
    pub season_id: Uuid,
    pub admin_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RPlayerSync {
    pub name: String,
}

/// Query string of `GET /partnerships/dissolved`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipQuery {
    pub status: Option<PartnershipStatus>,
    pub search: Option<String>,
    pub division_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonCloseSummary {
    pub expired_partnerships: u64,
    pub rejected_requests: u64,
}
