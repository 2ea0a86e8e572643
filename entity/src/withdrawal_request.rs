use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawal_requests")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub partnership_id: Uuid,
    pub requesting_user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    #[sea_orm(column_type = "Text")]
    #[serde(skip)]
    pub reason_key: String,
    pub status: WithdrawalStatus,
    pub request_date: DateTimeUtc,
    pub processed_at: Option<DateTimeUtc>,
    pub processed_by_admin_id: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::partnership::Entity",
        from = "Column::PartnershipId",
        to   = "super::partnership::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Partnership,
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::RequestingUserId",
        to   = "super::player::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    RequestingPlayer,
}

impl Related<super::partnership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partnership.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
