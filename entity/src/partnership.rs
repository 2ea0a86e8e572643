use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnershipStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "FORMING")]
    Forming,
    #[sea_orm(string_value = "DISSOLVED")]
    Dissolved,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

impl PartnershipStatus {
    /// Statuses that occupy a player's slot in a division/season.
    pub const OPEN: [PartnershipStatus; 2] = [PartnershipStatus::Active, PartnershipStatus::Forming];

    pub fn is_open(self) -> bool {
        matches!(self, PartnershipStatus::Active | PartnershipStatus::Forming)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_open()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partnerships")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub captain_id: Uuid,
    pub partner_id: Option<Uuid>,   // empty only while FORMING
    pub division_id: Uuid,
    pub season_id: Uuid,
    pub status: PartnershipStatus,
    pub created_at: DateTimeUtc,
    pub dissolved_at: Option<DateTimeUtc>,
    pub expired_at: Option<DateTimeUtc>,
    #[sea_orm(indexed)]
    pub predecessor_id: Option<Uuid>,
    pub withdrawal_request_id: Option<Uuid>,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn has_player(&self, player_id: Uuid) -> bool {
        self.captain_id == player_id || self.partner_id == Some(player_id)
    }

    /// The player who stays when `leaving` walks out. `None` if `leaving` is not
    /// on this team or the other slot is empty.
    pub fn remaining_player(&self, leaving: Uuid) -> Option<Uuid> {
        if self.captain_id == leaving {
            self.partner_id
        } else if self.partner_id == Some(leaving) {
            Some(self.captain_id)
        } else {
            None
        }
    }

    pub fn players(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.captain_id).chain(self.partner_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::CaptainId",
        to   = "super::player::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Captain,
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PartnerId",
        to   = "super::player::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Partner,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::PredecessorId",
        to   = "Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Predecessor,
    #[sea_orm(has_many = "super::withdrawal_request::Entity")]
    WithdrawalRequest,
}

impl Related<super::withdrawal_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WithdrawalRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
