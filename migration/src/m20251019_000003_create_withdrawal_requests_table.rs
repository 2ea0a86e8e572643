use sea_orm_migration::prelude::*;

use crate::m20251019_000001_create_players_table::Players;
use crate::m20251019_000002_create_partnerships_table::Partnerships;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(WithdrawalRequests::Table)
                .if_not_exists()
                .col(ColumnDef::new(WithdrawalRequests::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(WithdrawalRequests::PartnershipId).uuid().not_null())
                .col(ColumnDef::new(WithdrawalRequests::RequestingUserId).uuid().not_null())
                .col(ColumnDef::new(WithdrawalRequests::Reason).text().not_null())
                .col(ColumnDef::new(WithdrawalRequests::ReasonKey).text().not_null())
                .col(ColumnDef::new(WithdrawalRequests::Status).string_len(16).not_null())
                .col(ColumnDef::new(WithdrawalRequests::RequestDate).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(WithdrawalRequests::ProcessedAt).timestamp_with_time_zone().null())
                .col(ColumnDef::new(WithdrawalRequests::ProcessedByAdminId).uuid().null())
                .col(ColumnDef::new(WithdrawalRequests::AdminNotes).text().null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_withdrawal_requests_partnership")
                        .from(WithdrawalRequests::Table, WithdrawalRequests::PartnershipId)
                        .to(Partnerships::Table, Partnerships::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_withdrawal_requests_requester")
                        .from(WithdrawalRequests::Table, WithdrawalRequests::RequestingUserId)
                        .to(Players::Table, Players::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_withdrawal_requests_partnership")
                .table(WithdrawalRequests::Table)
                .col(WithdrawalRequests::PartnershipId)
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_withdrawal_requests_status_date")
                .table(WithdrawalRequests::Table)
                .col(WithdrawalRequests::Status)
                .col(WithdrawalRequests::RequestDate)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(WithdrawalRequests::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum WithdrawalRequests {
    Table,
    Id,
    PartnershipId,
    RequestingUserId,
    Reason,
    ReasonKey,
    Status,
    RequestDate,
    ProcessedAt,
    ProcessedByAdminId,
    AdminNotes,
}
