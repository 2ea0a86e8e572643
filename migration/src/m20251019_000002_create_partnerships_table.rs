use sea_orm_migration::prelude::*;

use crate::m20251019_000001_create_players_table::Players;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        // FKs are declared inline; SQLite cannot add them with ALTER TABLE.
        // withdrawal_request_id has no FK since withdrawal_requests points back here.
        m.create_table(
            Table::create()
                .table(Partnerships::Table)
                .if_not_exists()
                .col(ColumnDef::new(Partnerships::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Partnerships::CaptainId).uuid().not_null())
                .col(ColumnDef::new(Partnerships::PartnerId).uuid().null())
                .col(ColumnDef::new(Partnerships::DivisionId).uuid().not_null())
                .col(ColumnDef::new(Partnerships::SeasonId).uuid().not_null())
                .col(ColumnDef::new(Partnerships::Status).string_len(16).not_null())
                .col(ColumnDef::new(Partnerships::CreatedAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Partnerships::DissolvedAt).timestamp_with_time_zone().null())
                .col(ColumnDef::new(Partnerships::ExpiredAt).timestamp_with_time_zone().null())
                .col(ColumnDef::new(Partnerships::PredecessorId).uuid().null())
                .col(ColumnDef::new(Partnerships::WithdrawalRequestId).uuid().null())
                .col(ColumnDef::new(Partnerships::UpdatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_partnerships_captain")
                        .from(Partnerships::Table, Partnerships::CaptainId)
                        .to(Players::Table, Players::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_partnerships_partner")
                        .from(Partnerships::Table, Partnerships::PartnerId)
                        .to(Players::Table, Players::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_partnerships_predecessor")
                        .from(Partnerships::Table, Partnerships::PredecessorId)
                        .to(Partnerships::Table, Partnerships::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_partnerships_predecessor")
                .table(Partnerships::Table)
                .col(Partnerships::PredecessorId)
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_partnerships_context_status")
                .table(Partnerships::Table)
                .col(Partnerships::DivisionId)
                .col(Partnerships::SeasonId)
                .col(Partnerships::Status)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(Partnerships::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Partnerships {
    Table,
    Id,
    CaptainId,
    PartnerId,
    DivisionId,
    SeasonId,
    Status,
    CreatedAt,
    DissolvedAt,
    ExpiredAt,
    PredecessorId,
    WithdrawalRequestId,
    UpdatedAt,
}
