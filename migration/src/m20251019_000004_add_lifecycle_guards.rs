use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Partial unique indexes. Same syntax on PostgreSQL and SQLite, which sea-query's
// index builder does not cover.
const GUARDS: [(&str, &str); 3] = [
    (
        "uk_withdrawal_requests_one_pending",
        "CREATE UNIQUE INDEX IF NOT EXISTS uk_withdrawal_requests_one_pending \
         ON withdrawal_requests (partnership_id) WHERE status = 'PENDING'",
    ),
    (
        "uk_partnerships_open_captain",
        "CREATE UNIQUE INDEX IF NOT EXISTS uk_partnerships_open_captain \
         ON partnerships (captain_id, division_id, season_id) \
         WHERE status IN ('ACTIVE', 'FORMING')",
    ),
    (
        "uk_partnerships_open_partner",
        "CREATE UNIQUE INDEX IF NOT EXISTS uk_partnerships_open_partner \
         ON partnerships (partner_id, division_id, season_id) \
         WHERE status IN ('ACTIVE', 'FORMING') AND partner_id IS NOT NULL",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        for (_, sql) in GUARDS {
            m.get_connection().execute_unprepared(sql).await?;
        }
        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        for (name, _) in GUARDS {
            m.get_connection()
                .execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }
        Ok(())
    }
}
