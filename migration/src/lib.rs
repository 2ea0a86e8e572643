pub use sea_orm_migration::prelude::*;

mod m20251019_000001_create_players_table;
mod m20251019_000002_create_partnerships_table;
mod m20251019_000003_create_withdrawal_requests_table;
mod m20251019_000004_add_lifecycle_guards;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251019_000001_create_players_table::Migration),
            Box::new(m20251019_000002_create_partnerships_table::Migration),
            Box::new(m20251019_000003_create_withdrawal_requests_table::Migration),
            Box::new(m20251019_000004_add_lifecycle_guards::Migration),
        ]
    }
}
