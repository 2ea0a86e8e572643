use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

#[derive(Clone)]
pub struct DatabaseService {
    pub(crate) database_connection: DatabaseConnection,
}

impl DatabaseService {
    pub async fn new(uri: &str, max_connections: u32) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(uri.to_owned());
        options.max_connections(max_connections).sqlx_logging(false);
        if uri.contains(":memory:") {
            // every in-memory SQLite connection is a separate database
            options.max_connections(1).min_connections(1);
        }

        info!("Connecting to database...");
        let db = Database::connect(options).await?;
        info!("Running migrations...");
        Migrator::up(&db, None).await?;
        info!("Migrations finished.");
        Ok(Self { database_connection: db })
    }

    /// Pooled handle; cloning shares the pool.
    pub fn connection(&self) -> DatabaseConnection {
        self.database_connection.clone()
    }
}
