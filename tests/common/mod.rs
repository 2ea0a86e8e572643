#![allow(dead_code)]

use std::sync::Arc;
use league_partnerships::config::{EnvConfig, ReadRetryConfig, CONFIG};
use league_partnerships::db::database_service::DatabaseService;
use league_partnerships::lifecycle::LifecycleEngine;
use league_partnerships::review::ReviewService;
use entity::partnership::Model as PartnershipModel;
use entity::withdrawal_request::Model as RequestModel;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

pub mod client;

pub const TEST_API_KEY: &str = "test-api-key";

pub struct TestContext {
    pub db: Arc<DatabaseService>,
    pub engine: Arc<LifecycleEngine>,
    pub review: Arc<ReviewService>,
    pub division: Uuid,
    pub season: Uuid,
}

impl TestContext {
    /// Fresh in-memory database with migrations applied.
    pub async fn new() -> TestContext {
        let db = Arc::new(
            DatabaseService::new("sqlite::memory:", 1)
                .await
                .expect("Failed to initialize DatabaseService")
        );
        Self::with_service(db)
    }

    pub fn with_service(db: Arc<DatabaseService>) -> TestContext {
        TestContext {
            engine: Arc::new(LifecycleEngine::new(db.connection())),
            review: Arc::new(ReviewService::new(db.connection(), ReadRetryConfig::default())),
            db,
            division: Uuid::now_v7(),
            season: Uuid::now_v7(),
        }
    }

    pub fn connection(&self) -> DatabaseConnection {
        self.db.connection()
    }

    pub async fn player(&self, name: &str) -> Uuid {
        let id = Uuid::now_v7();
        self.db.sync_player(id, name).await.expect("Failed to sync player");
        id
    }

    /// ACTIVE partnership of two fresh players in the context's division/season.
    pub async fn active_team(&self, captain: &str, partner: &str) -> (PartnershipModel, Uuid, Uuid) {
        let captain_id = self.player(captain).await;
        let partner_id = self.player(partner).await;
        let team = self
            .engine
            .register_partnership(captain_id, Some(partner_id), self.division, self.season)
            .await
            .expect("Failed to register partnership");
        (team, captain_id, partner_id)
    }

    pub async fn partnership(&self, id: Uuid) -> PartnershipModel {
        entity::partnership::Entity::find_by_id(id)
            .one(&self.connection())
            .await
            .expect("query failed")
            .expect("partnership missing")
    }

    pub async fn request(&self, id: Uuid) -> RequestModel {
        entity::withdrawal_request::Entity::find_by_id(id)
            .one(&self.connection())
            .await
            .expect("query failed")
            .expect("withdrawal request missing")
    }

    pub async fn all_partnerships(&self) -> Vec<PartnershipModel> {
        entity::partnership::Entity::find().all(&self.connection()).await.expect("query failed")
    }

    pub async fn all_requests(&self) -> Vec<RequestModel> {
        entity::withdrawal_request::Entity::find().all(&self.connection()).await.expect("query failed")
    }
}

pub fn get_test_config() -> EnvConfig {
    EnvConfig {
        port: 8080,
        db_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        api_key: TEST_API_KEY.to_string(),
        read_retry: ReadRetryConfig::default(),
    }
}

pub fn init_config() {
    CONFIG.get_or_init(get_test_config);
}
