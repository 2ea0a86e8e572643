use actix_web::{web, App};
use std::sync::Arc;

use super::{init_config, TestContext, TEST_API_KEY};

pub struct TestClient;

impl TestClient {
    pub fn create_app(ctx: &TestContext) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        init_config();
        App::new()
            .app_data(web::Data::new(Arc::clone(&ctx.db)))
            .app_data(web::Data::new(Arc::clone(&ctx.engine)))
            .app_data(web::Data::new(Arc::clone(&ctx.review)))
            .configure(league_partnerships::routes::configure_routes)
    }

    pub fn auth_header() -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", TEST_API_KEY))
    }
}
