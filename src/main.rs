use actix_web::{middleware::Logger, web, App, HttpServer};
use league_partnerships::config::{EnvConfig, CONFIG};
use league_partnerships::db::database_service::DatabaseService;
use league_partnerships::lifecycle::LifecycleEngine;
use league_partnerships::review::ReviewService;
use league_partnerships::routes::configure_routes;
use std::sync::Arc;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = match EnvConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };
    let addr = format!("0.0.0.0:{}", config.port);

    let database = Arc::new(
        DatabaseService::new(&config.db_url, config.db_max_connections)
            .await
            .map_err(std::io::Error::other)?,
    );

    let engine = Arc::new(LifecycleEngine::new(database.connection()));
    let review = Arc::new(ReviewService::new(database.connection(), config.read_retry));
    let _ = CONFIG.set(config);

    info!("Starting server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(Arc::clone(&database)))
            .app_data(web::Data::new(Arc::clone(&engine)))
            .app_data(web::Data::new(Arc::clone(&review)))
            .configure(configure_routes)
    })
    .bind(addr)?
    .run()
    .await
}
