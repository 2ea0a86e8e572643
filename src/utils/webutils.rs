use actix_web::{dev::ServiceRequest, error::ErrorUnauthorized, web, HttpRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use tracing::warn;

use crate::config::config;
use crate::types::error::AppError;

/// Dashboard calls carry the shared API key as a bearer token.
pub async fn validate_token(req: ServiceRequest, credentials: BearerAuth) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    match config() {
        Some(cfg) if credentials.token() == cfg.api_key => Ok(req),
        Some(_) => {
            warn!("Rejected request to {} with an invalid token", req.path());
            Err((ErrorUnauthorized("Invalid token"), req))
        }
        None => Err((ErrorUnauthorized("Server not configured"), req)),
    }
}

/// Malformed JSON bodies and query strings answer with the same error body as handlers.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| AppError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| AppError::BadRequest(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| AppError::BadRequest(err.to_string()).into())
}
