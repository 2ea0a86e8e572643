use crate::utils::webutils::{json_config, path_config, query_config, validate_token};
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub mod health;
pub mod partnership;
pub mod player;
pub mod season;
pub mod withdrawal;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let auth = HttpAuthentication::bearer(validate_token);

    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config());

    cfg.service(
        web::scope("/health").service(health::health)
    );
    cfg.service(
        web::scope("/players")
            .service(player::sync::sync_player)
            .wrap(auth.clone())
    );
    cfg.service(
        web::scope("/partnerships")
            // static segment first so it is not taken for an id
            .service(partnership::list::list_dissolved)
            .service(partnership::register::register)
            .service(partnership::complete::complete)
            .service(partnership::detail::detail)
            .service(partnership::detail::timeline)
            .wrap(auth.clone())
    );
    cfg.service(
        web::scope("/withdrawals")
            .service(withdrawal::list::list)
            .service(withdrawal::submit::submit)
            .service(withdrawal::decide::approve)
            .service(withdrawal::decide::reject)
            .service(withdrawal::detail::detail)
            .service(withdrawal::detail::timeline)
            .wrap(auth.clone())
    );
    cfg.service(
        web::scope("/seasons")
            .service(season::close::close)
            .wrap(auth)
    );
}
