use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod gallery;
mod json_error;
mod pages;
mod preview;
mod studio;

/// Registers every route. `max_json_payload_bytes` bounds JSON request bodies.
pub fn configure_routes(cfg: &mut web::ServiceConfig, max_json_payload_bytes: usize) {
    cfg.service(web::resource("/").route(web::get().to(home)));
    cfg.service(web::resource("/health").route(web::get().to(health_check)));

    cfg.service(
        web::scope("/api")
            .configure(gallery::config_routes)
            .configure(studio::config_api_routes)
    );

    cfg.configure(studio::config_routes);
    cfg.configure(preview::config_routes);
    cfg.configure(pages::config_routes);

    json_error::config_routes(cfg, max_json_payload_bytes);
}
