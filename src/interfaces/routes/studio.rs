use actix_web::web;

use crate::handlers::studio;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/generate-card")
            .route(web::post().to(studio::generate_card))
    )
    .service(
        web::resource("/upload-image")
            .route(web::post().to(studio::upload_image))
    );
}

/// Studio routes served under `/api`.
pub fn config_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/generate-micro-app")
            .route(web::post().to(studio::generate_micro_app))
    );
}
