use actix_web::web;

use crate::handlers::preview;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/publish-preview")
            .route(web::post().to(preview::publish_preview))
    )
    .service(
        web::resource("/preview/{preview_id}")
            .route(web::get().to(preview::get_preview))
    )
    .service(
        web::resource("/published-preview/{preview_id}")
            .route(web::get().to(preview::published_preview_page))
    );
}
