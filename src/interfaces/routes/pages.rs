use actix_web::web;

use crate::handlers::pages;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/gallery")
            .route(web::get().to(pages::gallery_page))
    );
}
