use actix_web::web;

use crate::handlers::gallery;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/gallery")
            .route(web::get().to(gallery::list_micro_apps))
    )
    .service(
        web::resource("/microappgallery")
            .route(web::get().to(gallery::list_micro_apps))
    )
    .service(
        web::resource("/cardgallery")
            .route(web::get().to(gallery::list_cards))
    )
    .service(
        web::resource("/categories")
            .route(web::get().to(gallery::list_categories))
    )
    .service(
        web::resource("/providers")
            .route(web::get().to(gallery::list_providers))
    )
    .service(
        web::resource("/micro-app/{item_id}")
            .route(web::get().to(gallery::get_micro_app))
    )
    .service(
        web::resource("/card/{item_id}")
            .route(web::get().to(gallery::get_card))
    )
    .service(
        web::resource("/upvote/{item_id}")
            .route(web::post().to(gallery::upvote))
    )
    .service(
        web::resource("/upvotemicroapp/{item_id}")
            .route(web::post().to(gallery::upvote_micro_app))
    )
    .service(
        web::resource("/upvotecard/{item_id}")
            .route(web::post().to(gallery::upvote_card))
    )
    .service(
        web::resource("/downvote/{item_id}")
            .route(web::post().to(gallery::downvote))
    )
    .service(
        web::resource("/publish")
            .route(web::post().to(gallery::publish))
    );
}
