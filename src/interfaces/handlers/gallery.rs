use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    constants::IDEMPOTENCY_KEY_HEADER,
    entities::{
        filter::{FilterState, TagDimension},
        gallery_item::{GalleryKind, PublishRequest},
    },
    errors::AppError,
    AppState,
};

/// `?categories=a,b&providers=c`
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub categories: Option<String>,
    pub providers: Option<String>,
}

impl FilterQuery {
    pub fn to_filters(&self) -> FilterState {
        FilterState::from_query(self.categories.as_deref(), self.providers.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KindQuery {
    pub kind: Option<GalleryKind>,
}

async fn list_gallery(
    state: &AppState,
    kind: GalleryKind,
    query: &FilterQuery,
) -> Result<HttpResponse, AppError> {
    let items = state.gallery_handler
        .list_items(kind, &query.to_filters())
        .await?;

    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip(state, query))]
pub async fn list_micro_apps(
    state: web::Data<AppState>,
    query: web::Query<FilterQuery>,
) -> Result<impl Responder, AppError> {
    list_gallery(&state, GalleryKind::MicroApp, &query).await
}

#[instrument(skip(state, query))]
pub async fn list_cards(
    state: web::Data<AppState>,
    query: web::Query<FilterQuery>,
) -> Result<impl Responder, AppError> {
    list_gallery(&state, GalleryKind::Card, &query).await
}

#[instrument(skip(state, query))]
pub async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<KindQuery>,
) -> Result<impl Responder, AppError> {
    let categories = state.gallery_handler
        .list_tags(TagDimension::Categories, query.kind)
        .await?;

    Ok(HttpResponse::Ok().json(categories))
}

#[instrument(skip(state, query))]
pub async fn list_providers(
    state: web::Data<AppState>,
    query: web::Query<KindQuery>,
) -> Result<impl Responder, AppError> {
    let providers = state.gallery_handler
        .list_tags(TagDimension::Providers, query.kind)
        .await?;

    Ok(HttpResponse::Ok().json(providers))
}

#[instrument(skip(state))]
pub async fn get_micro_app(
    item_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let item = state.gallery_handler.get_item(&item_id, GalleryKind::MicroApp).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[instrument(skip(state))]
pub async fn get_card(
    item_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let item = state.gallery_handler.get_item(&item_id, GalleryKind::Card).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[instrument(skip(state))]
pub async fn upvote(
    item_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let response = state.gallery_handler.upvote(&item_id, None).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn upvote_micro_app(
    item_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let response = state.gallery_handler.upvote(&item_id, Some(GalleryKind::MicroApp)).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn upvote_card(
    item_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let response = state.gallery_handler.upvote(&item_id, Some(GalleryKind::Card)).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn downvote(
    item_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let response = state.gallery_handler.downvote(&item_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(req, state, data))]
pub async fn publish(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<PublishRequest>,
) -> Result<impl Responder, AppError> {
    let mut request = data.into_inner();

    if request.idempotency_key.is_none() {
        request.idempotency_key = req
            .headers()
            .get(IDEMPOTENCY_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
    }

    let response = state.gallery_handler.publish(request).await?;
    Ok(HttpResponse::Created().json(response))
}
