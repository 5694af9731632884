use actix_web::{http::header::ContentType, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::{
        filter::{FilterState, TagDimension},
        gallery_item::GalleryKind,
    },
    errors::AppError,
    pages::gallery::GalleryPage,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct GalleryPageQuery {
    #[serde(default)]
    pub kind: GalleryKind,
    pub categories: Option<String>,
    pub providers: Option<String>,
}

/// `GET /gallery`: the filterable gallery rendered server side.
#[instrument(skip(state, query))]
pub async fn gallery_page(
    state: web::Data<AppState>,
    query: web::Query<GalleryPageQuery>,
) -> Result<impl Responder, AppError> {
    let handler = &state.gallery_handler;
    let kind = query.kind;
    let filters = FilterState::from_query(query.categories.as_deref(), query.providers.as_deref());

    let (items, categories, providers) = futures::try_join!(
        handler.list_items(kind, &filters),
        handler.list_tags(TagDimension::Categories, Some(kind)),
        handler.list_tags(TagDimension::Providers, Some(kind)),
    )?;

    let html = GalleryPage {
        kind,
        items: items.iter().collect(),
        categories: &categories,
        providers: &providers,
        filters: &filters,
    }
    .render();

    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}
