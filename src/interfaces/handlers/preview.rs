use actix_web::{http::header::ContentType, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::preview::NewPreviewRequest,
    errors::AppError,
    pages::preview::render_published_preview,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn publish_preview(
    state: web::Data<AppState>,
    data: web::Json<NewPreviewRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.preview_handler.publish_preview(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state))]
pub async fn get_preview(
    preview_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let preview = state.preview_handler.get_preview(&preview_id).await?;
    Ok(HttpResponse::Ok().json(preview))
}

#[instrument(skip(state))]
pub async fn published_preview_page(
    preview_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let preview = state.preview_handler.get_preview(&preview_id).await?;
    let html = render_published_preview(&preview)
        .map_err(|e| AppError::InternalError(format!("Failed to embed preview: {e}")))?;

    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}
