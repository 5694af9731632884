use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::studio::{GenerateCardRequest, GenerateMicroAppRequest, UploadImageRequest},
    errors::AppError,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn generate_card(
    state: web::Data<AppState>,
    data: web::Json<GenerateCardRequest>,
) -> Result<impl Responder, AppError> {
    let card = state.studio_handler.generate_card(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(card))
}

#[instrument(skip(state, data))]
pub async fn generate_micro_app(
    state: web::Data<AppState>,
    data: web::Json<GenerateMicroAppRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.studio_handler.generate_micro_app(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, data))]
pub async fn upload_image(
    state: web::Data<AppState>,
    data: web::Json<UploadImageRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.studio_handler.upload_image(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
