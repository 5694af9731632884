use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use validator::Validate;

use crate::{
    entities::studio::{
        GenerateCardRequest, GenerateMicroAppRequest, GenerateMicroAppResponse, UploadImageRequest,
        UploadImageResponse,
    },
    errors::{AppError, UpstreamError},
    utils::{card_json::extract_card_json, data_uri::strip_data_uri_prefix},
};

/// A language model that answers a card description with (hopefully) card JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardGenerator: Send + Sync {
    async fn complete(&self, description: &str) -> Result<String, UpstreamError>;
}

/// Hosts a base64 image and returns its public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, base64_image: &str) -> Result<String, UpstreamError>;
}

#[async_trait]
impl<T: CardGenerator + ?Sized> CardGenerator for Arc<T> {
    async fn complete(&self, description: &str) -> Result<String, UpstreamError> {
        (**self).complete(description).await
    }
}

#[async_trait]
impl<T: ImageHost + ?Sized> ImageHost for Arc<T> {
    async fn upload(&self, base64_image: &str) -> Result<String, UpstreamError> {
        (**self).upload(base64_image).await
    }
}

pub struct StudioHandler<G, H>
where
    G: CardGenerator,
    H: ImageHost,
{
    pub generator: G,
    pub image_host: H,
}

impl<G, H> StudioHandler<G, H>
where
    G: CardGenerator,
    H: ImageHost,
{
    pub fn new(generator: G, image_host: H) -> Self {
        StudioHandler { generator, image_host }
    }

    pub async fn generate_card(&self, request: GenerateCardRequest) -> Result<Value, AppError> {
        request.validate()?;
        self.complete_card(request.description.trim()).await
    }

    /// Expands a gallery item's metadata into a full card, returned as text.
    pub async fn generate_micro_app(
        &self,
        request: GenerateMicroAppRequest,
    ) -> Result<GenerateMicroAppResponse, AppError> {
        request.validate()?;

        let card = self.complete_card(&request.to_description()).await?;
        let micro_app_json = serde_json::to_string_pretty(&card)
            .map_err(|e| AppError::InternalError(format!("Failed to format card JSON: {e}")))?;

        Ok(GenerateMicroAppResponse { success: true, micro_app_json })
    }

    async fn complete_card(&self, description: &str) -> Result<Value, AppError> {
        let reply = self.generator.complete(description).await?;
        extract_card_json(&reply).ok_or_else(|| {
            tracing::warn!(reply_len = reply.len(), "Model reply contained no card JSON");
            AppError::from(UpstreamError::UnparsableCard)
        })
    }

    pub async fn upload_image(&self, request: UploadImageRequest) -> Result<UploadImageResponse, AppError> {
        request.validate()?;

        let payload = strip_data_uri_prefix(request.image_data.trim());
        if payload.is_empty() {
            return Err(AppError::InvalidInput("Image data is required".into()));
        }

        let url = self.image_host.upload(payload).await?;
        Ok(UploadImageResponse { url })
    }
}
