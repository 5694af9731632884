use crate::{
    entities::preview::{NewPreviewRequest, Preview, PreviewPublishedResponse},
    errors::AppError,
    repositories::preview::PreviewRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct PreviewHandler<R>
where
    R: PreviewRepository,
{
    pub preview_repo: R,
    public_base_url: String,
}

impl<R> PreviewHandler<R>
where
    R: PreviewRepository,
{
    pub fn new(preview_repo: R, public_base_url: &str) -> Self {
        PreviewHandler {
            preview_repo,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, id: &uuid::Uuid) -> String {
        format!("{}/published-preview/{}", self.public_base_url, id)
    }

    /// Stores a preview snapshot and returns its shareable link.
    pub async fn publish_preview(&self, request: NewPreviewRequest) -> Result<PreviewPublishedResponse, AppError> {
        let preview = request.prepare_for_insert()?;
        self.preview_repo.create_preview(&preview).await?;

        tracing::info!(id = %preview.id, apps = preview.selected_apps.len(), "Preview published");
        Ok(PreviewPublishedResponse {
            id: preview.id,
            public_url: self.public_url(&preview.id),
        })
    }

    pub async fn get_preview(&self, id: &str) -> Result<Preview, AppError> {
        let valid_id = valid_uuid(id, "Preview")?;
        self.preview_repo.get_preview(&valid_id).await
    }
}
