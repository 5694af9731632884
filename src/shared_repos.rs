use std::sync::Arc;

use serde::Serialize;

use crate::{
    db::postgres::{create_pool, run_migrations},
    errors::AppError,
    repositories::{
        gallery::GalleryRepository,
        memory::{MemoryGalleryRepo, MemoryPreviewRepo},
        preview::PreviewRepository,
        sqlx_repo::{SqlxGalleryRepo, SqlxPreviewRepo},
    },
    settings::AppConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

#[derive(Clone)]
pub struct SharedRepositories {
    pub gallery_repo: Arc<dyn GalleryRepository>,
    pub preview_repo: Arc<dyn PreviewRepository>,
    pub backend: StorageBackend,
}

impl SharedRepositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            gallery_repo: Arc::new(SqlxGalleryRepo::new(pool.clone())),
            preview_repo: Arc::new(SqlxPreviewRepo::new(pool)),
            backend: StorageBackend::Postgres,
        }
    }

    pub fn in_memory() -> Self {
        SharedRepositories {
            gallery_repo: Arc::new(MemoryGalleryRepo::new()),
            preview_repo: Arc::new(MemoryPreviewRepo::new()),
            backend: StorageBackend::Memory,
        }
    }

    /// Connects and migrates when a database URL is configured, otherwise
    /// falls back to process-local storage.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        if !config.uses_database() {
            tracing::warn!("No DATABASE_URL configured; published items live in memory only");
            return Ok(Self::in_memory());
        }

        let pool = create_pool(&config.database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::postgres(pool))
    }
}
