use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, pages, repositories, routes};
pub use infrastructure::{client, db, upstream, utils};

use errors::UpstreamError;
use repositories::{gallery::GalleryRepository, preview::PreviewRepository};
use settings::AppConfig;
use shared_repos::{SharedRepositories, StorageBackend};
use upstream::{ImgBbImageHost, OpenAiCardGenerator};
use use_cases::{
    gallery::GalleryHandler,
    preview::PreviewHandler,
    studio::{CardGenerator, ImageHost, StudioHandler},
};

pub struct AppState {
    pub gallery_handler: AppGalleryHandler,
    pub preview_handler: AppPreviewHandler,
    pub studio_handler: AppStudioHandler,
    pub storage: StorageBackend,
}

pub type AppGalleryHandler = GalleryHandler<Arc<dyn GalleryRepository>>;
pub type AppPreviewHandler = PreviewHandler<Arc<dyn PreviewRepository>>;
pub type AppStudioHandler = StudioHandler<Arc<dyn CardGenerator>, Arc<dyn ImageHost>>;

impl AppState {
    pub fn new(config: &AppConfig, repos: SharedRepositories) -> Result<Self, UpstreamError> {
        let generator = OpenAiCardGenerator::new(config)?;
        let image_host = ImgBbImageHost::new(config)?;

        Ok(Self::with_upstreams(config, repos, Arc::new(generator), Arc::new(image_host)))
    }

    /// Builds the state around caller-chosen upstreams.
    pub fn with_upstreams(
        config: &AppConfig,
        repos: SharedRepositories,
        generator: Arc<dyn CardGenerator>,
        image_host: Arc<dyn ImageHost>,
    ) -> Self {
        AppState {
            gallery_handler: GalleryHandler::new(repos.gallery_repo),
            preview_handler: PreviewHandler::new(repos.preview_repo, &config.public_base_url),
            studio_handler: StudioHandler::new(generator, image_host),
            storage: repos.backend,
        }
    }
}
