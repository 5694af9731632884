//! Typed client for the gallery HTTP API, used the way the browser pages use it.

use derive_more::Display;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::{
    entities::{
        filter::FilterState,
        gallery_item::{GalleryItem, GalleryItemSummary, GalleryKind, PublishRequest, PublishedResponse, UpvoteResponse},
        preview::{NewPreviewRequest, Preview, PreviewPublishedResponse},
        studio::{GenerateCardRequest, GenerateMicroAppRequest, GenerateMicroAppResponse, UploadImageRequest, UploadImageResponse},
    },
    errors::FieldError,
    use_cases::gallery_view::GallerySnapshot,
};

#[derive(Debug, Display)]
pub enum ClientError {
    #[display("invalid base URL: {_0}")]
    InvalidBaseUrl(String),

    #[display("request failed: {_0}")]
    Transport(String),

    #[display("not found: {_0}")]
    NotFound(String),

    #[display("validation failed: {message}")]
    Validation { message: String, details: Vec<FieldError> },

    #[display("upstream error: {_0}")]
    Upstream(String),

    #[display("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    details: Vec<FieldError>,
}

#[derive(Clone)]
pub struct GalleryClient {
    http: Client,
    base_url: Url,
}

impl GalleryClient {
    /// `base_url` is the service root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(GalleryClient { http, base_url })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        let message = if body.error.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            body.error
        };

        Err(match status {
            StatusCode::BAD_REQUEST => ClientError::Validation { message, details: body.details },
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_GATEWAY => ClientError::Upstream(message),
            other => ClientError::Api { status: other.as_u16(), message },
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, url: Url, body: &B) -> Result<T, ClientError> {
        let response = self.http.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    fn list_path(kind: GalleryKind) -> &'static str {
        match kind {
            GalleryKind::Card => "api/cardgallery",
            GalleryKind::MicroApp => "api/microappgallery",
        }
    }

    fn item_path(kind: GalleryKind, id: &Uuid) -> String {
        match kind {
            GalleryKind::Card => format!("api/card/{id}"),
            GalleryKind::MicroApp => format!("api/micro-app/{id}"),
        }
    }

    pub async fn list_items(&self, kind: GalleryKind, filters: &FilterState) -> Result<Vec<GalleryItemSummary>, ClientError> {
        let mut url = self.url(Self::list_path(kind))?;
        let query = filters.to_query();
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        self.get(url).await
    }

    async fn list_tags(&self, path: &str, kind: Option<GalleryKind>) -> Result<Vec<String>, ClientError> {
        let mut url = self.url(path)?;
        if let Some(kind) = kind {
            url.query_pairs_mut().append_pair("kind", kind.as_str());
        }
        self.get(url).await
    }

    pub async fn list_categories(&self, kind: Option<GalleryKind>) -> Result<Vec<String>, ClientError> {
        self.list_tags("api/categories", kind).await
    }

    pub async fn list_providers(&self, kind: Option<GalleryKind>) -> Result<Vec<String>, ClientError> {
        self.list_tags("api/providers", kind).await
    }

    /// Items and both vocabularies, fetched concurrently.
    pub async fn load_gallery(&self, kind: GalleryKind, filters: &FilterState) -> Result<GallerySnapshot, ClientError> {
        let (items, categories, providers) = futures::try_join!(
            self.list_items(kind, filters),
            self.list_categories(Some(kind)),
            self.list_providers(Some(kind)),
        )?;

        Ok(GallerySnapshot { items, categories, providers })
    }

    pub async fn get_item(&self, kind: GalleryKind, id: &Uuid) -> Result<GalleryItem, ClientError> {
        self.get(self.url(&Self::item_path(kind, id))?).await
    }

    pub async fn upvote(&self, kind: Option<GalleryKind>, id: &Uuid) -> Result<u64, ClientError> {
        let path = match kind {
            Some(GalleryKind::Card) => format!("api/upvotecard/{id}"),
            Some(GalleryKind::MicroApp) => format!("api/upvotemicroapp/{id}"),
            None => format!("api/upvote/{id}"),
        };
        let response: UpvoteResponse = self.post(self.url(&path)?, &Value::Null).await?;
        Ok(response.upvotes)
    }

    pub async fn downvote(&self, id: &Uuid) -> Result<u64, ClientError> {
        let response: UpvoteResponse = self.post(self.url(&format!("api/downvote/{id}"))?, &Value::Null).await?;
        Ok(response.upvotes)
    }

    /// Publishes an item. Without a caller-supplied key one is generated per
    /// call, so a caller retrying the same request should pass its own.
    pub async fn publish(&self, mut request: PublishRequest) -> Result<Uuid, ClientError> {
        if request.idempotency_key.is_none() {
            request.idempotency_key = Some(Uuid::new_v4().to_string());
        }
        let response: PublishedResponse = self.post(self.url("api/publish")?, &request).await?;
        Ok(response.id)
    }

    pub async fn generate_card(&self, description: &str) -> Result<Value, ClientError> {
        let request = GenerateCardRequest { description: description.to_string() };
        self.post(self.url("generate-card")?, &request).await
    }

    /// Asks the server to expand an item's metadata into a full card; returns the JSON text.
    pub async fn generate_micro_app(&self, request: &GenerateMicroAppRequest) -> Result<String, ClientError> {
        let response: GenerateMicroAppResponse = self.post(self.url("api/generate-micro-app")?, request).await?;
        Ok(response.micro_app_json)
    }

    pub async fn upload_image(&self, image_data: &str) -> Result<String, ClientError> {
        let request = UploadImageRequest { image_data: image_data.to_string() };
        let response: UploadImageResponse = self.post(self.url("upload-image")?, &request).await?;
        Ok(response.url)
    }

    pub async fn publish_preview(&self, request: &NewPreviewRequest) -> Result<PreviewPublishedResponse, ClientError> {
        self.post(self.url("publish-preview")?, request).await
    }

    pub async fn get_preview(&self, id: &Uuid) -> Result<Preview, ClientError> {
        self.get(self.url(&format!("preview/{id}"))?).await
    }
}
