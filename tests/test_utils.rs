#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use microapp_gallery::{
    client::GalleryClient,
    errors::UpstreamError,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    shared_repos::SharedRepositories,
    use_cases::studio::{CardGenerator, ImageHost},
    AppState,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{net::TcpListener, sync::Arc, time::Duration};

pub const PNG_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
pub const HOSTED_IMAGE_URL: &str = "https://i.ibb.co/test/card.png";

/// Replies with a fixed completion, or fails when none is set.
pub struct StubGenerator {
    pub reply: Option<String>,
}

#[async_trait]
impl CardGenerator for StubGenerator {
    async fn complete(&self, _description: &str) -> Result<String, UpstreamError> {
        self.reply.clone().ok_or_else(|| UpstreamError::Status {
            status: 500,
            message: "model unavailable".into(),
        })
    }
}

pub struct StubImageHost;

#[async_trait]
impl ImageHost for StubImageHost {
    async fn upload(&self, base64_image: &str) -> Result<String, UpstreamError> {
        if base64_image.starts_with("data:") {
            return Err(UpstreamError::InvalidResponse("prefix was not stripped".into()));
        }
        Ok(HOSTED_IMAGE_URL.to_string())
    }
}

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub api: GalleryClient,
    pub config: AppConfig,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_reply(Some(
            "Here you go:\n```json\n{\"type\":\"AdaptiveCard\",\"version\":\"1.5\",\"body\":[{\"type\":\"TextBlock\",\"text\":\"Hello\"}]}\n```".into(),
        ))
        .await
    }

    pub async fn spawn_with_reply(reply: Option<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let config = test_config(&address);
        let state = Arc::new(AppState::with_upstreams(
            &config,
            SharedRepositories::in_memory(),
            Arc::new(StubGenerator { reply }),
            Arc::new(StubImageHost),
        ));

        let max_json_payload_bytes = config.max_json_payload_bytes;
        let state_clone = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(state_clone.clone()))
                .wrap(NormalizePath::trim())
                .configure(|cfg| configure_routes(cfg, max_json_payload_bytes))
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let api = GalleryClient::new(&address).expect("valid test address");

        Self {
            address,
            client,
            api,
            config,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Publishes an item over raw HTTP and returns its id.
    pub async fn publish(&self, body: Value) -> String {
        let response = self.post_json("/api/publish", &body).await;
        let status = response.status();
        let payload: Value = response.json().await.expect("Publish response is JSON");
        assert_eq!(status, 201, "publish failed: {payload}");
        payload["id"].as_str().expect("id in publish response").to_string()
    }
}

/// A valid publish body for the given kind and tags.
pub fn publish_body(kind: &str, title: &str, categories: &[&str], providers: &[&str]) -> Value {
    json!({
        "kind": kind,
        "title": title,
        "description": format!("{title} description"),
        "categories": categories,
        "providers": providers,
        "cardJson": {"type": "AdaptiveCard", "version": "1.5", "body": []},
        "image": PNG_PIXEL,
    })
}

fn test_config(address: &str) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Micro-app Gallery Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        public_base_url: address.to_string(),
        ..AppConfig::default()
    }
}
