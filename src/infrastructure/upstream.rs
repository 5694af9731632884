//! HTTP clients for the third-party services behind `/generate-card` and `/upload-image`.

pub mod imgbb;
pub mod openai;

use std::time::Duration;

use reqwest::Client;

use crate::errors::UpstreamError;

pub use imgbb::ImgBbImageHost;
pub use openai::OpenAiCardGenerator;

fn http_client(timeout: Duration) -> Result<Client, UpstreamError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(UpstreamError::from)
}

/// Shortens an upstream body for error messages.
fn truncate(body: &str) -> String {
    const LIMIT: usize = 300;
    match body.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
