use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    errors::UpstreamError,
    settings::AppConfig,
    use_cases::studio::ImageHost,
};

use super::{http_client, truncate};

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
    error: Option<UploadError>,
}

#[derive(Deserialize)]
struct UploadData {
    url: String,
}

#[derive(Deserialize)]
struct UploadError {
    message: String,
}

pub struct ImgBbImageHost {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ImgBbImageHost {
    pub fn new(config: &AppConfig) -> Result<Self, UpstreamError> {
        Ok(ImgBbImageHost {
            client: http_client(config.upstream_timeout())?,
            base_url: config.imgbb_base_url.trim_end_matches('/').to_string(),
            api_key: config.imgbb_api_key.clone(),
        })
    }
}

fn parse_upload(status: u16, body: &str) -> Result<String, UpstreamError> {
    let parsed = serde_json::from_str::<UploadResponse>(body);

    match parsed {
        Ok(UploadResponse { success: true, data: Some(data), .. }) if (200..300).contains(&status) => Ok(data.url),
        Ok(UploadResponse { error: Some(error), .. }) => Err(UpstreamError::Status { status, message: error.message }),
        Ok(_) if (200..300).contains(&status) => {
            Err(UpstreamError::InvalidResponse("upload response carried no image URL".into()))
        }
        _ => Err(UpstreamError::Status { status, message: truncate(body) }),
    }
}

#[async_trait]
impl ImageHost for ImgBbImageHost {
    #[tracing::instrument(skip(self, base64_image), fields(bytes = base64_image.len()))]
    async fn upload(&self, base64_image: &str) -> Result<String, UpstreamError> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::NotConfigured("ImgBB API key"));
        }

        let response = self.client
            .post(format!("{}/1/upload", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .form(&[("image", base64_image)])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        let url = parse_upload(status, &body).inspect_err(|e| {
            tracing::warn!(status, error = %e, "Image upload failed");
        })?;

        tracing::info!(%url, "Image uploaded");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_hosted_url() {
        let body = r#"{"data":{"id":"2ndCYJK","url":"https://i.ibb.co/w04Prt6/c1f64245afb2.png"},"success":true,"status":200}"#;
        assert_eq!(parse_upload(200, body).unwrap(), "https://i.ibb.co/w04Prt6/c1f64245afb2.png");
    }

    #[test]
    fn surfaces_host_error_message() {
        let body = r#"{"status_code":400,"error":{"message":"Invalid API v1 key.","code":100},"status_txt":"Bad Request"}"#;
        let err = parse_upload(400, body).unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 400, message } if message == "Invalid API v1 key."));
    }

    #[test]
    fn non_json_failure_keeps_body() {
        let err = parse_upload(503, "Service Unavailable").unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 503, message } if message == "Service Unavailable"));
    }
}
