use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::gallery_item::{new_validation_error, validate_required},
    utils::data_uri::DataUri,
};

const MAX_APP_NAME_LENGTH: u64 = 100;
const MAX_SELECTED_APPS: u64 = 50;

/// A micro-app picked into a preview's shortcut list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreviewApp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[validate(
        custom(function = "validate_required", message = "App title is required"),
        length(max = 200, message = "App title must be at most 200 characters")
    )]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_json: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPreviewRequest {
    #[validate(
        custom(function = "validate_required", message = "App name is required"),
        length(max = MAX_APP_NAME_LENGTH, message = "App name must be at most 100 characters")
    )]
    pub app_name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_logo"))]
    pub logo: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_SELECTED_APPS), nested)]
    pub selected_apps: Vec<PreviewApp>,

    /// Client-side publish time; defaults to the server clock.
    #[serde(default, alias = "timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub id: Uuid,
    pub app_name: String,
    pub logo: Option<String>,
    pub selected_apps: Vec<PreviewApp>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PreviewRow {
    pub id: Uuid,
    pub app_name: String,
    pub logo: Option<String>,
    pub selected_apps: sqlx::types::Json<Vec<PreviewApp>>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPublishedResponse {
    pub id: Uuid,
    pub public_url: String,
}

/// Accepts an image data URI or an absolute http(s) URL. A blank logo means
/// none was picked and the page falls back to the default.
pub fn validate_logo(logo: &str) -> Result<(), ValidationError> {
    if logo.trim().is_empty() {
        return Ok(());
    }
    if logo.starts_with("data:") {
        return DataUri::parse_image(logo)
            .map(|_| ())
            .map_err(|_| new_validation_error("logo_invalid", "Logo must be a valid image data URI"));
    }
    match url::Url::parse(logo) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(new_validation_error("logo_invalid", "Logo must be an image data URI or an http(s) URL")),
    }
}

impl NewPreviewRequest {
    pub fn prepare_for_insert(self) -> Result<Preview, validator::ValidationErrors> {
        self.validate()?;

        let now = Utc::now();
        Ok(Preview {
            id: Uuid::new_v4(),
            app_name: self.app_name.trim().to_string(),
            logo: self.logo.filter(|l| !l.trim().is_empty()),
            selected_apps: self.selected_apps,
            published_at: self.published_at.unwrap_or(now),
            created_at: now,
        })
    }
}

impl From<PreviewRow> for Preview {
    fn from(row: PreviewRow) -> Self {
        Preview {
            id: row.id,
            app_name: row.app_name,
            logo: row.logo,
            selected_apps: row.selected_apps.0,
            published_at: row.published_at,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_timestamp_alias_and_url_logo() {
        let request: NewPreviewRequest = serde_json::from_value(json!({
            "appName": "Companion",
            "logo": "https://cdn.example.com/logo.png",
            "selectedApps": [{"title": "Leave request", "icon": "fas fa-plane"}],
            "timestamp": "2024-11-25T10:00:00Z"
        }))
        .unwrap();

        let preview = request.prepare_for_insert().unwrap();
        assert_eq!(preview.selected_apps.len(), 1);
        assert_eq!(preview.published_at.to_rfc3339(), "2024-11-25T10:00:00+00:00");
    }

    #[test]
    fn rejects_css_wrapped_logo() {
        let request = NewPreviewRequest {
            app_name: "Companion".into(),
            logo: Some("url(data:image/png;base64,AAAA)".into()),
            selected_apps: vec![],
            published_at: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn nested_apps_are_validated() {
        let request = NewPreviewRequest {
            app_name: "Companion".into(),
            logo: None,
            selected_apps: vec![PreviewApp { id: None, title: String::new(), icon: None, card_json: None }],
            published_at: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("selected_apps"));
    }

    #[test]
    fn empty_logo_means_no_logo() {
        let request: NewPreviewRequest = serde_json::from_value(json!({
            "appName": "Companion",
            "logo": "",
            "selectedApps": [{"title": "Leave request"}]
        }))
        .unwrap();

        let preview = request.prepare_for_insert().unwrap();
        assert_eq!(preview.logo, None);
    }

    #[test]
    fn overlong_app_name_reports_length() {
        let request = NewPreviewRequest {
            app_name: "x".repeat(101),
            logo: None,
            selected_apps: vec![],
            published_at: None,
        };
        let errors = request.validate().unwrap_err();
        let message = errors.field_errors()["app_name"][0].message.clone().unwrap();
        assert_eq!(message, "App name must be at most 100 characters");
    }

    #[test]
    fn blank_app_name_is_rejected() {
        let request = NewPreviewRequest {
            app_name: String::new(),
            logo: None,
            selected_apps: vec![],
            published_at: None,
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("app_name"));
    }
}
