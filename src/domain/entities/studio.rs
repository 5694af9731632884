use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::gallery_item::{validate_required, validate_tags};

const MAX_DESCRIPTION_LENGTH: u64 = 4000;

/// Body of `POST /generate-card`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateCardRequest {
    #[validate(
        custom(function = "validate_required", message = "Description is required"),
        length(max = MAX_DESCRIPTION_LENGTH, message = "Description must be at most 4000 characters")
    )]
    pub description: String,
}

/// Body of `POST /api/generate-micro-app`: the metadata of a gallery item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GenerateMicroAppRequest {
    #[validate(
        custom(function = "validate_required", message = "Title is required"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH, message = "Description must be at most 4000 characters"))]
    pub description: String,

    #[validate(custom(function = "validate_tags"))]
    pub categories: Vec<String>,

    #[validate(custom(function = "validate_tags"))]
    pub providers: Vec<String>,
}

impl GenerateMicroAppRequest {
    /// Folds the item metadata into one description for the card generator.
    pub fn to_description(&self) -> String {
        let mut text = format!("a complete micro-app named \"{}\"", self.title.trim());
        let description = self.description.trim();
        if !description.is_empty() {
            text.push_str(&format!(" that {description}"));
        }
        if !self.categories.is_empty() {
            text.push_str(&format!(". Categories: {}", self.categories.join(", ")));
        }
        if !self.providers.is_empty() {
            text.push_str(&format!(". Works with: {}", self.providers.join(", ")));
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMicroAppResponse {
    pub success: bool,
    /// Pretty-printed card JSON, ready to copy.
    pub micro_app_json: String,
}

/// Body of `POST /upload-image`: a data URI or bare base64.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    #[validate(length(min = 1, message = "Image data is required"))]
    pub image_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_request_uses_camel_case() {
        let request: UploadImageRequest =
            serde_json::from_value(json!({"imageData": "data:image/png;base64,AAAA"})).unwrap();
        assert!(request.image_data.starts_with("data:image/png"));
    }

    #[test]
    fn blank_description_is_rejected() {
        let request = GenerateCardRequest { description: String::new() };
        assert!(request.validate().is_err());
    }

    #[test]
    fn overlong_description_reports_length() {
        let request = GenerateCardRequest { description: "d".repeat(4001) };
        let errors = request.validate().unwrap_err();
        let message = errors.field_errors()["description"][0].message.clone().unwrap();
        assert_eq!(message, "Description must be at most 4000 characters");
    }

    #[test]
    fn micro_app_description_includes_metadata() {
        let request = GenerateMicroAppRequest {
            title: "Leave request".into(),
            description: "lets staff ask for time off".into(),
            categories: vec!["HR".into()],
            providers: vec!["Slack".into(), "Teams".into()],
        };
        assert_eq!(
            request.to_description(),
            "a complete micro-app named \"Leave request\" that lets staff ask for time off. \
Categories: HR. Works with: Slack, Teams"
        );
    }

    #[test]
    fn micro_app_request_requires_title() {
        let errors = GenerateMicroAppRequest::default().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn micro_app_response_uses_camel_case() {
        let response = GenerateMicroAppResponse { success: true, micro_app_json: "{}".into() };
        assert_eq!(serde_json::to_value(response).unwrap(), json!({"success": true, "microAppJson": "{}"}));
    }
}
