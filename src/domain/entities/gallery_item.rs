use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::filter::Tagged,
    utils::data_uri::DataUri,
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_DESCRIPTION_LENGTH: u64 = 2000;
const MAX_TAGS: usize = 20;
const MAX_TAG_LENGTH: usize = 40;
const MIN_IDEMPOTENCY_KEY_LENGTH: u64 = 8;
const MAX_IDEMPOTENCY_KEY_LENGTH: u64 = 128;

/// Which gallery an item is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GalleryKind {
    Card,
    #[default]
    #[serde(alias = "microapp")]
    MicroApp,
}

impl GalleryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryKind::Card => "card",
            GalleryKind::MicroApp => "micro-app",
        }
    }
}

impl fmt::Display for GalleryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GalleryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(GalleryKind::Card),
            "micro-app" | "microapp" => Ok(GalleryKind::MicroApp),
            other => Err(format!("unknown gallery kind: {other}")),
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct GalleryItemRow {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub categories: Option<Vec<String>>,
    pub providers: Option<Vec<String>>,
    pub card_json: serde_json::Value,
    pub image: String,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct GalleryItemSummaryRow {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub categories: Option<Vec<String>>,
    pub providers: Option<Vec<String>>,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: Uuid,
    pub kind: GalleryKind,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub providers: Vec<String>,
    pub card_json: serde_json::Value,
    pub image: String,
    pub upvotes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GalleryItemInsert {
    pub id: Uuid,
    pub kind: GalleryKind,
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub providers: Vec<String>,
    pub card_json: serde_json::Value,
    pub image: String,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

/// List entry; the card payload and image are fetched per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemSummary {
    pub id: Uuid,
    pub kind: GalleryKind,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(default)]
    pub upvotes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpvoteResponse {
    pub upvotes: u64,
}

// ───── Input & Validation Requests ──────────────────────────────────

/// Body of `POST /api/publish`. Every field defaults so that missing
/// fields surface as validation errors rather than JSON decode errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishRequest {
    pub kind: GalleryKind,

    #[validate(
        custom(function = "validate_required", message = "Title is required"),
        length(max = MAX_TITLE_LENGTH, message = "Title must be at most 200 characters"),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(
        custom(function = "validate_required", message = "Description is required"),
        length(max = MAX_DESCRIPTION_LENGTH, message = "Description must be at most 2000 characters")
    )]
    pub description: String,

    #[validate(
        length(min = 1, message = "At least one category is required"),
        custom(function = "validate_tags")
    )]
    pub categories: Vec<String>,

    #[validate(
        length(min = 1, message = "At least one provider is required"),
        custom(function = "validate_tags")
    )]
    pub providers: Vec<String>,

    #[validate(custom(function = "validate_card_json"))]
    pub card_json: serde_json::Value,

    #[validate(custom(function = "validate_image_data_uri"))]
    pub image: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = MIN_IDEMPOTENCY_KEY_LENGTH, max = MAX_IDEMPOTENCY_KEY_LENGTH))]
    pub idempotency_key: Option<String>,
}

// ───── Validation Helpers ───────────────────────────────────────────

/// Rejects empty strings; callers attach a field-specific message.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    for tag in tags {
        if tag.trim().is_empty() || tag.chars().count() > MAX_TAG_LENGTH {
            return Err(new_validation_error("invalid_tag_length", "Tag length must be within allowed range"));
        }
        if tag.trim().len() != tag.len() {
            return Err(new_validation_error("tag_whitespace", "Tags must not have leading or trailing whitespace"));
        }
        if tag.contains(',') {
            return Err(new_validation_error("invalid_tag_chars", "Tags must not contain commas"));
        }
    }
    Ok(())
}

pub fn validate_card_json(card: &serde_json::Value) -> Result<(), ValidationError> {
    match card {
        serde_json::Value::Object(map) if !map.is_empty() => Ok(()),
        serde_json::Value::Null => Err(new_validation_error("card_json_missing", "Card JSON is required")),
        _ => Err(new_validation_error("card_json_invalid", "Card JSON must be a non-empty object")),
    }
}

pub fn validate_image_data_uri(image: &str) -> Result<(), ValidationError> {
    if image.is_empty() {
        return Err(new_validation_error("image_missing", "Image is required"));
    }
    DataUri::parse_image(image)
        .map(|_| ())
        .map_err(|e| {
            let mut err = ValidationError::new("image_invalid");
            err.message = Some(Cow::Owned(e.to_string()));
            err
        })
}

pub(crate) fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<GalleryItemRow> for GalleryItem {
    type Error = String;

    fn try_from(row: GalleryItemRow) -> Result<Self, Self::Error> {
        Ok(GalleryItem {
            id: row.id,
            kind: row.kind.parse()?,
            title: row.title,
            description: row.description,
            categories: row.categories.unwrap_or_default(),
            providers: row.providers.unwrap_or_default(),
            card_json: row.card_json,
            image: row.image,
            upvotes: row.upvotes.max(0) as u64,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<GalleryItemSummaryRow> for GalleryItemSummary {
    type Error = String;

    fn try_from(row: GalleryItemSummaryRow) -> Result<Self, Self::Error> {
        Ok(GalleryItemSummary {
            id: row.id,
            kind: row.kind.parse()?,
            title: row.title,
            description: row.description,
            categories: row.categories.unwrap_or_default(),
            providers: row.providers.unwrap_or_default(),
            upvotes: row.upvotes.max(0) as u64,
            created_at: row.created_at,
        })
    }
}

impl PublishRequest {
    /// Validates the request and stamps storage-assigned fields.
    pub fn prepare_for_insert(self) -> Result<GalleryItemInsert, validator::ValidationErrors> {
        self.validate()?;

        Ok(GalleryItemInsert {
            id: Uuid::new_v4(),
            kind: self.kind,
            title: self.title,
            description: self.description,
            categories: dedup_preserving_order(self.categories),
            providers: dedup_preserving_order(self.providers),
            card_json: self.card_json,
            image: self.image,
            idempotency_key: self.idempotency_key,
            created_at: Utc::now(),
        })
    }
}

impl GalleryItemInsert {
    pub fn into_item(self) -> GalleryItem {
        GalleryItem {
            id: self.id,
            kind: self.kind,
            title: self.title,
            description: self.description,
            categories: self.categories,
            providers: self.providers,
            card_json: self.card_json,
            image: self.image,
            upvotes: 0,
            created_at: self.created_at,
        }
    }
}

impl GalleryItem {
    pub fn to_summary(&self) -> GalleryItemSummary {
        GalleryItemSummary {
            id: self.id,
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            categories: self.categories.clone(),
            providers: self.providers.clone(),
            upvotes: self.upvotes,
            created_at: self.created_at,
        }
    }
}

impl Tagged for GalleryItem {
    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn providers(&self) -> &[String] {
        &self.providers
    }
}

impl Tagged for GalleryItemSummary {
    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn providers(&self) -> &[String] {
        &self.providers
    }
}

fn dedup_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PNG_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn valid_request() -> PublishRequest {
        PublishRequest {
            kind: GalleryKind::MicroApp,
            title: "Leave request".into(),
            description: "Ask for time off".into(),
            categories: vec!["HR".into()],
            providers: vec!["Slack".into()],
            card_json: json!({"type": "AdaptiveCard", "version": "1.5", "body": []}),
            image: PNG_PIXEL.into(),
            idempotency_key: None,
        }
    }

    fn failing_fields(request: PublishRequest) -> Vec<String> {
        let errors = request.validate().unwrap_err();
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        fields
    }

    #[test]
    fn accepts_complete_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn empty_categories_fail_validation() {
        let request = PublishRequest { categories: vec![], ..valid_request() };
        assert_eq!(failing_fields(request), vec!["categories"]);
    }

    #[test]
    fn default_request_reports_every_required_field() {
        let fields = failing_fields(PublishRequest::default());
        assert_eq!(
            fields,
            vec!["card_json", "categories", "description", "image", "providers", "title"]
        );
    }

    #[test]
    fn title_messages_distinguish_missing_from_too_long() {
        let message = |request: PublishRequest| {
            let errors = request.validate().unwrap_err();
            errors.field_errors()["title"][0].message.clone().unwrap().to_string()
        };

        let missing = PublishRequest { title: String::new(), ..valid_request() };
        assert_eq!(message(missing), "Title is required");

        let too_long = PublishRequest { title: "t".repeat(201), ..valid_request() };
        assert_eq!(message(too_long), "Title must be at most 200 characters");
    }

    #[test]
    fn image_must_be_a_data_uri() {
        let request = PublishRequest {
            image: "https://example.com/card.png".into(),
            ..valid_request()
        };
        assert_eq!(failing_fields(request), vec!["image"]);
    }

    #[test]
    fn card_json_must_be_an_object() {
        let request = PublishRequest { card_json: json!("not a card"), ..valid_request() };
        assert_eq!(failing_fields(request), vec!["card_json"]);
    }

    #[test]
    fn tags_with_commas_are_rejected() {
        let request = PublishRequest { providers: vec!["Slack,Teams".into()], ..valid_request() };
        assert_eq!(failing_fields(request), vec!["providers"]);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let request: PublishRequest = serde_json::from_value(json!({"title": "Only a title"})).unwrap();
        assert_eq!(request.kind, GalleryKind::MicroApp);
        assert!(request.categories.is_empty());
        assert!(request.card_json.is_null());
    }

    #[test]
    fn prepare_for_insert_dedups_tags() {
        let request = PublishRequest {
            categories: vec!["HR".into(), "IT".into(), "HR".into()],
            ..valid_request()
        };
        let insert = request.prepare_for_insert().unwrap();
        assert_eq!(insert.categories, vec!["HR", "IT"]);
    }

    #[test]
    fn row_without_tags_converts_to_empty_sets() {
        let row = GalleryItemSummaryRow {
            id: Uuid::new_v4(),
            kind: "card".into(),
            title: "t".into(),
            description: "d".into(),
            categories: None,
            providers: None,
            upvotes: 3,
            created_at: Utc::now(),
        };
        let summary = GalleryItemSummary::try_from(row).unwrap();
        assert_eq!(summary.kind, GalleryKind::Card);
        assert!(summary.categories.is_empty());
        assert!(summary.providers.is_empty());
    }

    #[test]
    fn kind_serializes_kebab_case() {
        assert_eq!(serde_json::to_value(GalleryKind::MicroApp).unwrap(), json!("micro-app"));
        assert_eq!("card".parse::<GalleryKind>().unwrap(), GalleryKind::Card);
    }
}
