use base64::{engine::general_purpose::STANDARD, Engine as _};
use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_DATA_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(image/(?:png|jpe?g|gif|webp|svg\+xml));base64,([A-Za-z0-9+/=\s]+)$")
        .expect("static regex")
});

/// A decoded `data:image/...;base64,` URI.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Display, PartialEq)]
pub enum DataUriError {
    #[display("Image must be a base64 data URI (data:image/<type>;base64,...)")]
    NotImageDataUri,

    #[display("Image data is not valid base64")]
    InvalidBase64,

    #[display("Image data is empty")]
    Empty,

    #[display("Image data is {_0}, not an image")]
    NotAnImage(String),
}

impl DataUri {
    /// Parses and decodes an image data URI, sniffing the payload where possible.
    pub fn parse_image(uri: &str) -> Result<DataUri, DataUriError> {
        let captures = IMAGE_DATA_URI
            .captures(uri.trim())
            .ok_or(DataUriError::NotImageDataUri)?;

        let mime_type = captures[1].to_string();
        let payload: String = captures[2].chars().filter(|c| !c.is_whitespace()).collect();

        let bytes = STANDARD
            .decode(payload.as_bytes())
            .map_err(|_| DataUriError::InvalidBase64)?;

        if bytes.is_empty() {
            return Err(DataUriError::Empty);
        }

        // SVG is text and goes unrecognised by magic-number sniffing
        if let Some(kind) = infer::get(&bytes) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(DataUriError::NotAnImage(kind.mime_type().to_string()));
            }
        }

        Ok(DataUri { mime_type, bytes })
    }
}

/// The base64 payload of a data URI, or the input unchanged when it has no prefix.
pub fn strip_data_uri_prefix(data: &str) -> &str {
    match data.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => data,
    }
}
