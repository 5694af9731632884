pub mod card_json;
pub mod data_uri;
pub mod valid_uuid;
