use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Header carrying a client-chosen key that makes `POST /api/publish` safe to retry.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
