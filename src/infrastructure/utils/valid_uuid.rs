use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path id. A malformed id can never name a stored item, so it
/// is reported as not found rather than as bad input.
pub fn valid_uuid(id: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::NotFound(format!("{what} not found")))
}
