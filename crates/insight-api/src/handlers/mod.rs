//! HTTP handlers for insight-api.

pub mod health;
pub mod jobs;
pub mod transcripts;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id. An id that is not a UUID cannot exist, so it reports
/// the same not-found detail as a missing row.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}
