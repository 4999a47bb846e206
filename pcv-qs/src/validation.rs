//! Queue Writer payload validation
//!
//! Checks run in order and the first failure rejects the whole request before
//! any file I/O:
//! 1. body parses as JSON
//! 2. value is an array
//! 3. every element is an object with both `id` and `filename` keys
//!
//! Key presence is all that is checked; values are committed as received.

use serde_json::Value;
use thiserror::Error;

/// Payload rejection reasons (HTTP 400)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid JSON data: {0}")]
    InvalidJson(String),

    #[error("Data must be an array")]
    NotAnArray,

    #[error("Each delete request requires \"id\" and \"filename\"")]
    MissingKeys,
}

/// Parse and validate a full-replacement queue body
pub fn parse_queue_payload(body: &[u8]) -> Result<Vec<Value>, ValidationError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ValidationError::NotAnArray);
    };

    let complete = items.iter().all(|item| {
        item.as_object()
            .is_some_and(|fields| fields.contains_key("id") && fields.contains_key("filename"))
    });
    if !complete {
        return Err(ValidationError::MissingKeys);
    }

    Ok(items)
}
