//! Error types for pcv-vw

use thiserror::Error;

/// Failure of a single client round trip
///
/// Every variant leaves [`crate::ViewerState`] untouched.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, transport or body read failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx status; `body` is the raw response text
    #[error("Server error: {status}. {body}")]
    Status { status: u16, body: String },

    /// 2xx response carrying `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Response body did not decode
    #[error("Invalid response: {0}")]
    Parse(String),
}
