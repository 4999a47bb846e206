//! Shared API request/response types
//!
//! Every response body carries `success`. Failures add only a human-readable
//! `message`; the Queue Writer's success body also echoes the committed queue.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========================================
// Queue Writer Types
// ========================================

/// Success body of `POST /api/updateDeleteRequests`
///
/// Generic over the element type: the server echoes the raw JSON elements it
/// committed, clients decode them as [`crate::DeletionRecord`].
///
/// # Examples
///
/// ```
/// use pcv_common::api::QueueUpdateResponse;
/// use serde_json::json;
///
/// let body = QueueUpdateResponse::committed(vec![json!({"id": "1", "filename": "a.jpg"})]);
/// assert_eq!(body.items_count, 1);
/// assert_eq!(
///     serde_json::to_value(&body).unwrap()["updatedQueue"][0]["id"],
///     "1"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueUpdateResponse<T = Value> {
    pub success: bool,
    pub message: String,
    pub updated_queue: Vec<T>,
    pub items_count: usize,
}

impl<T> QueueUpdateResponse<T> {
    /// Build the success body for a queue that has just been committed
    pub fn committed(queue: Vec<T>) -> Self {
        Self {
            success: true,
            message: "Delete requests updated successfully".to_string(),
            items_count: queue.len(),
            updated_queue: queue,
        }
    }
}

// ========================================
// Error Response Types
// ========================================

/// Failure body returned with every 4xx/5xx status
///
/// # Examples
///
/// ```
/// use pcv_common::api::ApiFailure;
///
/// let body = ApiFailure::new("Data must be an array");
/// assert!(!body.success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub success: bool,
    pub message: String,
}

impl ApiFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// ========================================
// Hard Delete Types (external endpoint)
// ========================================

/// Request body for the external hard-delete endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardDeleteRequest {
    pub id: String,
}

/// Response body of the external hard-delete endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardDeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
