//! Queue Writer endpoint and Queue Store view
//!
//! `POST /api/updateDeleteRequests` replaces the whole persisted queue with the
//! request body. It never appends: clients send the deduplicated superset they
//! want stored, and the last committed array wins.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pcv_common::api::{QueueUpdateResponse, QUEUE_FILE_PATH, UPDATE_QUEUE_PATH};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::validation::parse_queue_payload;
use crate::{ApiError, ApiResult, AppState};

/// POST /api/updateDeleteRequests
///
/// **Request:** JSON array of `{"id": ..., "filename": ...}`
/// **Response:** `{"success": true, "message": "...", "updatedQueue": [...], "itemsCount": n}`
///
/// **Errors:**
/// - 400: body is not JSON, not an array, or an element lacks `id`/`filename`
/// - 500: path verification, I/O or lock failure (detail logged only)
pub async fn update_delete_requests(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<QueueUpdateResponse>> {
    let queue = parse_queue_payload(&body).map_err(|e| {
        warn!("Rejected delete request update: {}", e);
        e
    })?;

    // The lock wait blocks this request only, so it runs on the blocking pool
    let store = state.store.clone();
    let committed = tokio::task::spawn_blocking(move || store.commit(&queue).map(|()| queue))
        .await
        .map_err(|e| {
            error!("Queue commit task failed: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(|e| {
            error!(
                configured = %state.store.path().display(),
                "Error updating delete requests: {}",
                e
            );
            ApiError::Store(e)
        })?;

    info!(items = committed.len(), "Delete requests updated");
    Ok(Json(QueueUpdateResponse::committed(committed)))
}

/// OPTIONS /api/updateDeleteRequests (CORS pre-flight)
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on the writer endpoint
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// GET /delete_requests.json
///
/// Current Queue Store content; an absent file reads as `[]`.
pub async fn get_delete_requests(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let store = state.store.clone();
    let queue = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(|e| {
            error!("Queue load task failed: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(|e| {
            error!(
                configured = %state.store.path().display(),
                "Error reading delete requests: {}",
                e
            );
            ApiError::Store(e)
        })?;

    Ok(Json(queue))
}

/// Build queue routes
pub fn queue_routes() -> Router<AppState> {
    Router::new()
        .route(
            UPDATE_QUEUE_PATH,
            post(update_delete_requests)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(QUEUE_FILE_PATH, get(get_delete_requests))
}
