//! Scores Snapshot view
//!
//! Serves the externally produced scores file unchanged. The file is owned by
//! the scoring pipeline; this service never writes it.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use pcv_common::api::SCORES_FILE_PATH;
use tracing::error;

use crate::{ApiError, ApiResult, AppState};

/// Format a modification time as an HTTP-date (RFC 7231 IMF-fixdate)
pub fn http_date(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// GET /scores.json
///
/// Responds with the raw snapshot and its `Last-Modified` time.
/// 404 when the scoring pipeline has not produced a snapshot yet.
pub async fn get_scores(State(state): State<AppState>) -> ApiResult<Response> {
    let bytes = match tokio::fs::read(&state.scores_file).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("Scores snapshot not available".to_string()));
        }
        Err(e) => {
            error!(
                path = %state.scores_file.display(),
                "Error reading scores snapshot: {}",
                e
            );
            return Err(ApiError::Internal(e.to_string()));
        }
    };

    let last_modified = tokio::fs::metadata(&state.scores_file)
        .await
        .and_then(|meta| meta.modified())
        .map(http_date)
        .ok();

    let mut response = ([(header::CONTENT_TYPE, "application/json")], bytes).into_response();
    if let Some(value) = last_modified.and_then(|v| v.parse::<header::HeaderValue>().ok()) {
        response.headers_mut().insert(header::LAST_MODIFIED, value);
    }
    Ok(response)
}

/// Build scores routes
pub fn scores_routes() -> Router<AppState> {
    Router::new().route(SCORES_FILE_PATH, get(get_scores))
}
