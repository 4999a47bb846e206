//! pcv-qs library - Queue Server module
//!
//! Owns the persisted deletion queue: a Queue Writer endpoint that commits
//! full-replacement queues under an exclusive file lock, plus read-only views
//! of the queue and the scores snapshot for viewer clients.

use axum::Router;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod validation;

pub use crate::error::{ApiError, ApiResult};
pub use crate::store::{QueueStore, StoreError};

/// Application state shared across HTTP handlers
///
/// Holds configuration only. Requests coordinate through the queue file lock,
/// not through in-process state.
#[derive(Clone)]
pub struct AppState {
    /// Deletion queue file
    pub store: QueueStore,
    /// Scores snapshot file (read-only)
    pub scores_file: PathBuf,
    /// Allow all CORS origins
    pub cors_permissive: bool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: QueueStore, scores_file: PathBuf, cors_permissive: bool) -> Self {
        Self {
            store,
            scores_file,
            cors_permissive,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let cors_permissive = state.cors_permissive;

    let router = Router::new()
        .merge(api::queue_routes())
        .merge(api::scores_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_permissive {
        router.layer(api::cors_layer())
    } else {
        router
    }
}
