//! HTTP API handlers for pcv-qs

pub mod buildinfo;
pub mod health;
pub mod queue;
pub mod scores;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use queue::{get_delete_requests, queue_routes, update_delete_requests};
pub use scores::{get_scores, scores_routes};

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// CORS policy for development: any origin may read the views and post
/// queue updates. Disable with `cors_permissive = false` in production.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
