//! API module for shared HTTP API functionality
//!
//! Route paths and wire types shared by the queue server (pcv-qs) and the
//! viewer client (pcv-vw). Pure data only, no HTTP framework dependencies.

pub mod types;

pub use types::{ApiFailure, HardDeleteRequest, HardDeleteResponse, QueueUpdateResponse};

/// Queue Writer endpoint (POST full replacement, OPTIONS pre-flight)
pub const UPDATE_QUEUE_PATH: &str = "/api/updateDeleteRequests";

/// Read-only view of the persisted Queue Store
pub const QUEUE_FILE_PATH: &str = "/delete_requests.json";

/// Read-only view of the Scores Snapshot
pub const SCORES_FILE_PATH: &str = "/scores.json";

/// External hard-delete endpoint (not served by pcv-qs)
pub const HARD_DELETE_PATH: &str = "/api/delete_image";

/// Default queue server port
pub const DEFAULT_QS_PORT: u16 = 5731;
