//! Queue Client: fetches viewer data and commits deletion queues
//!
//! The server only supports full replacement, so the client computes the
//! complete next queue itself (current queue plus the new record, unless that
//! id is already queued) and sends it whole. The committed queue echoed back
//! by the server becomes the local queue of record.
//!
//! No request timeouts are set and no request is retried. Concurrent calls are
//! independent round trips; their outcomes are applied to [`ViewerState`] in
//! whatever order they land.

use chrono::{DateTime, Utc};
use pcv_common::api::{
    HardDeleteRequest, HardDeleteResponse, HARD_DELETE_PATH, QUEUE_FILE_PATH, SCORES_FILE_PATH,
    UPDATE_QUEUE_PATH,
};
use pcv_common::{DeletionRecord, ScoresSnapshot};
use reqwest::{header, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::ClientError;
use crate::operator::Operator;
use crate::state::ViewerState;

const USER_AGENT: &str = concat!("pcv-vw/", env!("CARGO_PKG_VERSION"));

/// Result of [`QueueClient::request_deletion`]
#[derive(Debug)]
pub enum DeletionOutcome {
    /// Operator answered no; nothing was sent
    Declined,
    /// Server committed this queue
    Queued(Vec<DeletionRecord>),
    /// Round trip failed; the operator has been alerted
    Failed(ClientError),
}

/// Result of [`QueueClient::hard_delete`]
#[derive(Debug)]
pub enum HardDeleteOutcome {
    /// Operator answered no; nothing was sent
    Declined,
    /// Image with this id was removed by the server
    Deleted(String),
    /// Round trip failed; the operator has been alerted
    Failed(ClientError),
}

/// Lenient view of the Queue Writer response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueReply {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    updated_queue: Option<Value>,
}

/// Next full-replacement queue for a deletion request
///
/// Every current record is carried over untouched. `{id, filename}` is
/// appended unless a record with that string id is already queued, so asking
/// twice for the same image is a no-op the second time.
pub fn enqueue(current: &[DeletionRecord], id: &str, filename: &str) -> Vec<DeletionRecord> {
    let mut next = current.to_vec();
    if !next.iter().any(|record| record.id() == Some(id)) {
        next.push(DeletionRecord::new(id, filename));
    }
    next
}

/// Decode a fetched queue
///
/// Records are kept as stored, extra fields and non-string values included.
/// Only elements the Queue Writer would reject (not an object, or missing
/// `id`/`filename`) are skipped. Anything other than a JSON array is an empty
/// queue.
pub fn decode_queue(value: Value) -> Vec<DeletionRecord> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => {
                let record = DeletionRecord::from_fields(fields);
                if record.has_required_keys() {
                    Some(record)
                } else {
                    warn!("Skipping queue record without id/filename");
                    None
                }
            }
            other => {
                warn!("Skipping non-object queue record: {}", other);
                None
            }
        })
        .collect()
}

/// HTTP client for the queue server and the hard-delete endpoint
#[derive(Debug, Clone)]
pub struct QueueClient {
    http: reqwest::Client,
    base_url: String,
    hard_delete_url: String,
}

impl QueueClient {
    /// Client for a queue server at `base_url` (e.g. `http://127.0.0.1:5731`)
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            hard_delete_url: format!("{}{}", base_url, HARD_DELETE_PATH),
            http,
            base_url,
        })
    }

    /// Override the hard-delete endpoint (served elsewhere)
    pub fn with_hard_delete_url(mut self, url: impl Into<String>) -> Self {
        self.hard_delete_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Re-fetch the scores snapshot and the queue
    ///
    /// Both requests carry a `t=<millis>` cache buster. A snapshot failure
    /// aborts the refresh with `state` untouched. The queue fetch is lenient:
    /// unreachable, 404 or non-array all mean an empty queue, while other
    /// error statuses keep the previous queue.
    pub async fn refresh(&self, state: &mut ViewerState) -> Result<(), ClientError> {
        let stamp = Utc::now().timestamp_millis();

        let response = self
            .http
            .get(self.url(SCORES_FILE_PATH))
            .query(&[("t", stamp)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let last_modified = response
            .headers()
            .get(header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
            .map(|t| t.with_timezone(&Utc));

        let text = response.text().await?;
        let snapshot: Option<ScoresSnapshot> =
            serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))?;

        let queue = self.fetch_queue(stamp).await;

        state.snapshot = snapshot.unwrap_or_default();
        if let Some(queue) = queue {
            state.queue = queue;
        }
        state.last_sync = Some(last_modified.unwrap_or_else(Utc::now));

        debug!(
            images = state.snapshot.len(),
            queued = state.queue.len(),
            "Viewer data refreshed"
        );
        Ok(())
    }

    /// `None` keeps the previous queue
    async fn fetch_queue(&self, stamp: i64) -> Option<Vec<DeletionRecord>> {
        let response = match self
            .http
            .get(self.url(QUEUE_FILE_PATH))
            .query(&[("t", stamp)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Queue fetch failed, treating queue as empty: {}", e);
                return Some(Vec::new());
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Some(Vec::new());
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "Queue fetch failed, keeping previous queue");
            return None;
        }

        match response.json::<Value>().await {
            Ok(value) => Some(decode_queue(value)),
            Err(e) => {
                warn!("Queue body unreadable, treating queue as empty: {}", e);
                Some(Vec::new())
            }
        }
    }

    /// POST a full-replacement queue to the Queue Writer
    ///
    /// Returns the queue the server reports as committed, or `queue` itself
    /// when the response omits it.
    pub async fn commit_queue(
        &self,
        queue: &[DeletionRecord],
    ) -> Result<Vec<DeletionRecord>, ClientError> {
        let response = self
            .http
            .post(self.url(UPDATE_QUEUE_PATH))
            .json(queue)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let reply: QueueReply =
            serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))?;
        if !reply.success {
            return Err(ClientError::Rejected(
                reply
                    .message
                    .unwrap_or_else(|| "Server failed to process the request".to_string()),
            ));
        }

        Ok(reply
            .updated_queue
            .map(decode_queue)
            .unwrap_or_else(|| queue.to_vec()))
    }

    /// Ask the operator, then add `{id, filename}` to the server's queue
    ///
    /// On success the operator gets sound/vibration feedback as enabled in
    /// `state.settings`; on failure an alert. `state` is only read; apply the
    /// outcome with [`ViewerState::apply_deletion`].
    pub async fn request_deletion<O: Operator + ?Sized>(
        &self,
        state: &ViewerState,
        operator: &O,
        id: &str,
        filename: &str,
    ) -> DeletionOutcome {
        let prompt = format!(
            "Add \"{}\" to the delete requests?\nThis updates delete_requests.json on the server.",
            filename
        );
        if !operator.confirm(&prompt) {
            return DeletionOutcome::Declined;
        }

        let next = enqueue(&state.queue, id, filename);
        match self.commit_queue(&next).await {
            Ok(committed) => {
                info!(id = %id, queued = committed.len(), "Delete request committed");
                if state.settings.sound_effects {
                    operator.play_delete_sound();
                }
                if state.settings.vibration {
                    operator.vibrate();
                }
                DeletionOutcome::Queued(committed)
            }
            Err(e) => {
                error!(id = %id, "Delete request error: {}", e);
                operator.alert(&format!("Delete request error: {}", e));
                DeletionOutcome::Failed(e)
            }
        }
    }

    /// Ask the operator, then remove the image outright via the hard-delete
    /// endpoint. Apply the outcome with [`ViewerState::apply_hard_delete`].
    pub async fn hard_delete<O: Operator + ?Sized>(
        &self,
        operator: &O,
        id: &str,
        filename: &str,
    ) -> HardDeleteOutcome {
        if !operator.confirm(&format!("Permanently delete \"{}\"?", filename)) {
            return HardDeleteOutcome::Declined;
        }

        match self.post_hard_delete(id).await {
            Ok(()) => {
                info!(id = %id, "Image deleted");
                HardDeleteOutcome::Deleted(id.to_string())
            }
            Err(e) => {
                error!(id = %id, "Image delete error: {}", e);
                operator.alert(&format!("Image delete error: {}", e));
                HardDeleteOutcome::Failed(e)
            }
        }
    }

    async fn post_hard_delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(&self.hard_delete_url)
            .json(&HardDeleteRequest { id: id.to_string() })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let reply: HardDeleteResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))?;
        if reply.success {
            Ok(())
        } else if reply.message.is_empty() {
            Err(ClientError::Rejected("Delete failed".to_string()))
        } else {
            Err(ClientError::Rejected(reply.message))
        }
    }
}
