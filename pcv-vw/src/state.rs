//! Viewer application state
//!
//! One explicit object instead of module-level globals. Network operations
//! borrow it to compute their requests and hand back an outcome; the outcome
//! is applied here, so a failed round trip never mutates anything.

use chrono::{DateTime, Utc};
use pcv_common::{DeletionRecord, ScoresSnapshot};

use crate::client::{DeletionOutcome, HardDeleteOutcome};
use crate::reconcile::{reconcile, GalleryItem};
use crate::settings::ViewSettings;

/// Last fetched data plus current view settings
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    pub snapshot: ScoresSnapshot,
    pub queue: Vec<DeletionRecord>,
    pub settings: ViewSettings,
    /// Snapshot modification time reported by the server, or fetch time
    pub last_sync: Option<DateTime<Utc>>,
}

impl ViewerState {
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Current visible gallery
    pub fn visible(&self) -> Vec<GalleryItem<'_>> {
        reconcile(&self.snapshot, &self.queue, &self.settings)
    }

    /// Queue-size indicator
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_queued(&self, id: &str) -> bool {
        self.queue.iter().any(|record| record.id() == Some(id))
    }

    /// Adopt the server's committed queue; returns whether state changed
    pub fn apply_deletion(&mut self, outcome: &DeletionOutcome) -> bool {
        match outcome {
            DeletionOutcome::Queued(queue) => {
                self.queue = queue.clone();
                true
            }
            DeletionOutcome::Declined | DeletionOutcome::Failed(_) => false,
        }
    }

    /// Drop a hard-deleted image from the snapshot (the queue is untouched)
    pub fn apply_hard_delete(&mut self, outcome: &HardDeleteOutcome) -> bool {
        match outcome {
            HardDeleteOutcome::Deleted(id) => self.snapshot.remove(id).is_some(),
            HardDeleteOutcome::Declined | HardDeleteOutcome::Failed(_) => false,
        }
    }
}
