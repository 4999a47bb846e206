//! pcv-vw library - Viewer client
//!
//! Client half of the deletion-queue protocol: an explicit [`ViewerState`]
//! holding the last fetched scores snapshot and queue, the pure
//! [`reconcile`](reconcile::reconcile) pass deciding what is visible, and a
//! [`QueueClient`] that computes the next queue locally and commits it to the
//! queue server.

pub mod client;
pub mod console;
pub mod error;
pub mod operator;
pub mod reconcile;
pub mod settings;
pub mod state;

pub use client::{DeletionOutcome, HardDeleteOutcome, QueueClient};
pub use error::ClientError;
pub use operator::Operator;
pub use reconcile::{reconcile, GalleryItem};
pub use settings::{SortOrder, ViewSettings};
pub use state::ViewerState;
