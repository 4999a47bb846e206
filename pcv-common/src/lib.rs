//! # PCV Common Library
//!
//! Shared code for the PCV (Photo Curation Viewer) services:
//! - Deletion queue and scores snapshot data model
//! - Queue Writer request/response types and route paths
//! - Configuration loading and root folder resolution
//! - Common error type

pub mod api;
pub mod config;
pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{DeletionRecord, ScoreEntry, ScoresSnapshot};
