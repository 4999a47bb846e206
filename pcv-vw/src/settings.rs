//! Gallery view settings

use clap::ValueEnum;
use pcv_common::model::SCORE_FIELD;
use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter, sort and feedback settings driving the Reconciler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSettings {
    /// Snapshot field to sort by
    pub sort_by: String,
    pub sort_order: SortOrder,
    /// Minimum `score_final` shown while `show_low_score` is off
    pub score_threshold: f64,
    pub show_low_score: bool,
    pub sound_effects: bool,
    pub vibration: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            sort_by: SCORE_FIELD.to_string(),
            sort_order: SortOrder::Desc,
            score_threshold: 0.0,
            show_low_score: true,
            sound_effects: true,
            vibration: true,
        }
    }
}
