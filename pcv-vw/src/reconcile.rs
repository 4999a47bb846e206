//! Reconciler: scores snapshot + deletion queue + settings → visible gallery
//!
//! Pure and recomputed in full on every data refresh or settings change.
//! Passes, in order:
//! 1. expand the snapshot into `(id, entry)` items
//! 2. drop queued ids
//! 3. drop scores below the threshold unless low scores are shown
//! 4. drop entries without a numeric `score_final`
//! 5. sort by the configured key; missing keys always sort last

use pcv_common::model::{queued_ids, SCORE_FIELD};
use pcv_common::{DeletionRecord, ScoreEntry, ScoresSnapshot};
use serde_json::Value;
use std::cmp::Ordering;

use crate::settings::{SortOrder, ViewSettings};

/// One visible gallery item, borrowed from the snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryItem<'a> {
    pub id: &'a str,
    pub entry: &'a ScoreEntry,
}

impl<'a> GalleryItem<'a> {
    /// Display filename, falling back to the id
    pub fn filename(&self) -> &'a str {
        self.entry.filename().unwrap_or(self.id)
    }

    /// Numeric score; every reconciled item has one
    pub fn score(&self) -> f64 {
        self.entry.score().unwrap_or(0.0)
    }
}

/// Compute the ordered list of visible items
pub fn reconcile<'a>(
    snapshot: &'a ScoresSnapshot,
    queue: &[DeletionRecord],
    settings: &ViewSettings,
) -> Vec<GalleryItem<'a>> {
    let queued = queued_ids(queue);

    let mut items: Vec<GalleryItem<'a>> = snapshot
        .iter()
        .map(|(id, entry)| GalleryItem { id: id.as_str(), entry })
        .filter(|item| !queued.contains(item.id))
        .filter(|item| {
            settings.show_low_score
                || item.entry.score().unwrap_or(0.0) >= settings.score_threshold
        })
        .filter(|item| item.entry.score().is_some())
        .collect();

    items.sort_by(|a, b| compare_items(a, b, &settings.sort_by, settings.sort_order));
    items
}

/// Comparable projection of a sort field
#[derive(Debug, PartialEq)]
enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    /// Numbers order before text when a field mixes both
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

fn sort_value(item: &GalleryItem<'_>, key: &str) -> Option<SortValue> {
    if key == SCORE_FIELD {
        return Some(SortValue::Number(item.entry.score().unwrap_or(0.0)));
    }
    if key == "id" {
        return Some(SortValue::Text(item.id.to_lowercase()));
    }

    match item.entry.get(key)? {
        Value::Number(n) => n.as_f64().map(SortValue::Number),
        Value::String(s) => Some(SortValue::Text(s.to_lowercase())),
        Value::Bool(b) => Some(SortValue::Number(if *b { 1.0 } else { 0.0 })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn compare_items(a: &GalleryItem<'_>, b: &GalleryItem<'_>, key: &str, order: SortOrder) -> Ordering {
    match (sort_value(a, key), sort_value(b, key)) {
        (None, None) => Ordering::Equal,
        // Missing keys go last in both directions
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => x.compare(&y),
            SortOrder::Desc => x.compare(&y).reverse(),
        },
    }
}
