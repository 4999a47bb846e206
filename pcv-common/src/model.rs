//! Deletion queue and scores snapshot data model
//!
//! The deletion queue is a list of `{id, filename}` intents. `id` is the key of
//! an image in the scores snapshot; `filename` is carried for display only.
//! Both types are open JSON objects so unknown fields survive a round trip.
//! The scores snapshot is produced by an external scoring pipeline and is
//! treated as read-only here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Scores snapshot field holding the final quality score
pub const SCORE_FIELD: &str = "score_final";

/// Scores snapshot field holding the original filename
pub const FILENAME_FIELD: &str = "filename";

/// Queue record field holding the image id
pub const ID_FIELD: &str = "id";

/// One pending-deletion intent
///
/// Kept as the open object the server stores: other clients may write records
/// with extra fields or non-string values, and every full-replacement commit
/// must send them back unchanged. Only a string `id` takes part in matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeletionRecord {
    fields: Map<String, Value>,
}

impl DeletionRecord {
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_string(), Value::String(id.into()));
        fields.insert(FILENAME_FIELD.to_string(), Value::String(filename.into()));
        Self { fields }
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw field lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// `id` when it is a JSON string
    pub fn id(&self) -> Option<&str> {
        self.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn filename(&self) -> Option<&str> {
        self.get(FILENAME_FIELD).and_then(Value::as_str)
    }

    /// Both `id` and `filename` keys present, whatever their values
    pub fn has_required_keys(&self) -> bool {
        self.fields.contains_key(ID_FIELD) && self.fields.contains_key(FILENAME_FIELD)
    }
}

/// Collect the string ids of a queue into a set for O(1) membership tests
pub fn queued_ids(queue: &[DeletionRecord]) -> HashSet<&str> {
    queue.iter().filter_map(DeletionRecord::id).collect()
}

/// Scores snapshot entry
///
/// Kept as an open map of scalar fields: the scoring pipeline owns the schema,
/// and entries with missing or non-numeric scores must still load so the
/// viewer can decide to hide them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreEntry {
    fields: Map<String, Value>,
}

impl ScoreEntry {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw field lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn filename(&self) -> Option<&str> {
        self.get(FILENAME_FIELD).and_then(Value::as_str)
    }

    /// `score_final` when it is a JSON number
    pub fn score(&self) -> Option<f64> {
        self.get(SCORE_FIELD).and_then(Value::as_f64)
    }
}

/// Mapping of image id to its score entry
pub type ScoresSnapshot = BTreeMap<String, ScoreEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_entry_reads_numeric_score() {
        let entry: ScoreEntry =
            serde_json::from_value(json!({"filename": "a.jpg", "score_final": 0.75})).unwrap();
        assert_eq!(entry.filename(), Some("a.jpg"));
        assert_eq!(entry.score(), Some(0.75));
    }

    #[test]
    fn test_score_entry_non_numeric_score_is_none() {
        let entry: ScoreEntry =
            serde_json::from_value(json!({"filename": "a.jpg", "score_final": "high"})).unwrap();
        assert_eq!(entry.score(), None);

        let entry: ScoreEntry =
            serde_json::from_value(json!({"filename": "a.jpg", "score_final": null})).unwrap();
        assert_eq!(entry.score(), None);

        let entry: ScoreEntry = serde_json::from_value(json!({"filename": "a.jpg"})).unwrap();
        assert_eq!(entry.score(), None);
    }

    #[test]
    fn test_score_entry_keeps_extra_fields() {
        let raw = json!({"filename": "a.jpg", "score_final": 1, "camera": "X100"});
        let entry: ScoreEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.get("camera"), Some(&json!("X100")));
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_snapshot_deserializes_from_object() {
        let snapshot: ScoresSnapshot = serde_json::from_str(
            r#"{"1":{"filename":"a.jpg","score_final":0.9},"2":{"filename":"b.jpg","score_final":0.2}}"#,
        )
        .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["2"].score(), Some(0.2));
    }

    #[test]
    fn test_deletion_record_keeps_foreign_fields() {
        let raw = json!({"id": "y", "filename": "y.jpg", "requested_by": "alice"});
        let record: DeletionRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.id(), Some("y"));
        assert_eq!(record.get("requested_by"), Some(&json!("alice")));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);

        let record: DeletionRecord =
            serde_json::from_value(json!({"id": 7, "filename": null})).unwrap();
        assert_eq!(record.id(), None);
        assert_eq!(record.filename(), None);
        assert!(record.has_required_keys());
    }

    #[test]
    fn test_deletion_record_new_orders_id_first() {
        let text = serde_json::to_string(&DeletionRecord::new("1", "a.jpg")).unwrap();
        assert_eq!(text, r#"{"id":"1","filename":"a.jpg"}"#);
    }

    #[test]
    fn test_queued_ids() {
        let queue = vec![
            DeletionRecord::new("a", "a.jpg"),
            DeletionRecord::new("b", "b.jpg"),
            serde_json::from_value(json!({"id": 3, "filename": "c.jpg"})).unwrap(),
        ];
        let ids = queued_ids(&queue);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
        assert!(!ids.contains("c"));
    }
}
