//! In-memory state snapshot buffer
//!
//! The engine pushes its save data into the page as one serialized JSON
//! object per call. The shell never interprets the values; it validates the
//! shape at the boundary, keeps the latest good snapshot in memory, and
//! hands it to the persister at unload.

use serde::Deserialize;
use serde_json::Value;

/// Errors a pushed snapshot can be rejected with
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid state JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("value for key `{key}` is not a string (found {found})")]
    NonStringValue { key: String, found: &'static str },
}

/// Raw wire shape: a flat JSON object. preserve_order keeps the map in
/// insertion order, which is the order flush writes in.
#[derive(Deserialize)]
#[serde(transparent)]
struct RawSnapshot(serde_json::Map<String, Value>);

/// A parsed snapshot: unique string keys and string values, insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<(String, String)>,
}

impl Snapshot {
    /// Parse and validate a serialized snapshot.
    ///
    /// Anything other than a flat object with string values is rejected
    /// whole; a snapshot is never partially accepted.
    pub fn parse(json: &str) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(raw.0.len());
        for (key, value) in raw.0 {
            match value {
                Value::String(text) => entries.push((key, text)),
                other => {
                    return Err(SnapshotError::NonStringValue {
                        key,
                        found: json_type_name(&other),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Page-lifetime buffer holding the latest good snapshot
#[derive(Debug, Clone, Default)]
pub struct StateBuffer {
    snapshot: Snapshot,
}

impl StateBuffer {
    /// Create an empty buffer (page-load state)
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole buffer with a newly pushed snapshot.
    ///
    /// Last write wins: keys absent from the new snapshot are gone, there is
    /// no merge. A snapshot that fails to parse leaves the buffer untouched.
    pub fn replace_from_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        self.snapshot = Snapshot::parse(json)?;
        Ok(())
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_keeps_insertion_order() {
        let snapshot = Snapshot::parse(r#"{"b":"2","a":"1","c":"3"}"#).unwrap();
        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(snapshot.get("a"), Some("1"));
        assert_eq!(snapshot.get("missing"), None);
    }

    #[test]
    fn parse_empty_object() {
        let snapshot = Snapshot::parse("{}").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn duplicate_keys_collapse_to_last_value() {
        let snapshot = Snapshot::parse(r#"{"k":"old","k":"new"}"#).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("k"), Some("new"));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(matches!(
            Snapshot::parse(r#"["a","b"]"#),
            Err(SnapshotError::Json(_))
        ));
        assert!(matches!(
            Snapshot::parse(r#""just a string""#),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn non_string_value_is_rejected() {
        let err = Snapshot::parse(r#"{"score":10}"#).unwrap_err();
        match err {
            SnapshotError::NonStringValue { key, found } => {
                assert_eq!(key, "score");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn later_write_replaces_buffer_wholesale() {
        let mut buffer = StateBuffer::new();
        buffer.replace_from_json(r#"{"score":"10"}"#).unwrap();
        buffer.replace_from_json(r#"{"level":"2"}"#).unwrap();

        assert_eq!(buffer.snapshot().get("level"), Some("2"));
        assert_eq!(buffer.snapshot().get("score"), None);
        assert_eq!(buffer.snapshot().len(), 1);
    }

    #[test]
    fn failed_parse_leaves_buffer_unchanged() {
        let mut buffer = StateBuffer::new();
        buffer.replace_from_json(r#"{"score":"10"}"#).unwrap();

        assert!(buffer.replace_from_json("not json").is_err());
        assert_eq!(buffer.snapshot().get("score"), Some("10"));

        assert!(buffer.replace_from_json(r#"{"score":10}"#).is_err());
        assert_eq!(buffer.snapshot().get("score"), Some("10"));
    }

    fn pair_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
        proptest::collection::vec(("[a-z_]{1,12}", "[ -~]{0,24}"), 0..16).prop_map(|pairs| {
            let mut seen = std::collections::HashSet::new();
            pairs
                .into_iter()
                .filter(|(key, _)| seen.insert(key.clone()))
                .collect()
        })
    }

    proptest! {
        /// Serializing any flat string map and parsing it back yields the
        /// same pairs in the same order.
        #[test]
        fn parse_round_trips_flat_string_maps(pairs in pair_strategy()) {
            let mut map = serde_json::Map::new();
            for (key, value) in &pairs {
                map.insert(key.clone(), Value::String(value.clone()));
            }
            let json = serde_json::to_string(&map).unwrap();

            let snapshot = Snapshot::parse(&json).unwrap();
            let parsed: Vec<(String, String)> = snapshot
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            prop_assert_eq!(parsed, pairs);
        }
    }
}
