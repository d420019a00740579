use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A persisted calculation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Caller-supplied inputs, stored as given
    #[serde(default)]
    pub inputs: Value,
    /// Caller-supplied results, stored as given
    #[serde(default)]
    pub results: Value,
    #[serde(default)]
    pub label: Option<String>,
}

/// Payload of an add request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryEntry {
    #[serde(default)]
    pub inputs: Value,
    #[serde(default)]
    pub results: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NewHistoryEntry {
    pub fn new(inputs: Value, results: Value) -> Self {
        Self {
            inputs,
            results,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Assign identity and creation time. An empty label is stored as null.
    pub fn materialize(self, created_at: DateTime<Utc>) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            created_at,
            inputs: self.inputs,
            results: self.results,
            label: self.label.filter(|l| !l.is_empty()),
        }
    }
}

/// The whole persisted document, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryCollection {
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}

impl HistoryCollection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `entry`, then drop the oldest insertions beyond `capacity`.
    /// Returns how many entries were evicted.
    pub fn push_capped(&mut self, entry: HistoryEntry, capacity: usize) -> usize {
        self.entries.push(entry);
        let excess = self.entries.len().saturating_sub(capacity);
        if excess > 0 {
            self.entries.drain(..excess);
        }
        excess
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Copy of the entries sorted by `created_at`, newest first.
    pub fn newest_first(&self) -> Vec<HistoryEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_materialize_assigns_identity() {
        let a = NewHistoryEntry::new(json!({"p": 1}), json!({})).materialize(at(0));
        let b = NewHistoryEntry::new(json!({"p": 1}), json!({})).materialize(at(0));
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, at(0));
        assert_eq!(a.label, None);
    }

    #[test]
    fn test_empty_label_becomes_null() {
        let e = NewHistoryEntry::default().with_label("").materialize(at(0));
        assert_eq!(e.label, None);
    }

    #[test]
    fn test_push_capped_drops_oldest() {
        let mut c = HistoryCollection::default();
        for i in 0..4 {
            let evicted = c.push_capped(NewHistoryEntry::default().materialize(at(i)), 3);
            assert_eq!(evicted, usize::from(i == 3));
        }
        assert_eq!(c.len(), 3);
        assert_eq!(c.entries[0].created_at, at(1));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut c = HistoryCollection::default();
        c.push_capped(NewHistoryEntry::default().materialize(at(0)), 10);
        assert!(!c.remove("nope"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let e = NewHistoryEntry::new(json!({"homePrice": "750000"}), json!({"totalMonthly": 1.0}))
            .materialize(at(0));
        let v = serde_json::to_value(&e).unwrap();
        assert!(v.get("createdAt").is_some());
        assert_eq!(v["label"], Value::Null);
        assert_eq!(v["inputs"]["homePrice"], "750000");
    }
}
