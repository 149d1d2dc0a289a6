//! Whole-store snapshot and derived aggregates.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Message, User};

/// The complete persisted state: every user and every message, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// On-disk shape with records left undecoded.
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    users: Vec<Value>,
    #[serde(default)]
    messages: Vec<Value>,
}

impl Snapshot {
    /// Decode a stored document record by record.
    ///
    /// Records that do not fit the schema are dropped with a warning; the
    /// call fails only when the document itself is not a snapshot.
    pub fn from_json_lenient(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawSnapshot = serde_json::from_slice(bytes)?;
        Ok(Self {
            users: decode_records(raw.users, "user"),
            messages: decode_records(raw.messages, "message"),
        })
    }
}

fn decode_records<T: DeserializeOwned>(records: Vec<Value>, kind: &str) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            serde_json::from_value(record)
                .map_err(|e| tracing::warn!(index, "Dropping unreadable {} record: {}", kind, e))
                .ok()
        })
        .collect()
}

/// Aggregate numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_users: usize,
    pub total_messages: usize,
    /// Naive estimate: one match per pair of users.
    pub active_matches: usize,
}

impl Stats {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            total_users: snapshot.users.len(),
            total_messages: snapshot.messages.len(),
            active_matches: snapshot.users.len() / 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_sequences_read_as_empty() {
        let snapshot: Snapshot =
            serde_json::from_value(json!({ "users": [], "status": "DELETED" })).unwrap();
        assert!(snapshot.users.is_empty());
        assert!(snapshot.messages.is_empty());
    }

    #[test]
    fn test_lenient_load_drops_only_bad_records() {
        let raw = json!({
            "users": [
                { "id": 1, "name": "a", "email": "a@x", "age": 20 },
                { "id": "not-a-number", "name": "b", "email": "b@x", "age": 21 },
                { "id": 3, "name": "c", "email": "c@x", "age": 22 }
            ],
            "messages": [
                { "from": "alice", "to": 2, "text": "hi", "timestamp": "t" },
                { "from": 1, "to": 3, "text": "yo", "timestamp": "t" }
            ]
        });

        let snapshot = Snapshot::from_json_lenient(raw.to_string().as_bytes()).unwrap();
        let ids: Vec<_> = snapshot.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].text, "yo");
    }

    #[test]
    fn test_lenient_load_rejects_non_snapshot_documents() {
        assert!(Snapshot::from_json_lenient(b"{ not json").is_err());
        assert!(Snapshot::from_json_lenient(b"[1, 2]").is_err());
        assert!(Snapshot::from_json_lenient(br#"{"users": 5}"#).is_err());
    }

    #[test]
    fn test_stats_floor_half() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "users": [
                { "id": 1, "name": "a", "email": "a@x", "age": 20 },
                { "id": 2, "name": "b", "email": "b@x", "age": 21 },
                { "id": 3, "name": "c", "email": "c@x", "age": 22 }
            ],
            "messages": [
                { "from": 1, "to": 2, "text": "hi", "timestamp": "t" }
            ]
        }))
        .unwrap();

        let stats = Stats::from_snapshot(&snapshot);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_messages, 1);
        assert_eq!(stats.active_matches, 1);
    }
}
