//! Chat message model.

use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_opt_id, UserId};

/// A single chat message between two users. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    #[serde(deserialize_with = "deserialize_id")]
    pub from: UserId,
    #[serde(deserialize_with = "deserialize_id")]
    pub to: UserId,
    pub text: String,
    pub timestamp: String,
}

impl Message {
    /// Whether this message belongs to the thread between `a` and `b`.
    pub fn is_between(&self, a: UserId, b: UserId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// Request body for posting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub from: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub to: Option<UserId>,
    #[serde(default)]
    pub text: Option<String>,
}
