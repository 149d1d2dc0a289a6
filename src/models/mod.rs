//! Data models for the matchmaker backend.
//!
//! Field names match the persisted JSON layout and the frontend payloads.

mod id;
mod message;
mod snapshot;
mod user;

pub use id::*;
pub use message::*;
pub use snapshot::*;
pub use user::*;

use chrono::{SecondsFormat, Utc};

/// Current time as an RFC 3339 string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
