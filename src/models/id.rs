//! Lenient user id handling.
//!
//! Clients and older store files carry ids either as JSON numbers or as
//! numeric strings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// User identifier (milliseconds since the Unix epoch at creation).
pub type UserId = i64;

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Int(i64),
    Text(String),
}

impl LooseId {
    fn into_id(self) -> Option<UserId> {
        match self {
            LooseId::Int(n) => Some(n),
            LooseId::Text(s) => parse_user_id(&s),
        }
    }
}

/// Parse an id from query-string or form text.
pub fn parse_user_id(raw: &str) -> Option<UserId> {
    raw.trim().parse().ok()
}

/// Deserialize a required id from a number or numeric string.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    LooseId::deserialize(deserializer)?
        .into_id()
        .ok_or_else(|| D::Error::custom("expected a numeric id"))
}

/// Deserialize an optional id; unparseable values read as absent.
pub fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LooseId>::deserialize(deserializer)?.and_then(LooseId::into_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "deserialize_id")]
        id: UserId,
        #[serde(default, deserialize_with = "deserialize_opt_id")]
        other: Option<UserId>,
    }

    #[test]
    fn test_number_and_string_ids() {
        let w: Wrapper = serde_json::from_value(json!({ "id": 42, "other": "7" })).unwrap();
        assert_eq!(w.id, 42);
        assert_eq!(w.other, Some(7));

        let w: Wrapper = serde_json::from_value(json!({ "id": " 1739000000000 " })).unwrap();
        assert_eq!(w.id, 1_739_000_000_000);
        assert_eq!(w.other, None);
    }

    #[test]
    fn test_non_numeric_ids() {
        assert!(serde_json::from_value::<Wrapper>(json!({ "id": "abc" })).is_err());

        let w: Wrapper = serde_json::from_value(json!({ "id": 1, "other": "abc" })).unwrap();
        assert_eq!(w.other, None);

        let w: Wrapper = serde_json::from_value(json!({ "id": 1, "other": null })).unwrap();
        assert_eq!(w.other, None);
    }
}
