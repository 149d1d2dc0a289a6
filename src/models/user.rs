//! User model matching the persisted user record.

use serde::{Deserialize, Serialize};

use super::{deserialize_id, UserId};

/// Preference value that accepts any gender.
pub const EVERYONE: &str = "Everyone";
pub const DEFAULT_GENDER: &str = "Secret";
pub const DEFAULT_LOOKING_FOR: &str = "Connection";
pub const DEFAULT_BIO: &str = "A mysterious cutie...";

/// A registered user.
///
/// `gender`, `interested_in` and `looking_for` are open tags: any string is
/// accepted, with defaults applied when a value is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: u32,
    #[serde(default)]
    pub bio: String,
    #[serde(default = "default_gender")]
    pub gender: String,
    #[serde(default = "default_interested_in")]
    pub interested_in: String,
    #[serde(default = "default_looking_for")]
    pub looking_for: String,
    #[serde(default)]
    pub interests: Vec<String>,
    /// Public URL of the profile photo
    #[serde(default)]
    pub img: Option<String>,
    /// Public URL of the social-contact QR code
    #[serde(default)]
    pub social_qr: Option<String>,
    #[serde(default)]
    pub registered_at: String,
}

impl User {
    /// Gender tag, falling back to the default for blank values.
    pub fn gender_tag(&self) -> &str {
        non_blank(&self.gender).unwrap_or(DEFAULT_GENDER)
    }

    /// Preference tag, falling back to "Everyone" for blank values.
    pub fn preference_tag(&self) -> &str {
        non_blank(&self.interested_in).unwrap_or(EVERYONE)
    }

    /// Whether this user's stated preference admits `other`'s gender.
    pub fn accepts(&self, other: &User) -> bool {
        let preference = self.preference_tag();
        preference == EVERYONE || preference == other.gender_tag()
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn default_gender() -> String {
    DEFAULT_GENDER.to_string()
}

fn default_interested_in() -> String {
    EVERYONE.to_string()
}

fn default_looking_for() -> String {
    DEFAULT_LOOKING_FOR.to_string()
}

/// A user record before the store assigns its id and registration time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub bio: String,
    pub gender: String,
    pub interested_in: String,
    pub looking_for: String,
    pub interests: Vec<String>,
    pub img: Option<String>,
    pub social_qr: Option<String>,
}

impl NewUser {
    pub fn into_user(self, id: UserId, registered_at: String) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
            bio: self.bio,
            gender: self.gender,
            interested_in: self.interested_in,
            looking_for: self.looking_for,
            interests: self.interests,
            img: self.img,
            social_qr: self.social_qr,
            registered_at,
        }
    }
}

/// Request body for the email-only login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
}
