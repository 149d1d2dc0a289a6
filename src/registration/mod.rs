//! Registration validation.
//!
//! Turns a submitted form plus its stored uploads into a new user, or a
//! repeat lookup of an existing one. Any rejection removes every file
//! uploaded with the request before the error is returned.

use std::collections::HashSet;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::{
    NewUser, User, DEFAULT_BIO, DEFAULT_GENDER, DEFAULT_LOOKING_FOR, EVERYONE,
};
use crate::safety::ImageSafetyChecker;
use crate::sanitize::{sanitize_input, sanitize_optional};
use crate::store::{InsertOutcome, Repository};
use crate::uploads::{StoredUpload, UploadStore};

/// Youngest age accepted at registration.
pub const MIN_AGE: i64 = 18;

/// Raw text fields of a registration submission.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub age: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub interested_in: Option<String>,
    pub looking_for: Option<String>,
    /// JSON array of tags
    pub interests: Option<String>,
}

/// Files stored for a registration submission.
#[derive(Debug, Clone, Default)]
pub struct RegistrationUploads {
    pub photo: Option<StoredUpload>,
    pub social_qr: Option<StoredUpload>,
}

impl RegistrationUploads {
    fn iter(&self) -> impl Iterator<Item = &StoredUpload> {
        self.photo.iter().chain(self.social_qr.iter())
    }
}

/// Successful registration result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub user: User,
    pub is_returning: bool,
}

/// Collaborators used during registration.
pub struct Registrar<'a> {
    pub repo: &'a Repository,
    pub uploads: &'a UploadStore,
    pub safety: &'a dyn ImageSafetyChecker,
}

impl Registrar<'_> {
    /// Register a user, cleaning up `files` whenever they will not be kept.
    pub async fn register(
        &self,
        form: RegistrationForm,
        files: RegistrationUploads,
    ) -> Result<RegistrationOutcome, AppError> {
        match self.try_register(form, &files).await {
            Ok(outcome) => {
                if outcome.is_returning {
                    self.uploads.remove_all(files.iter()).await;
                }
                Ok(outcome)
            }
            Err(e) => {
                self.uploads.remove_all(files.iter()).await;
                Err(e)
            }
        }
    }

    async fn try_register(
        &self,
        form: RegistrationForm,
        files: &RegistrationUploads,
    ) -> Result<RegistrationOutcome, AppError> {
        let email = sanitize_optional(form.email.as_deref())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| AppError::Validation("Email is required".to_string()))?;

        if let Some(existing) = self.repo.find_user_by_email(&email).await {
            tracing::debug!(user_id = existing.id, "returning user");
            return Ok(RegistrationOutcome {
                user: existing,
                is_returning: true,
            });
        }

        let name = form.name.as_deref().map(sanitize_input).unwrap_or_default();
        let age = parse_age(form.age.as_deref());
        let age = match age {
            Some(age) if !name.is_empty() => age,
            _ => {
                return Err(AppError::Validation(
                    "Invalid data or under 18.".to_string(),
                ))
            }
        };

        let Some(social_qr) = files.social_qr.as_ref() else {
            return Err(AppError::Validation(
                "Social QR is mandatory! Please upload yours.".to_string(),
            ));
        };

        let interests = parse_interests(form.interests.as_deref())?;

        if let Some(photo) = files.photo.as_ref() {
            if !self.safety.is_safe(&photo.path).await {
                tracing::warn!("Photo rejected by image safety check");
                return Err(AppError::Validation(
                    "Your photo was rejected by the safety check. Please use a different one."
                        .to_string(),
                ));
            }
        }

        if !self.safety.is_safe(&social_qr.path).await {
            tracing::warn!("Social QR rejected by image safety check");
            return Err(AppError::Validation(
                "Your Social QR was rejected by the safety check. Please use a valid QR code."
                    .to_string(),
            ));
        }

        let new_user = NewUser {
            name,
            email,
            age,
            bio: sanitize_optional(form.bio.as_deref()).unwrap_or_else(|| DEFAULT_BIO.to_string()),
            gender: sanitize_optional(form.gender.as_deref())
                .unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            interested_in: sanitize_optional(form.interested_in.as_deref())
                .unwrap_or_else(|| EVERYONE.to_string()),
            looking_for: sanitize_optional(form.looking_for.as_deref())
                .unwrap_or_else(|| DEFAULT_LOOKING_FOR.to_string()),
            interests,
            img: files.photo.as_ref().map(|p| p.public_url.clone()),
            social_qr: Some(social_qr.public_url.clone()),
        };

        Ok(match self.repo.insert_user(new_user).await? {
            InsertOutcome::Created(user) => RegistrationOutcome {
                user,
                is_returning: false,
            },
            InsertOutcome::Existing(user) => RegistrationOutcome {
                user,
                is_returning: true,
            },
        })
    }
}

/// Parse an age field; anything that is not an integer >= 18 is rejected.
fn parse_age(raw: Option<&str>) -> Option<u32> {
    let age: i64 = raw?.trim().parse().ok()?;
    if age < MIN_AGE {
        return None;
    }
    u32::try_from(age).ok()
}

/// Parse the interests field: a JSON array of tags, sanitized and de-duplicated.
fn parse_interests(raw: Option<&str>) -> Result<Vec<String>, AppError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(Vec::new());
    };

    let tags: Vec<String> = serde_json::from_str(raw)
        .map_err(|_| AppError::Validation("Interests must be a JSON array of strings".to_string()))?;

    let mut seen = HashSet::new();
    Ok(tags
        .iter()
        .map(|t| sanitize_input(t))
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect())
}
