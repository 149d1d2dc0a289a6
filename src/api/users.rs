//! Login and registration endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{LoginRequest, User};
use crate::registration::{Registrar, RegistrationForm, RegistrationOutcome, RegistrationUploads};
use crate::uploads::StoredUpload;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: RegistrationOutcome,
}

/// POST /api/login - Email-only login.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = request
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".to_string()))?;

    match state.repo.find_user_by_email(&email).await {
        Some(user) => success(LoginResponse {
            success: true,
            user,
        }),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}

/// POST /api/register - Multipart registration with photo and social QR.
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<RegisterResponse> {
    let (form, files) = read_registration(&state, multipart).await?;

    let registrar = Registrar {
        repo: &state.repo,
        uploads: &state.uploads,
        safety: state.safety.as_ref(),
    };
    let outcome = registrar.register(form, files).await?;

    success(RegisterResponse {
        success: true,
        outcome,
    })
}

/// Drain the multipart stream, storing file parts as they arrive.
///
/// If the stream fails part way, files already stored are removed.
async fn read_registration(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<(RegistrationForm, RegistrationUploads), AppError> {
    let mut form = RegistrationForm::default();
    let mut files = RegistrationUploads::default();

    loop {
        let result = next_part(state, &mut multipart, &mut form, &mut files).await;
        match result {
            Ok(true) => continue,
            Ok(false) => return Ok((form, files)),
            Err(e) => {
                let stored: Vec<&StoredUpload> =
                    files.photo.iter().chain(files.social_qr.iter()).collect();
                state.uploads.remove_all(stored).await;
                return Err(e);
            }
        }
    }
}

/// Handle one multipart field. Returns `false` once the stream is exhausted.
async fn next_part(
    state: &AppState,
    multipart: &mut Multipart,
    form: &mut RegistrationForm,
    files: &mut RegistrationUploads,
) -> Result<bool, AppError> {
    let Some(field) = multipart.next_field().await? else {
        return Ok(false);
    };

    let name = field.name().unwrap_or("").to_string();
    match name.as_str() {
        "photo" | "socialQr" => {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?;

            // Browsers send an empty part when no file was chosen.
            if data.is_empty() && file_name.as_deref().unwrap_or("").is_empty() {
                return Ok(true);
            }

            let slot = if name == "photo" {
                &mut files.photo
            } else {
                &mut files.social_qr
            };
            // Only the first file per field is kept.
            if slot.is_some() {
                return Ok(true);
            }

            let stored = state
                .uploads
                .save(file_name.as_deref(), content_type.as_deref(), &data)
                .await?;
            *slot = Some(stored);
        }
        _ => {
            let value = field.text().await?;
            let target = match name.as_str() {
                "name" => &mut form.name,
                "age" => &mut form.age,
                "email" => &mut form.email,
                "bio" => &mut form.bio,
                "gender" => &mut form.gender,
                "interestedIn" => &mut form.interested_in,
                "lookingFor" => &mut form.looking_for,
                "interests" => &mut form.interests,
                other => {
                    tracing::debug!("Ignoring unknown registration field {:?}", other);
                    return Ok(true);
                }
            };
            *target = Some(value);
        }
    }

    Ok(true)
}
