//! Admin authorization.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name carrying the admin key on delete requests.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Decides whether a presented admin credential is valid.
pub trait AdminAuthorizer: Send + Sync {
    fn is_authorized(&self, provided: Option<&str>) -> bool;
}

/// Single shared admin secret.
///
/// With no secret configured every request is rejected.
#[derive(Clone)]
pub struct SharedSecret {
    secret: Option<String>,
}

impl SharedSecret {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

impl AdminAuthorizer for SharedSecret {
    fn is_authorized(&self, provided: Option<&str>) -> bool {
        match (&self.secret, provided) {
            (Some(expected), Some(provided)) => constant_time_compare(provided, expected),
            _ => false,
        }
    }
}

/// Check a credential, turning a mismatch into a 403.
pub fn require_admin(
    authorizer: &dyn AdminAuthorizer,
    provided: Option<&str>,
) -> Result<(), AppError> {
    if authorizer.is_authorized(provided) {
        Ok(())
    } else {
        tracing::warn!("Rejected admin request");
        Err(AppError::Forbidden("Unauthorized".to_string()))
    }
}

/// Admin key from the `x-admin-key` header.
pub fn admin_key_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}
