//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod admin;
mod matches;
mod messages;
mod users;

pub use admin::*;
pub use matches::*;
pub use messages::*;
pub use users::*;

use axum::Json;

use crate::errors::AppError;

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Create a successful API response.
pub fn success<T>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}
