//! Admin endpoints.
//!
//! The key is checked before any store access.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::{admin_key_from_headers, require_admin};
use crate::models::{parse_user_id, Stats, User};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminKeyQuery {
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserQuery {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/admin/users?key= - List every user.
pub async fn admin_list_users(
    State(state): State<AppState>,
    Query(query): Query<AdminKeyQuery>,
) -> ApiResult<Vec<User>> {
    require_admin(state.admin.as_ref(), query.key.as_deref())?;

    success(state.repo.list_users().await)
}

/// DELETE /api/admin/delete?id= - Hard-delete a user. Unknown ids are a no-op.
pub async fn admin_delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DeleteUserQuery>,
) -> ApiResult<DeleteResponse> {
    require_admin(state.admin.as_ref(), admin_key_from_headers(&headers))?;

    let id = query.id.as_deref().and_then(parse_user_id);
    state.repo.delete_user(id).await?;

    success(DeleteResponse { success: true })
}

/// GET /api/admin/stats?key= - Aggregate counts.
pub async fn admin_stats(
    State(state): State<AppState>,
    Query(query): Query<AdminKeyQuery>,
) -> ApiResult<Stats> {
    require_admin(state.admin.as_ref(), query.key.as_deref())?;

    success(state.repo.stats().await)
}
