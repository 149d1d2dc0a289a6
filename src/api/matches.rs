//! Match ranking endpoint.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::matcher::{rank_matches, ScoredMatch};
use crate::models::parse_user_id;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    /// "real" when the user exists, "none" otherwise
    pub source: &'static str,
    pub matches: Vec<ScoredMatch>,
}

/// GET /api/matches?userId= - Rank every other user for the given user.
pub async fn get_matches(
    State(state): State<AppState>,
    Query(query): Query<MatchesQuery>,
) -> ApiResult<MatchesResponse> {
    let snapshot = state.repo.snapshot().await;
    let user = query
        .user_id
        .as_deref()
        .and_then(parse_user_id)
        .and_then(|id| snapshot.users.iter().find(|u| u.id == id));

    let Some(user) = user else {
        return success(MatchesResponse {
            source: "none",
            matches: Vec::new(),
        });
    };

    success(MatchesResponse {
        source: "real",
        matches: rank_matches(user, &snapshot.users),
    })
}
