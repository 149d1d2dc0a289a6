//! Chat endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{now_timestamp, parse_user_id, Message, PostMessageRequest};
use crate::sanitize::sanitize_input;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub success: bool,
    pub message: Message,
}

/// GET /api/messages?from=&to= - The thread between two users.
///
/// A missing or non-numeric id matches no message, so the thread is empty.
pub async fn get_thread(
    State(state): State<AppState>,
    Query(query): Query<ThreadQuery>,
) -> ApiResult<Vec<Message>> {
    let from = query.from.as_deref().and_then(parse_user_id);
    let to = query.to.as_deref().and_then(parse_user_id);

    let (Some(from), Some(to)) = (from, to) else {
        return success(Vec::new());
    };

    success(state.repo.thread(from, to).await)
}

/// POST /api/messages - Append a message to a thread.
pub async fn post_message(
    State(state): State<AppState>,
    Json(request): Json<PostMessageRequest>,
) -> ApiResult<PostMessageResponse> {
    let text = request.text.filter(|t| !t.is_empty());
    let (Some(from), Some(to), Some(text)) = (request.from, request.to, text) else {
        return Err(AppError::Validation("Missing fields".to_string()));
    };

    let message = Message {
        from,
        to,
        text: sanitize_input(&text),
        timestamp: now_timestamp(),
    };

    let message = state.repo.append_message(message).await?;

    success(PostMessageResponse {
        success: true,
        message,
    })
}
