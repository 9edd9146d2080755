//! Conversation history endpoint.
//!
//! ERROR HANDLING
//! ==============
//! Every upstream failure maps to `502 Bad Gateway` with a `{"error": ...}`
//! body; the client shows that text as an error line in the chat.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use views::ChatMessage;

use crate::state::AppState;
use crate::upstream::UpstreamError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `GET /api/conversations/{conv_id}/messages`
///
/// # Errors
///
/// Returns `502` with an [`ErrorBody`] when the backend fails.
pub async fn messages(
    State(state): State<AppState>,
    Path(conv_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, (StatusCode, Json<ErrorBody>)> {
    match state.history.fetch_history(&conv_id).await {
        Ok(messages) => {
            tracing::debug!(%conv_id, count = messages.len(), "relayed conversation history");
            Ok(Json(messages))
        }
        Err(err) => {
            tracing::warn!(%conv_id, error = %err, "history relay failed");
            Err(upstream_error_response(&err))
        }
    }
}

pub(crate) fn upstream_error_response(err: &UpstreamError) -> (StatusCode, Json<ErrorBody>) {
    let error = match err {
        UpstreamError::Rejected(message) => message.clone(),
        other => other.to_string(),
    };
    (StatusCode::BAD_GATEWAY, Json(ErrorBody { error }))
}

#[cfg(test)]
#[path = "conversations_test.rs"]
mod tests;
