use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ApiError;
use crate::leaderboard::AppState;
use crate::notify::CompletionEvent;

/// How many users the leaderboard shows.
const LEADERBOARD_SIZE: usize = 10;

const EMPTY_BOARD_MESSAGE: &str =
    "Please post results to retrieve the top 10 users by average score";

/// Receive one pushed game result from the game server.
pub async fn post_result(
    State(state): State<Arc<AppState>>,
    Json(event): Json<CompletionEvent>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let record = state
        .scores
        .record_result(&event.user, event.decision, event.guesses_used)
        .await?;

    tracing::info!(
        "Recorded {:?} for {} (average now {:.3})",
        event.decision,
        event.user,
        record.average()
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Game results successfully posted." })),
    ))
}

/// Top users by average score, or a hint when nothing has been posted yet.
pub async fn leaderboard(State(state): State<Arc<AppState>>) -> Response {
    let entries = state.scores.top(LEADERBOARD_SIZE).await;
    if entries.is_empty() {
        EMPTY_BOARD_MESSAGE.into_response()
    } else {
        Json(entries).into_response()
    }
}
