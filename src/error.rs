use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::game::session::SessionError;
use crate::leaderboard::score::ScoreError;

/// Error returned to HTTP callers. Serializes as `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("request failed with {}: {}", self.status, self.message);
        } else {
            tracing::warn!("request rejected with {}: {}", self.status, self.message);
        }
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidGuessLength
            | SessionError::NotAValidGuess
            | SessionError::UnknownGame => ApiError::bad_request(err.to_string()),
            SessionError::Storage(e) => {
                tracing::error!("game storage failure: {}", e);
                ApiError::internal("internal server error")
            }
            SessionError::Evaluate(e) => {
                tracing::error!("stored guess failed evaluation: {}", e);
                ApiError::internal("internal server error")
            }
        }
    }
}

impl From<ScoreError> for ApiError {
    fn from(err: ScoreError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_map_to_client_or_server_status() {
        let err: ApiError = SessionError::InvalidGuessLength.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = SessionError::UnknownGame.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = SessionError::Storage(sqlx::Error::PoolClosed).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn score_errors_are_client_errors() {
        let err: ApiError = ScoreError::InconsistentLossGuessCount.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
