use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::estimation::EstimationError;

/// Failures a single inbound request can end in. None of them outlive the
/// request that produced them.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed user input; nothing was written.
    #[error("{0}")]
    Validation(String),

    /// Inference failed, timed out or returned a non-conforming result; nothing was logged.
    #[error(transparent)]
    Estimation(#[from] EstimationError),

    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Estimation(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_kinds_to_status() {
        assert_eq!(AppError::validation("bad goal").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(EstimationError::EmptyResponse).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = AppError::validation("goal must be one of cut, maintain, bulk");
        assert_eq!(err.to_string(), "goal must be one of cut, maintain, bulk");
    }
}
