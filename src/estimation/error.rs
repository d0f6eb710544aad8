use std::time::Duration;

use thiserror::Error;

/// Any way an estimation can fail. A caller seeing one of these must not log anything.
#[derive(Debug, Error)]
pub enum EstimationError {
    #[error("inference request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("inference provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("inference provider rate limited the request")]
    RateLimited,

    #[error("estimation timed out after {0:?}")]
    Timeout(Duration),

    #[error("model declined to estimate: {0}")]
    Refused(String),

    #[error("model returned no content")]
    EmptyResponse,

    #[error("model output does not match the response schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model output rejected: {0}")]
    Malformed(String),
}

impl EstimationError {
    pub fn is_retryable(&self) -> bool {
        match self {
            EstimationError::Network(_) | EstimationError::RateLimited => true,
            EstimationError::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}
