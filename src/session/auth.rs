use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::warn;

use crate::state::AppState;

/// Admits requests from the chat bridge. When no `TRANSPORT_TOKEN` is
/// configured every request is admitted.
pub struct TransportAuth;

#[async_trait]
impl FromRequestParts<AppState> for TransportAuth {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.transport_token.as_deref() else {
            return Ok(TransportAuth);
        };

        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header".into()))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".into()))?;

        if token != expected {
            warn!("rejected request with wrong transport token");
            return Err((StatusCode::UNAUTHORIZED, "invalid transport token".into()));
        }
        Ok(TransportAuth)
    }
}
