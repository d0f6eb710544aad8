use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::instrument;

use super::dto::{ProfileResponse, PutProfileRequest, TargetsResponse};
use super::services::{get_profile, upsert_profile};
use crate::{error::AppError, session::TransportAuth, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/users/:user_id/profile",
        get(get_user_profile).put(put_user_profile),
    )
}

#[instrument(skip(state, _auth))]
pub async fn get_user_profile(
    State(state): State<AppState>,
    _auth: TransportAuth,
    Path(user_id): Path<i64>,
) -> Result<Response, AppError> {
    let resp = match get_profile(&state, user_id).await? {
        Some(p) => Json(ProfileResponse::from(p)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "profile not configured" })),
        )
            .into_response(),
    };
    Ok(resp)
}

#[instrument(skip(state, _auth, body))]
pub async fn put_user_profile(
    State(state): State<AppState>,
    _auth: TransportAuth,
    Path(user_id): Path<i64>,
    Json(body): Json<PutProfileRequest>,
) -> Result<Json<TargetsResponse>, AppError> {
    let targets =
        upsert_profile(&state, user_id, body.weight_kg, body.height_cm, &body.goal).await?;
    Ok(Json(targets.into()))
}
