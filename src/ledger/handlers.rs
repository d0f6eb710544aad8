use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{ResetResponse, TodayResponse};
use super::services::{list_today, reset_today, sum_today};
use crate::{
    clock::format_date, error::AppError, profiles::services::get_profile, session::TransportAuth,
    state::AppState,
};

pub fn ledger_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/today", get(get_today).delete(delete_today))
}

#[instrument(skip(state, _auth))]
pub async fn get_today(
    State(state): State<AppState>,
    _auth: TransportAuth,
    Path(user_id): Path<i64>,
) -> Result<Json<TodayResponse>, AppError> {
    let profile = get_profile(&state, user_id).await?;
    let totals = sum_today(&state, user_id).await?;
    let entries = list_today(&state, user_id).await?;
    Ok(Json(TodayResponse {
        date: format_date(state.clock.today()),
        totals,
        target_calories: profile.as_ref().map(|p| p.target_calories),
        target_protein_g: profile.as_ref().map(|p| p.target_protein_g),
        entries: entries.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, _auth))]
pub async fn delete_today(
    State(state): State<AppState>,
    _auth: TransportAuth,
    Path(user_id): Path<i64>,
) -> Result<Json<ResetResponse>, AppError> {
    let deleted = reset_today(&state, user_id).await?;
    Ok(Json(ResetResponse { deleted }))
}
