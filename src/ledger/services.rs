//! Daily ledger: append-only log of estimations, aggregated per local calendar day.
//!
//! Day scoping compares the date prefix of the stored timestamp, not a rolling
//! 24h window. Nothing serializes a reset against an estimation that is still
//! in flight for the same user: if the reset lands first, that estimation's
//! entry is written afterwards and survives the reset.

use time::{Date, PrimitiveDateTime};
use tracing::{info, instrument};

use super::repo;
use super::repo_types::{FoodLogEntry, NewLogEntry, Source};
use crate::clock::format_date;
use crate::error::AppError;
use crate::estimation::{EstimationResult, Macros};
use crate::state::AppState;

#[instrument(skip(st, raw_input, result), fields(calories = result.total.calories))]
pub async fn log_entry(
    st: &AppState,
    user_id: i64,
    source: Source,
    raw_input: &str,
    result: &EstimationResult,
) -> Result<(), AppError> {
    log_entry_at(st, user_id, source, raw_input, result, st.clock.now()).await
}

pub(crate) async fn log_entry_at(
    st: &AppState,
    user_id: i64,
    source: Source,
    raw_input: &str,
    result: &EstimationResult,
    at: PrimitiveDateTime,
) -> Result<(), AppError> {
    let entry = NewLogEntry::project(user_id, source, raw_input, result, at);
    let id = repo::insert(&st.db, &entry).await?;
    info!(user_id, id, ?source, rating = entry.diet_rating.as_str(), "food logged");
    Ok(())
}

/// Totals for the current local day; all zeros when nothing was logged.
#[instrument(skip(st))]
pub async fn sum_today(st: &AppState, user_id: i64) -> Result<Macros, AppError> {
    sum_for_day(st, user_id, st.clock.today()).await
}

pub async fn sum_for_day(st: &AppState, user_id: i64, day: Date) -> Result<Macros, AppError> {
    Ok(repo::sum_for_day(&st.db, user_id, &format_date(day)).await?)
}

#[instrument(skip(st))]
pub async fn list_today(st: &AppState, user_id: i64) -> Result<Vec<FoodLogEntry>, AppError> {
    Ok(repo::list_for_day(&st.db, user_id, &format_date(st.clock.today())).await?)
}

/// Irreversibly deletes today's entries for `user_id`. Earlier days are kept.
#[instrument(skip(st))]
pub async fn reset_today(st: &AppState, user_id: i64) -> Result<u64, AppError> {
    let deleted = repo::delete_for_day(&st.db, user_id, &format_date(st.clock.today())).await?;
    info!(user_id, deleted, "day reset");
    Ok(deleted)
}
