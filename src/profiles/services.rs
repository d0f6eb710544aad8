use tracing::{info, instrument};

use super::repo;
use super::repo_types::{ProfileRow, UserProfile};
use super::targets::{derive_targets, Goal, Targets};
use crate::clock::format_timestamp;
use crate::error::AppError;
use crate::state::AppState;

fn check_metric(name: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::validation(format!("{name} must be a positive number")))
    }
}

/// Validates the setup input, recomputes targets and overwrites the user's profile.
/// Nothing is written when validation fails.
#[instrument(skip(st))]
pub async fn upsert_profile(
    st: &AppState,
    user_id: i64,
    weight_kg: f64,
    height_cm: f64,
    goal: &str,
) -> Result<Targets, AppError> {
    let goal: Goal = goal
        .parse()
        .map_err(|e: super::targets::InvalidGoal| AppError::validation(e.to_string()))?;
    check_metric("weight", weight_kg)?;
    check_metric("height", height_cm)?;

    let targets = derive_targets(weight_kg, goal);
    let row = ProfileRow {
        user_id,
        weight_kg,
        height_cm,
        goal,
        target_calories: targets.calories,
        target_protein_g: targets.protein_g,
        updated_at: format_timestamp(st.clock.now()),
    };
    repo::upsert(&st.db, &row).await?;

    info!(user_id, %goal, target_calories = targets.calories, "profile saved");
    Ok(targets)
}

/// `None` means the user has not run setup yet.
#[instrument(skip(st))]
pub async fn get_profile(st: &AppState, user_id: i64) -> Result<Option<UserProfile>, AppError> {
    Ok(repo::find(&st.db, user_id).await?)
}
