mod dto;
pub mod handlers;
mod repo;
mod repo_types;
pub mod services;
pub mod targets;

use crate::state::AppState;
use axum::Router;

pub use repo_types::UserProfile;
pub use targets::{derive_targets, Goal, Targets};

pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
