mod dto;
pub mod handlers;
mod repo;
mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo_types::{FoodLogEntry, Source};

pub fn router() -> Router<AppState> {
    handlers::ledger_routes()
}
