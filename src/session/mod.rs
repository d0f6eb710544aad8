mod auth;
pub mod commands;
mod dto;
pub mod format;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use auth::TransportAuth;
pub use dto::{Reply, ReplyKind};

pub fn router() -> Router<AppState> {
    handlers::chat_routes()
}
