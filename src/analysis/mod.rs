//! The `analyze-food` and `calculate-goals` proxy handlers.

pub mod dto;
mod emoji;
pub mod handlers;
mod prompts;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::proxy_routes()
}
