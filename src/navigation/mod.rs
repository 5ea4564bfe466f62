//! Which page a visitor may see, given sign-in state and profile completeness.

pub mod handlers;
pub mod rules;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::navigation_routes()
}
