//! Daily totals against goals and the weekly analytics view.

pub mod aggregate;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::progress_routes()
}
