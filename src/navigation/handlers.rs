use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::rules::{resolve, AppRoute, Session};
use crate::{auth::MaybeAuthUser, errors::ApiError, profiles::repo as profiles_repo, state::AppState};

#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    pub route: String,
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    /// Page to redirect to, or `null` to render the requested one.
    pub target: Option<&'static str>,
}

pub fn navigation_routes() -> Router<AppState> {
    Router::new().route("/navigation", get(navigate))
}

/// GET /navigation?route=/track
#[instrument(skip(state, user))]
pub async fn navigate(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    query: Result<Query<NavigationQuery>, QueryRejection>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let Query(q) = query?;
    let route = AppRoute::from_path(&q.route)
        .ok_or_else(|| ApiError::NotFound(format!("unknown route {}", q.route)))?;

    let session = match user {
        None => Session::default(),
        Some(user_id) => {
            let profile = profiles_repo::find(&state.db, user_id).await?;
            Session {
                authenticated: true,
                profile_complete: profile.is_some_and(|p| p.is_complete()),
            }
        }
    };

    let target = resolve(route, session).map(AppRoute::path);
    debug!(route = route.path(), ?target, "navigation resolved");
    Ok(Json(NavigationResponse { target }))
}
