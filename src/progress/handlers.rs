use axum::{extract::State, routing::get, Json, Router};
use time::{Duration, OffsetDateTime};
use tracing::{debug, instrument};

use super::aggregate::{weekly_summary, DailyProgress, Goals, WeeklySummary, WEEK_DAYS};
use crate::{
    auth::AuthUser,
    errors::ApiError,
    food_entries::{repo as entries_repo, services::start_of_day},
    profiles::repo as profiles_repo,
    state::AppState,
};

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/progress/today", get(today))
        .route("/analytics/weekly", get(weekly))
}

#[instrument(skip(state))]
pub async fn today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DailyProgress>, ApiError> {
    let from = start_of_day(OffsetDateTime::now_utc());
    let entries =
        entries_repo::list_between(&state.db, user_id, from, Some(from + Duration::days(1))).await?;
    let profile = profiles_repo::find(&state.db, user_id).await?;

    let progress = DailyProgress::new(&entries, Goals::from_profile(profile.as_ref()));
    debug!(%user_id, entries = progress.entry_count, "daily progress");
    Ok(Json(progress))
}

#[instrument(skip(state))]
pub async fn weekly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<WeeklySummary>, ApiError> {
    let midnight = start_of_day(OffsetDateTime::now_utc());
    let from = midnight - Duration::days(WEEK_DAYS - 1);
    let to = midnight + Duration::days(1);

    let entries = entries_repo::list_between(&state.db, user_id, from, Some(to)).await?;
    let profile = profiles_repo::find(&state.db, user_id).await?;

    let summary = weekly_summary(&entries, Goals::from_profile(profile.as_ref()), midnight.date());
    Ok(Json(summary))
}
