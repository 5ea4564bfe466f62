use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{ProfileResponse, UpdateProfileRequest};
use super::repo;
use super::repo_types::ProfileChanges;
use crate::{
    analysis::{
        dto::{CalculateGoalsRequest, NutritionGoals},
        services as analysis,
    },
    auth::AuthUser,
    errors::ApiError,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/onboarding", post(complete_onboarding))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = repo::get_or_create(&state.db, user_id).await?;
    Ok(Json(profile.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(body) = payload?;
    let changes = body.into_changes()?;
    let profile = repo::upsert(&state.db, user_id, &changes).await?;
    info!(%user_id, "profile updated");
    Ok(Json(profile.into()))
}

/// Rounds a model-provided amount to a stored whole number.
fn whole(v: f64) -> i32 {
    v.round().clamp(0.0, i32::MAX as f64) as i32
}

/// Checks onboarding metrics and returns the age as stored.
fn checked_age(metrics: &CalculateGoalsRequest) -> Result<i32, ApiError> {
    if !(metrics.height.is_finite() && metrics.height > 0.0) {
        return Err(ApiError::BadRequest("height must be positive".into()));
    }
    if !(metrics.weight.is_finite() && metrics.weight > 0.0) {
        return Err(ApiError::BadRequest("weight must be positive".into()));
    }
    match i32::try_from(metrics.age) {
        Ok(age) if age > 0 => Ok(age),
        _ => Err(ApiError::BadRequest("age must be positive".into())),
    }
}

/// Profile fields written by onboarding. A calorie target that rounds to
/// zero is rejected.
fn onboarding_changes(
    age: i32,
    metrics: &CalculateGoalsRequest,
    goals: &NutritionGoals,
) -> Result<ProfileChanges, ApiError> {
    let daily_calories = whole(goals.daily_calories);
    if daily_calories <= 0 {
        return Err(ApiError::InvalidModelOutput(format!(
            "dailyCalories must be at least 1, got {}",
            goals.daily_calories
        )));
    }
    Ok(ProfileChanges {
        age: Some(age),
        height: Some(metrics.height),
        weight: Some(metrics.weight),
        weight_goal: Some(metrics.goal),
        daily_calories: Some(daily_calories),
        protein_goal: Some(whole(goals.protein)),
        carbs_goal: Some(whole(goals.carbs)),
        fat_goal: Some(whole(goals.fat)),
    })
}

/// POST /onboarding: calculate goals from metrics and store both.
#[instrument(skip(state, payload))]
pub async fn complete_onboarding(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CalculateGoalsRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(metrics) = payload?;
    let age = checked_age(&metrics)?;

    let raw = analysis::calculate_goals(state.llm.as_ref(), &metrics).await?;
    let goals = NutritionGoals::from_validated(raw)?;
    let changes = onboarding_changes(age, &metrics, &goals)?;

    let profile = repo::upsert(&state.db, user_id, &changes).await?;
    info!(%user_id, daily_calories = ?profile.daily_calories, "onboarding completed");
    Ok(Json(profile.into()))
}
