use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateFoodEntryRequest, ListQuery};
use super::repo;
use super::repo_types::FoodEntry;
use super::services::{log_meal, start_of_day};
use crate::{auth::AuthUser, errors::ApiError, state::AppState};

pub fn food_entry_routes() -> Router<AppState> {
    Router::new()
        .route("/food-entries", get(list_entries).post(create_entry))
        .route("/food-entries/:id", delete(delete_entry))
}

/// GET /food-entries?from=&to= (defaults to today, UTC)
#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<FoodEntry>>, ApiError> {
    let Query(q) = query?;
    let from = q
        .from
        .unwrap_or_else(|| start_of_day(OffsetDateTime::now_utc()));
    let entries = repo::list_between(&state.db, user_id, from, q.to).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateFoodEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<FoodEntry>), ApiError> {
    let Json(body) = payload?;
    let entry = log_meal(
        &state.db,
        state.llm.as_ref(),
        user_id,
        &body.food_description,
        body.meal_time,
    )
    .await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/v1/food-entries/{}", entry.id))
        .map_err(|e| ApiError::Internal(e.into()))?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(entry)))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("food entry not found".into()));
    }
    info!(%user_id, %id, "food entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
