use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::instrument;

use super::dto::{AnalyzeFoodRequest, CalculateGoalsRequest};
use super::services;
use crate::{errors::ApiError, state::AppState};

pub fn proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-food", post(analyze_food))
        .route("/calculate-goals", post(calculate_goals))
}

/// POST /analyze-food {"foodDescription": "..."}
#[instrument(skip(state, payload))]
pub async fn analyze_food(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeFoodRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let description = body.food_description.unwrap_or_default();
    let analysis = services::analyze_food(state.llm.as_ref(), &description).await?;
    Ok(Json(analysis))
}

/// POST /calculate-goals {"age", "height", "weight", "goal"}
#[instrument(skip(state, payload))]
pub async fn calculate_goals(
    State(state): State<AppState>,
    payload: Result<Json<CalculateGoalsRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(metrics) = payload?;
    let goals = services::calculate_goals(state.llm.as_ref(), &metrics).await?;
    Ok(Json(goals))
}
