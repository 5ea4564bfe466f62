use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use super::dto::{CalculateGoalsRequest, FoodAnalysis, NutritionGoals};
use super::{emoji, prompts};
use crate::errors::ApiError;
use crate::llm::CompletionClient;

const MACROS: [&str; 3] = ["protein", "carbs", "fat"];
const GOAL_FIELDS: [&str; 4] = ["dailyCalories", "protein", "carbs", "fat"];

/// Estimates nutrition for a free-text meal description.
///
/// Blank descriptions are rejected before the completion API is called. The
/// returned object is the model's output after validation, with `emoji`
/// narrowed to a single emoji.
#[instrument(skip(llm))]
pub async fn analyze_food(llm: &dyn CompletionClient, description: &str) -> Result<Value, ApiError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ApiError::BadRequest("foodDescription is required".into()));
    }

    let content = llm.complete(&prompts::food_analysis(description)).await?;
    let analysis = validate_food_analysis(&content)?;
    info!(calories = ?analysis.get("calories"), "food analyzed");
    Ok(analysis)
}

/// Asks the model for daily targets. Metrics are forwarded as given.
#[instrument(skip(llm))]
pub async fn calculate_goals(
    llm: &dyn CompletionClient,
    metrics: &CalculateGoalsRequest,
) -> Result<Value, ApiError> {
    let content = llm.complete(&prompts::goal_calculation(metrics)).await?;
    let goals = validate_goals(&content)?;
    info!(daily_calories = ?goals.get("dailyCalories"), "goals calculated");
    Ok(goals)
}

impl FoodAnalysis {
    /// Reads an object produced by [`validate_food_analysis`].
    pub fn from_validated(value: Value) -> Result<Self, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::InvalidModelOutput(e.to_string()))
    }
}

impl NutritionGoals {
    /// Reads an object produced by [`validate_goals`].
    pub fn from_validated(value: Value) -> Result<Self, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::InvalidModelOutput(e.to_string()))
    }
}

fn parse_object(content: &str) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(invalid("model output is not a JSON object")),
        Err(e) => {
            warn!(error = %e, "model output is not JSON");
            Err(invalid(format!("model output is not valid JSON: {e}")))
        }
    }
}

fn invalid(msg: impl Into<String>) -> ApiError {
    ApiError::InvalidModelOutput(msg.into())
}

/// Checks that `key` holds a finite, non-negative number.
///
/// Absent and `null` are accepted only when the field is optional.
fn check_number(obj: &Map<String, Value>, key: &str, required: bool) -> Result<(), ApiError> {
    match obj.get(key) {
        None | Some(Value::Null) if !required => Ok(()),
        None => Err(invalid(format!("model output is missing `{key}`"))),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(()),
            _ => Err(invalid(format!("`{key}` must be a non-negative number"))),
        },
        Some(_) => Err(invalid(format!("`{key}` must be a number"))),
    }
}

pub fn validate_food_analysis(content: &str) -> Result<Value, ApiError> {
    let mut obj = parse_object(content)?;

    check_number(&obj, "calories", true)?;
    for key in MACROS {
        check_number(&obj, key, false)?;
    }

    let narrowed = match obj.get("emoji") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(emoji::first_emoji(s).map(str::to_owned)),
        Some(_) => return Err(invalid("`emoji` must be a string")),
    };
    match narrowed {
        Some(Some(first)) => {
            obj.insert("emoji".into(), Value::String(first));
        }
        Some(None) => {
            obj.remove("emoji");
        }
        None => {}
    }

    Ok(Value::Object(obj))
}

pub fn validate_goals(content: &str) -> Result<Value, ApiError> {
    let obj = parse_object(content)?;
    for key in GOAL_FIELDS {
        check_number(&obj, key, true)?;
    }
    Ok(Value::Object(obj))
}
