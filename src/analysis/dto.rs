use serde::{Deserialize, Serialize};

use crate::profiles::repo_types::WeightGoal;

/// `POST /analyze-food` body. The field is optional here so that a missing
/// description gets the same 400 as an empty one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFoodRequest {
    #[serde(default)]
    pub food_description: Option<String>,
}

/// `POST /calculate-goals` body, also used by onboarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateGoalsRequest {
    pub age: u32,
    pub height: f64, // cm
    pub weight: f64, // kg
    pub goal: WeightGoal,
}

/// Typed view of a validated `analyze-food` result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FoodAnalysis {
    pub calories: f64,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Typed view of a validated `calculate-goals` result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionGoals {
    pub daily_calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}
