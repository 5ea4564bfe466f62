use sqlx::PgPool;
use time::{OffsetDateTime, Time};
use tracing::info;
use uuid::Uuid;

use super::repo;
use super::repo_types::{FoodEntry, NewFoodEntry};
use crate::{
    analysis::{dto::FoodAnalysis, services as analysis},
    errors::ApiError,
    llm::CompletionClient,
};

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: OffsetDateTime) -> OffsetDateTime {
    now.to_offset(time::UtcOffset::UTC).replace_time(Time::MIDNIGHT)
}

pub fn new_entry(
    description: &str,
    meal_time: OffsetDateTime,
    analysis: FoodAnalysis,
) -> NewFoodEntry {
    NewFoodEntry {
        food_description: description.trim().to_string(),
        meal_time,
        calories: analysis.calories,
        protein: analysis.protein,
        carbs: analysis.carbs,
        fat: analysis.fat,
        emoji: analysis.emoji,
    }
}

/// Estimates nutrition for the description and stores the result.
pub async fn log_meal(
    db: &PgPool,
    llm: &dyn CompletionClient,
    user_id: Uuid,
    description: &str,
    meal_time: Option<OffsetDateTime>,
) -> Result<FoodEntry, ApiError> {
    let raw = analysis::analyze_food(llm, description).await?;
    let estimate = FoodAnalysis::from_validated(raw)?;
    let meal_time = meal_time.unwrap_or_else(OffsetDateTime::now_utc);

    let entry = repo::insert(db, user_id, &new_entry(description, meal_time, estimate)).await?;
    info!(%user_id, entry_id = %entry.id, calories = entry.calories, "meal logged");
    Ok(entry)
}
