use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One logged meal with the nutrition estimated when it was logged.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub meal_time: OffsetDateTime,
    pub calories: f64,
    pub protein: Option<f64>, // grams
    pub carbs: Option<f64>,   // grams
    pub fat: Option<f64>,     // grams
    pub emoji: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub food_description: String,
    pub meal_time: OffsetDateTime,
    pub calories: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub emoji: Option<String>,
}

#[cfg(test)]
impl FoodEntry {
    pub fn sample(meal_time: OffsetDateTime, calories: f64, protein: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            food_description: "sample".into(),
            meal_time,
            calories,
            protein,
            carbs: None,
            fat: None,
            emoji: None,
            created_at: meal_time,
        }
    }
}
