use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// What the user wants their weight to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "weight_goal", rename_all = "lowercase")]
pub enum WeightGoal {
    Lose,
    Maintain,
    Gain,
}

impl WeightGoal {
    pub fn as_str(self) -> &'static str {
        match self {
            WeightGoal::Lose => "lose",
            WeightGoal::Maintain => "maintain",
            WeightGoal::Gain => "gain",
        }
    }
}

/// Body metrics and nutrition targets, one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub age: Option<i32>,
    pub height: Option<f64>, // cm
    pub weight: Option<f64>, // kg
    pub weight_goal: Option<WeightGoal>,
    pub daily_calories: Option<i32>,
    pub protein_goal: Option<i32>, // grams
    pub carbs_goal: Option<i32>,   // grams
    pub fat_goal: Option<i32>,     // grams
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Profile {
    /// A profile without a calorie target still needs onboarding.
    pub fn is_complete(&self) -> bool {
        matches!(self.daily_calories, Some(c) if c > 0)
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub age: Option<i32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub weight_goal: Option<WeightGoal>,
    pub daily_calories: Option<i32>,
    pub protein_goal: Option<i32>,
    pub carbs_goal: Option<i32>,
    pub fat_goal: Option<i32>,
}

#[cfg(test)]
impl Profile {
    pub fn empty(id: Uuid) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id,
            age: None,
            height: None,
            weight: None,
            weight_goal: None,
            daily_calories: None,
            protein_goal: None,
            carbs_goal: None,
            fat_goal: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_follows_calorie_target() {
        let mut p = Profile::empty(Uuid::new_v4());
        assert!(!p.is_complete());
        p.daily_calories = Some(0);
        assert!(!p.is_complete());
        p.daily_calories = Some(2100);
        assert!(p.is_complete());
    }

    #[test]
    fn weight_goal_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&WeightGoal::Gain).unwrap(), "\"gain\"");
        let g: WeightGoal = serde_json::from_str("\"lose\"").unwrap();
        assert_eq!(g, WeightGoal::Lose);
        assert!(serde_json::from_str::<WeightGoal>("\"bulk\"").is_err());
    }
}
