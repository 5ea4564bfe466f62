use serde::{Deserialize, Serialize};

use super::repo_types::{Profile, ProfileChanges, WeightGoal};
use crate::errors::ApiError;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub complete: bool,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let complete = profile.is_complete();
        Self { profile, complete }
    }
}

/// Settings form. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub age: Option<i32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub weight_goal: Option<WeightGoal>,
    pub daily_calories: Option<i32>,
    pub protein_goal: Option<i32>,
    pub carbs_goal: Option<i32>,
    pub fat_goal: Option<i32>,
}

fn positive_int(name: &str, v: Option<i32>) -> Result<Option<i32>, ApiError> {
    match v {
        Some(n) if n <= 0 => Err(ApiError::BadRequest(format!("{name} must be positive"))),
        other => Ok(other),
    }
}

fn positive_float(name: &str, v: Option<f64>) -> Result<Option<f64>, ApiError> {
    match v {
        Some(n) if !n.is_finite() || n <= 0.0 => {
            Err(ApiError::BadRequest(format!("{name} must be positive")))
        }
        other => Ok(other),
    }
}

impl UpdateProfileRequest {
    pub fn into_changes(self) -> Result<ProfileChanges, ApiError> {
        Ok(ProfileChanges {
            age: positive_int("age", self.age)?,
            height: positive_float("height", self.height)?,
            weight: positive_float("weight", self.weight)?,
            weight_goal: self.weight_goal,
            daily_calories: positive_int("daily_calories", self.daily_calories)?,
            protein_goal: positive_int("protein_goal", self.protein_goal)?,
            carbs_goal: positive_int("carbs_goal", self.carbs_goal)?,
            fat_goal: positive_int("fat_goal", self.fat_goal)?,
        })
    }
}
