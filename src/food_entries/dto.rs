use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct CreateFoodEntryRequest {
    pub food_description: String,
    /// Defaults to the time of the request.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub meal_time: Option<OffsetDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub to: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_time_is_optional() {
        let req: CreateFoodEntryRequest =
            serde_json::from_str(r#"{"food_description": "toast"}"#).unwrap();
        assert_eq!(req.food_description, "toast");
        assert!(req.meal_time.is_none());

        let req: CreateFoodEntryRequest = serde_json::from_str(
            r#"{"food_description": "toast", "meal_time": "2026-03-01T08:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.meal_time.unwrap().hour(), 8);
    }

    #[test]
    fn bad_timestamps_are_rejected() {
        let res: Result<CreateFoodEntryRequest, _> =
            serde_json::from_str(r#"{"food_description": "toast", "meal_time": "yesterday"}"#);
        assert!(res.is_err());
    }
}
