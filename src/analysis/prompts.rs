use super::dto::CalculateGoalsRequest;
use crate::llm::{ChatMessage, CompletionRequest};

const FOOD_SYSTEM: &str = "You are a nutrition expert. Analyze the food description and \
     return only a JSON object with calories and macronutrients.";

const GOALS_SYSTEM: &str = "You are a nutrition and fitness expert. Calculate appropriate \
     daily calorie and macronutrient goals based on user metrics.";

pub fn food_analysis(description: &str) -> CompletionRequest {
    let user = format!(
        "Estimate the nutrition of this meal: {description}\n\n\
         Respond with strictly one JSON object and nothing else, with these keys:\n\
         - \"calories\": total kcal as a number\n\
         - \"protein\": grams of protein as a number\n\
         - \"carbs\": grams of carbohydrates as a number\n\
         - \"fat\": grams of fat as a number\n\
         - \"emoji\": exactly one emoji that best represents the meal"
    );
    CompletionRequest {
        messages: vec![ChatMessage::system(FOOD_SYSTEM), ChatMessage::user(user)],
        json_object: true,
    }
}

pub fn goal_calculation(metrics: &CalculateGoalsRequest) -> CompletionRequest {
    let user = format!(
        "Calculate daily nutrition goals for someone with these metrics:\n\
         Age: {age} years\n\
         Height: {height} cm\n\
         Weight: {weight} kg\n\
         Goal: {goal} weight\n\n\
         Return a JSON object with:\n\
         - \"dailyCalories\": total daily calories\n\
         - \"protein\": daily protein in grams\n\
         - \"carbs\": daily carbs in grams\n\
         - \"fat\": daily fat in grams\n\n\
         Base the calculations on established nutrition principles and assume a moderate \
         activity level.",
        age = metrics.age,
        height = metrics.height,
        weight = metrics.weight,
        goal = metrics.goal.as_str(),
    );
    CompletionRequest {
        messages: vec![ChatMessage::system(GOALS_SYSTEM), ChatMessage::user(user)],
        json_object: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::repo_types::WeightGoal;

    #[test]
    fn food_prompt_embeds_description_and_asks_for_json() {
        let req = food_analysis("2 eggs and toast");
        assert!(req.json_object);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].role, "user");
        assert!(req.messages[1].content.contains("2 eggs and toast"));
        for key in ["\"calories\"", "\"protein\"", "\"carbs\"", "\"fat\"", "\"emoji\""] {
            assert!(req.messages[1].content.contains(key), "missing {key}");
        }
    }

    #[test]
    fn goal_prompt_carries_metrics() {
        let req = goal_calculation(&CalculateGoalsRequest {
            age: 34,
            height: 180.0,
            weight: 82.5,
            goal: WeightGoal::Lose,
        });
        let user = &req.messages[1].content;
        assert!(user.contains("Age: 34 years"));
        assert!(user.contains("Height: 180 cm"));
        assert!(user.contains("Weight: 82.5 kg"));
        assert!(user.contains("Goal: lose weight"));
        assert!(user.contains("moderate activity"));
    }
}
