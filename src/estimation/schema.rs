use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Traffic-light verdict on a meal relative to the user's goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum DietRating {
    Green,
    #[default]
    Yellow,
    Red,
}

impl DietRating {
    pub fn as_str(self) -> &'static str {
        match self {
            DietRating::Green => "GREEN",
            DietRating::Yellow => "YELLOW",
            DietRating::Red => "RED",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            DietRating::Green => "🟢",
            DietRating::Yellow => "🟡",
            DietRating::Red => "🔴",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl Macros {
    pub fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    fn is_valid(&self) -> bool {
        [self.calories, self.protein_g, self.carbs_g, self.fat_g]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub estimated_portion: String,
    #[serde(flatten)]
    pub macros: Macros,
}

/// Structured response of one inference call. Transient: only the
/// projection in [`crate::ledger::FoodLogEntry`] is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    #[serde(default)]
    pub items: Vec<FoodItem>,
    pub total: Macros,
    #[serde(default)]
    pub diet_rating: DietRating,
    #[serde(default)]
    pub advice: Vec<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

impl EstimationResult {
    /// Parses model output, rejecting anything that cannot be logged as-is.
    pub fn from_model_output(raw: &str) -> Result<Self, super::EstimationError> {
        let result: EstimationResult = serde_json::from_str(raw.trim())?;
        if !result.total.is_valid() || result.items.iter().any(|i| !i.macros.is_valid()) {
            return Err(super::EstimationError::Malformed(
                "macro values must be finite and non-negative".into(),
            ));
        }
        Ok(result)
    }
}

pub const SCHEMA_NAME: &str = "nutrition_estimate";

fn macros_properties() -> Value {
    json!({
        "calories": { "type": "number" },
        "protein_g": { "type": "number" },
        "carbs_g": { "type": "number" },
        "fat_g": { "type": "number" }
    })
}

/// JSON schema every inference call is constrained to. All fields are
/// required and no extra properties are allowed at any level.
pub fn response_schema() -> Value {
    let mut item_props = macros_properties();
    item_props["name"] = json!({ "type": "string" });
    item_props["estimated_portion"] = json!({ "type": "string" });

    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["items", "total", "diet_rating", "advice", "follow_up_questions"],
        "properties": {
            "items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["name", "estimated_portion", "calories", "protein_g", "carbs_g", "fat_g"],
                    "properties": item_props
                }
            },
            "total": {
                "type": "object",
                "additionalProperties": false,
                "required": ["calories", "protein_g", "carbs_g", "fat_g"],
                "properties": macros_properties()
            },
            "diet_rating": { "type": "string", "enum": ["GREEN", "YELLOW", "RED"] },
            "advice": { "type": "array", "items": { "type": "string" } },
            "follow_up_questions": { "type": "array", "items": { "type": "string" } }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::EstimationError;

    const SAMPLE: &str = r#"{
        "items": [
            {"name": "rice", "estimated_portion": "1 cup", "calories": 200, "protein_g": 4, "carbs_g": 45, "fat_g": 0.5},
            {"name": "chicken breast", "estimated_portion": "150 g", "calories": 300, "protein_g": 26, "carbs_g": 5, "fat_g": 19.5}
        ],
        "total": {"calories": 500, "protein_g": 30, "carbs_g": 50, "fat_g": 20},
        "diet_rating": "GREEN",
        "advice": ["add vegetables"],
        "follow_up_questions": []
    }"#;

    #[test]
    fn parses_full_model_output() {
        let r = EstimationResult::from_model_output(SAMPLE).unwrap();
        assert_eq!(r.items.len(), 2);
        assert_eq!(r.items[1].name, "chicken breast");
        assert_eq!(r.items[1].macros.protein_g, 26.0);
        assert_eq!(r.total, Macros::new(500.0, 30.0, 50.0, 20.0));
        assert_eq!(r.diet_rating, DietRating::Green);
        assert_eq!(r.advice, vec!["add vegetables".to_string()]);
    }

    #[test]
    fn missing_rating_defaults_to_yellow() {
        let raw = r#"{"items": [], "total": {"calories": 1, "protein_g": 0, "carbs_g": 0, "fat_g": 0}}"#;
        let r = EstimationResult::from_model_output(raw).unwrap();
        assert_eq!(r.diet_rating, DietRating::Yellow);
        assert!(r.advice.is_empty());
        assert!(r.follow_up_questions.is_empty());
    }

    #[test]
    fn missing_total_is_rejected() {
        let raw = r#"{"items": [], "diet_rating": "RED", "advice": [], "follow_up_questions": []}"#;
        assert!(matches!(
            EstimationResult::from_model_output(raw),
            Err(EstimationError::Parse(_))
        ));
    }

    #[test]
    fn null_total_field_is_rejected() {
        let raw = r#"{"items": [], "total": {"calories": null, "protein_g": 0, "carbs_g": 0, "fat_g": 0}}"#;
        assert!(EstimationResult::from_model_output(raw).is_err());
    }

    #[test]
    fn unknown_rating_is_rejected() {
        let raw = r#"{"items": [], "total": {"calories": 1, "protein_g": 0, "carbs_g": 0, "fat_g": 0}, "diet_rating": "BLUE"}"#;
        assert!(EstimationResult::from_model_output(raw).is_err());
    }

    #[test]
    fn negative_macros_are_rejected() {
        let raw = r#"{"items": [], "total": {"calories": -5, "protein_g": 0, "carbs_g": 0, "fat_g": 0}}"#;
        assert!(matches!(
            EstimationResult::from_model_output(raw),
            Err(EstimationError::Malformed(_))
        ));
    }

    #[test]
    fn schema_is_closed_and_fully_required() {
        let schema = response_schema();
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["required"].as_array().unwrap().len(), 5);

        let item = &schema["properties"]["items"]["items"];
        assert_eq!(item["additionalProperties"], json!(false));
        let required: Vec<&str> = item["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for key in item["properties"].as_object().unwrap().keys() {
            assert!(required.contains(&key.as_str()), "{key} not required");
        }

        let total = &schema["properties"]["total"];
        assert_eq!(total["additionalProperties"], json!(false));
        assert_eq!(total["required"].as_array().unwrap().len(), 4);
        assert_eq!(
            schema["properties"]["diet_rating"]["enum"],
            json!(["GREEN", "YELLOW", "RED"])
        );
    }
}
