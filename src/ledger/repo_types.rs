use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::PrimitiveDateTime;

use crate::clock::{format_timestamp, parse_timestamp};
use crate::estimation::{DietRating, EstimationResult, Macros};

/// Where an entry's estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Source {
    Text,
    Photo,
}

/// A row about to be inserted into `food_log`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub user_id: i64,
    pub created_at: String,
    pub source: Source,
    pub raw_input: String,
    pub totals: Macros,
    pub diet_rating: DietRating,
    pub advice: Vec<String>,
}

impl NewLogEntry {
    /// Lossy projection of an estimation: keeps the total block, the rating
    /// and every advice line. Per-item detail and follow-up questions are dropped.
    pub fn project(
        user_id: i64,
        source: Source,
        raw_input: &str,
        result: &EstimationResult,
        at: PrimitiveDateTime,
    ) -> Self {
        Self {
            user_id,
            created_at: format_timestamp(at),
            source,
            raw_input: raw_input.to_string(),
            totals: result.total,
            diet_rating: result.diet_rating,
            advice: result.advice.clone(),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct FoodLogRow {
    pub id: i64,
    pub user_id: i64,
    pub created_at: String,
    pub source: Source,
    pub raw_input: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub diet_rating: DietRating,
    pub advice: Json<Vec<String>>,
}

/// One persisted estimation event. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodLogEntry {
    pub id: i64,
    pub user_id: i64,
    pub created_at: PrimitiveDateTime,
    pub source: Source,
    pub raw_input: String,
    pub totals: Macros,
    pub diet_rating: DietRating,
    pub advice: Vec<String>,
}

impl TryFrom<FoodLogRow> for FoodLogEntry {
    type Error = sqlx::Error;

    fn try_from(r: FoodLogRow) -> Result<Self, Self::Error> {
        let created_at = parse_timestamp(&r.created_at).map_err(|e| sqlx::Error::ColumnDecode {
            index: "created_at".into(),
            source: Box::new(e),
        })?;
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            created_at,
            source: r.source,
            raw_input: r.raw_input,
            totals: Macros::new(r.calories, r.protein_g, r.carbs_g, r.fat_g),
            diet_rating: r.diet_rating,
            advice: r.advice.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::FoodItem;
    use time::macros::datetime;

    #[test]
    fn projection_keeps_total_and_drops_items() {
        let result = EstimationResult {
            items: vec![FoodItem {
                name: "toast".into(),
                estimated_portion: "2 slices".into(),
                macros: Macros::new(999.0, 99.0, 99.0, 99.0),
            }],
            total: Macros::new(500.0, 30.0, 50.0, 20.0),
            diet_rating: DietRating::Red,
            advice: (1..=5).map(|i| format!("tip {i}")).collect(),
            follow_up_questions: vec!["butter?".into()],
        };
        let entry = NewLogEntry::project(9, Source::Text, "toast", &result, datetime!(2024-05-01 12:30:00));
        assert_eq!(entry.totals, Macros::new(500.0, 30.0, 50.0, 20.0));
        assert_eq!(entry.diet_rating, DietRating::Red);
        assert_eq!(entry.advice.len(), 5);
        assert_eq!(entry.created_at, "2024-05-01 12:30:00");
        assert_eq!(entry.raw_input, "toast");
    }
}
