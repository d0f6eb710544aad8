use serde::Serialize;

use super::repo_types::{FoodLogEntry, Source};
use crate::clock::format_timestamp;
use crate::estimation::{DietRating, Macros};

#[derive(Debug, Serialize)]
pub struct LogEntryView {
    pub id: i64,
    pub created_at: String,
    pub source: Source,
    pub raw_input: String,
    pub totals: Macros,
    pub diet_rating: DietRating,
    pub advice: Vec<String>,
}

impl From<FoodLogEntry> for LogEntryView {
    fn from(e: FoodLogEntry) -> Self {
        Self {
            id: e.id,
            created_at: format_timestamp(e.created_at),
            source: e.source,
            raw_input: e.raw_input,
            totals: e.totals,
            diet_rating: e.diet_rating,
            advice: e.advice,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: String,
    pub totals: Macros,
    pub target_calories: Option<f64>,
    pub target_protein_g: Option<f64>,
    pub entries: Vec<LogEntryView>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub deleted: u64,
}
