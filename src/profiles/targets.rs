use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const KCAL_PER_KG: f64 = 30.0;
const CUT_DEFICIT_KCAL: f64 = 400.0;
const CUT_FLOOR_KCAL: f64 = 1200.0;
const BULK_SURPLUS_KCAL: f64 = 300.0;
const PROTEIN_G_PER_KG: f64 = 1.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Goal {
    Cut,
    Maintain,
    Bulk,
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Cut => "cut",
            Goal::Maintain => "maintain",
            Goal::Bulk => "bulk",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGoal(pub String);

impl fmt::Display for InvalidGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown goal {:?}, expected one of cut, maintain, bulk", self.0)
    }
}

impl std::error::Error for InvalidGoal {}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for Goal {
    type Err = InvalidGoal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cut" => Ok(Goal::Cut),
            "maintain" => Ok(Goal::Maintain),
            "bulk" => Ok(Goal::Bulk),
            _ => Err(InvalidGoal(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Targets {
    pub calories: f64,
    pub protein_g: f64,
}

/// Daily calorie and protein targets from body weight and goal.
///
/// A cut never drops below 1200 kcal regardless of body weight.
pub fn derive_targets(weight_kg: f64, goal: Goal) -> Targets {
    let baseline = weight_kg * KCAL_PER_KG;
    let calories = match goal {
        Goal::Cut => (baseline - CUT_DEFICIT_KCAL).max(CUT_FLOOR_KCAL),
        Goal::Bulk => baseline + BULK_SURPLUS_KCAL,
        Goal::Maintain => baseline,
    };
    Targets {
        calories,
        protein_g: weight_kg * PROTEIN_G_PER_KG,
    }
}
