use serde::{Deserialize, Serialize};

use super::repo_types::UserProfile;
use super::targets::{Goal, Targets};
use crate::clock::format_timestamp;

#[derive(Debug, Deserialize)]
pub struct PutProfileRequest {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct TargetsResponse {
    pub target_calories: f64,
    pub target_protein_g: f64,
}

impl From<Targets> for TargetsResponse {
    fn from(t: Targets) -> Self {
        Self {
            target_calories: t.calories,
            target_protein_g: t.protein_g,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub goal: Goal,
    pub target_calories: f64,
    pub target_protein_g: f64,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            user_id: p.user_id,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            goal: p.goal,
            target_calories: p.target_calories,
            target_protein_g: p.target_protein_g,
            updated_at: format_timestamp(p.updated_at),
        }
    }
}
