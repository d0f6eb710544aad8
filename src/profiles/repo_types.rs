use sqlx::FromRow;
use time::PrimitiveDateTime;

use super::targets::Goal;
use crate::clock::parse_timestamp;

/// Row as stored in `profiles`.
#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub user_id: i64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub goal: Goal,
    pub target_calories: f64,
    pub target_protein_g: f64,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: i64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub goal: Goal,
    pub target_calories: f64,
    pub target_protein_g: f64,
    pub updated_at: PrimitiveDateTime,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = sqlx::Error;

    fn try_from(r: ProfileRow) -> Result<Self, Self::Error> {
        let updated_at = parse_timestamp(&r.updated_at).map_err(|e| sqlx::Error::ColumnDecode {
            index: "updated_at".into(),
            source: Box::new(e),
        })?;
        Ok(Self {
            user_id: r.user_id,
            weight_kg: r.weight_kg,
            height_cm: r.height_cm,
            goal: r.goal,
            target_calories: r.target_calories,
            target_protein_g: r.target_protein_g,
            updated_at,
        })
    }
}
