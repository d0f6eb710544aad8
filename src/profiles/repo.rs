use sqlx::SqlitePool;

use super::repo_types::{ProfileRow, UserProfile};

/// Insert or wholesale-replace the profile of `p.user_id` in a single statement.
pub async fn upsert(db: &SqlitePool, p: &ProfileRow) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, weight_kg, height_cm, goal, target_calories, target_protein_g, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT (user_id) DO UPDATE SET
            weight_kg        = excluded.weight_kg,
            height_cm        = excluded.height_cm,
            goal             = excluded.goal,
            target_calories  = excluded.target_calories,
            target_protein_g = excluded.target_protein_g,
            updated_at       = excluded.updated_at
        "#,
    )
    .bind(p.user_id)
    .bind(p.weight_kg)
    .bind(p.height_cm)
    .bind(p.goal)
    .bind(p.target_calories)
    .bind(p.target_protein_g)
    .bind(&p.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find(db: &SqlitePool, user_id: i64) -> sqlx::Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT user_id, weight_kg, height_cm, goal, target_calories, target_protein_g, updated_at
          FROM profiles
         WHERE user_id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    row.map(UserProfile::try_from).transpose()
}
