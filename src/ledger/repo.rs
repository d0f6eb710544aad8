use sqlx::{types::Json, SqlitePool};

use super::repo_types::{FoodLogEntry, FoodLogRow, NewLogEntry};
use crate::estimation::Macros;

/// Single-statement insert, so a failed write leaves nothing behind.
pub async fn insert(db: &SqlitePool, e: &NewLogEntry) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO food_log (user_id, created_at, source, raw_input,
                              calories, protein_g, carbs_g, fat_g, diet_rating, advice)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(e.user_id)
    .bind(&e.created_at)
    .bind(e.source)
    .bind(&e.raw_input)
    .bind(e.totals.calories)
    .bind(e.totals.protein_g)
    .bind(e.totals.carbs_g)
    .bind(e.totals.fat_g)
    .bind(e.diet_rating)
    .bind(Json(&e.advice))
    .execute(db)
    .await?
    .last_insert_rowid();
    Ok(id)
}

/// `day` is a `YYYY-MM-DD` string matched against the date prefix of `created_at`.
pub async fn sum_for_day(db: &SqlitePool, user_id: i64, day: &str) -> sqlx::Result<Macros> {
    let (calories, protein_g, carbs_g, fat_g) = sqlx::query_as::<_, (f64, f64, f64, f64)>(
        r#"
        SELECT COALESCE(SUM(calories), 0.0),
               COALESCE(SUM(protein_g), 0.0),
               COALESCE(SUM(carbs_g), 0.0),
               COALESCE(SUM(fat_g), 0.0)
          FROM food_log
         WHERE user_id = ?1 AND substr(created_at, 1, 10) = ?2
        "#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_one(db)
    .await?;
    Ok(Macros::new(calories, protein_g, carbs_g, fat_g))
}

pub async fn list_for_day(db: &SqlitePool, user_id: i64, day: &str) -> sqlx::Result<Vec<FoodLogEntry>> {
    let rows = sqlx::query_as::<_, FoodLogRow>(
        r#"
        SELECT id, user_id, created_at, source, raw_input,
               calories, protein_g, carbs_g, fat_g, diet_rating, advice
          FROM food_log
         WHERE user_id = ?1 AND substr(created_at, 1, 10) = ?2
         ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(FoodLogEntry::try_from).collect()
}

pub async fn delete_for_day(db: &SqlitePool, user_id: i64, day: &str) -> sqlx::Result<u64> {
    let done = sqlx::query(
        r#"
        DELETE FROM food_log
         WHERE user_id = ?1 AND substr(created_at, 1, 10) = ?2
        "#,
    )
    .bind(user_id)
    .bind(day)
    .execute(db)
    .await?;
    Ok(done.rows_affected())
}
