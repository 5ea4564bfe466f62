use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{FoodEntry, NewFoodEntry};

const COLUMNS: &str =
    "id, user_id, food_description, meal_time, calories, protein, carbs, fat, emoji, created_at";

/// Entries with `from <= meal_time < to`, oldest first. `to = None` is open-ended.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    from: OffsetDateTime,
    to: Option<OffsetDateTime>,
) -> anyhow::Result<Vec<FoodEntry>> {
    let rows = sqlx::query_as::<_, FoodEntry>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM food_entries
        WHERE user_id = $1
          AND meal_time >= $2
          AND ($3::timestamptz IS NULL OR meal_time < $3)
        ORDER BY meal_time ASC, created_at ASC
        "#
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, user_id: Uuid, entry: &NewFoodEntry) -> anyhow::Result<FoodEntry> {
    let row = sqlx::query_as::<_, FoodEntry>(&format!(
        r#"
        INSERT INTO food_entries
            (id, user_id, food_description, meal_time, calories, protein, carbs, fat, emoji)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&entry.food_description)
    .bind(entry.meal_time)
    .bind(entry.calories)
    .bind(entry.protein)
    .bind(entry.carbs)
    .bind(entry.fat)
    .bind(&entry.emoji)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Returns false when no entry with that id belongs to the user.
pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM food_entries WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
