use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::repo_types::{Profile, ProfileChanges};

const PROFILE_COLUMNS: &str = "id, age, height, weight, weight_goal, daily_calories, \
     protein_goal, carbs_goal, fat_goal, created_at, updated_at";

pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(profile)
}

/// Inserts an empty profile unless one exists.
pub async fn create_empty(conn: &mut PgConnection, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Returns the user's profile, inserting an empty one on first access.
pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<Profile> {
    sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
        .bind(user_id)
        .execute(db)
        .await?;

    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .fetch_one(db)
        .await?;
    Ok(profile)
}

/// Applies the non-empty fields of `changes`, creating the row if needed.
pub async fn upsert(db: &PgPool, user_id: Uuid, changes: &ProfileChanges) -> anyhow::Result<Profile> {
    let sql = format!(
        r#"
        INSERT INTO profiles (id, age, height, weight, weight_goal, daily_calories,
                              protein_goal, carbs_goal, fat_goal)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            age            = COALESCE(EXCLUDED.age, profiles.age),
            height         = COALESCE(EXCLUDED.height, profiles.height),
            weight         = COALESCE(EXCLUDED.weight, profiles.weight),
            weight_goal    = COALESCE(EXCLUDED.weight_goal, profiles.weight_goal),
            daily_calories = COALESCE(EXCLUDED.daily_calories, profiles.daily_calories),
            protein_goal   = COALESCE(EXCLUDED.protein_goal, profiles.protein_goal),
            carbs_goal     = COALESCE(EXCLUDED.carbs_goal, profiles.carbs_goal),
            fat_goal       = COALESCE(EXCLUDED.fat_goal, profiles.fat_goal),
            updated_at     = now()
        RETURNING {PROFILE_COLUMNS}
        "#
    );
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .bind(changes.age)
        .bind(changes.height)
        .bind(changes.weight)
        .bind(changes.weight_goal)
        .bind(changes.daily_calories)
        .bind(changes.protein_goal)
        .bind(changes.carbs_goal)
        .bind(changes.fat_goal)
        .fetch_one(db)
        .await?;
    Ok(profile)
}
