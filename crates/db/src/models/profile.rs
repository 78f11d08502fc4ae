use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// One row per authenticated user, keyed by the user id. Created lazily on
/// first sign-in. `is_admin` is the single source of truth for authorization;
/// the configured admin email only seeds it.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateProfile {
    pub full_name: String,
    pub avatar_url: Option<String>,
}

impl Profile {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, full_name, avatar_url, is_admin, created_at, updated_at
             FROM profiles
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        full_name: &str,
        is_admin: bool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, full_name, is_admin)
             VALUES ($1, $2, $3)
             RETURNING id, full_name, avatar_url, is_admin, created_at, updated_at",
        )
        .bind(id)
        .bind(full_name)
        .bind(is_admin)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProfile,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            "UPDATE profiles
             SET full_name = $2,
                 avatar_url = COALESCE($3, avatar_url),
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING id, full_name, avatar_url, is_admin, created_at, updated_at",
        )
        .bind(id)
        .bind(&data.full_name)
        .bind(&data.avatar_url)
        .fetch_one(pool)
        .await
    }

    pub async fn set_admin(pool: &SqlitePool, id: Uuid, is_admin: bool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE profiles SET is_admin = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(id)
        .bind(is_admin)
        .execute(pool)
        .await?;
        Ok(())
    }
}
