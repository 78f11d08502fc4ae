use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Generic key/value store for editable page copy, images and colors. `value`
/// is JSON text; the admin UI groups rows by `section`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct SiteSetting {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub section: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SiteSetting {
    pub fn value_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.value)
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SiteSetting>(
            "SELECT id, key, value, section, description, updated_at
             FROM site_settings
             ORDER BY section ASC, key ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_key(pool: &SqlitePool, key: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SiteSetting>(
            "SELECT id, key, value, section, description, updated_at
             FROM site_settings
             WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }

    /// Update an existing key. Unknown keys are an error (RowNotFound), so a
    /// typo in the admin UI cannot silently create a new setting.
    pub async fn update_value(
        pool: &SqlitePool,
        key: &str,
        value: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SiteSetting>(
            "UPDATE site_settings
             SET value = $2, updated_at = CURRENT_TIMESTAMP
             WHERE key = $1
             RETURNING id, key, value, section, description, updated_at",
        )
        .bind(key)
        .bind(value)
        .fetch_one(pool)
        .await
    }

    pub async fn upsert(
        pool: &SqlitePool,
        key: &str,
        value: &str,
        section: &str,
        description: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, SiteSetting>(
            "INSERT INTO site_settings (id, key, value, section, description)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 section = excluded.section,
                 description = excluded.description,
                 updated_at = CURRENT_TIMESTAMP
             RETURNING id, key, value, section, description, updated_at",
        )
        .bind(id)
        .bind(key)
        .bind(value)
        .bind(section)
        .bind(description)
        .fetch_one(pool)
        .await
    }
}
