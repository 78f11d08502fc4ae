use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A portfolio piece shown in the public projects grid. `display_order` is the
/// admin-controlled sort position; reordering rewrites it for every row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProject {
    pub title: String,
    pub category: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

/// `None` for a URL field means "keep whatever is stored", matching the admin
/// form behavior of omitting the field when no new file was chosen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateProject {
    pub title: String,
    pub category: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl Project {
    /// Canonical ordering: `display_order` ascending. rowid breaks ties so the
    /// order is total even before a reorder has assigned distinct values.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT id, title, category, image_url, video_url, display_order, created_at, updated_at
             FROM projects
             ORDER BY display_order ASC, rowid ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT id, title, category, image_url, video_url, display_order, created_at, updated_at
             FROM projects
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// New projects are appended after the current last position.
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateProject,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, title, category, image_url, video_url, display_order)
             VALUES ($1, $2, $3, $4, $5, (SELECT COALESCE(MAX(display_order), 0) + 1 FROM projects))
             RETURNING id, title, category, image_url, video_url, display_order, created_at, updated_at",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.category)
        .bind(&data.image_url)
        .bind(&data.video_url)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProject,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects
             SET title = $2,
                 category = $3,
                 image_url = COALESCE($4, image_url),
                 video_url = COALESCE($5, video_url),
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING id, title, category, image_url, video_url, display_order, created_at, updated_at",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.category)
        .bind(&data.image_url)
        .bind(&data.video_url)
        .fetch_one(pool)
        .await
    }

    pub async fn update_display_order(
        pool: &SqlitePool,
        id: Uuid,
        display_order: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET display_order = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(id)
        .bind(display_order)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
