use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct SoftwareLogo {
    pub id: Uuid,
    pub name: String,
    pub logo_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateSoftwareLogo {
    pub name: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateSoftwareLogo {
    pub name: String,
    pub logo_url: Option<String>,
}

impl SoftwareLogo {
    /// Oldest first, unlike client logos. Inherited from the source data and
    /// kept so the public strip renders in the same order.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SoftwareLogo>(
            "SELECT id, name, logo_url, created_at
             FROM software_logos
             ORDER BY created_at ASC, rowid ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SoftwareLogo>(
            "SELECT id, name, logo_url, created_at FROM software_logos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateSoftwareLogo,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SoftwareLogo>(
            "INSERT INTO software_logos (id, name, logo_url)
             VALUES ($1, $2, $3)
             RETURNING id, name, logo_url, created_at",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.logo_url)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateSoftwareLogo,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SoftwareLogo>(
            "UPDATE software_logos
             SET name = $2, logo_url = COALESCE($3, logo_url)
             WHERE id = $1
             RETURNING id, name, logo_url, created_at",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.logo_url)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM software_logos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
