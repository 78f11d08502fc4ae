use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub company: String,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTestimonial {
    pub name: String,
    pub position: String,
    pub company: String,
    pub text: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateTestimonial {
    pub name: String,
    pub position: String,
    pub company: String,
    pub text: String,
    pub image_url: Option<String>,
}

impl Testimonial {
    /// Newest first; there is no manual ordering field for testimonials.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Testimonial>(
            "SELECT id, name, position, company, text, image_url, created_at
             FROM testimonials
             ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Testimonial>(
            "SELECT id, name, position, company, text, image_url, created_at
             FROM testimonials
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateTestimonial,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Testimonial>(
            "INSERT INTO testimonials (id, name, position, company, text, image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, name, position, company, text, image_url, created_at",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.position)
        .bind(&data.company)
        .bind(&data.text)
        .bind(&data.image_url)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateTestimonial,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Testimonial>(
            "UPDATE testimonials
             SET name = $2,
                 position = $3,
                 company = $4,
                 text = $5,
                 image_url = COALESCE($6, image_url)
             WHERE id = $1
             RETURNING id, name, position, company, text, image_url, created_at",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.position)
        .bind(&data.company)
        .bind(&data.text)
        .bind(&data.image_url)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
