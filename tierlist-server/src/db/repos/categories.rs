//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::DbError;

/// A category row.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a category by id.
    pub async fn get(&self, id: Uuid) -> Result<Category, DbError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "category",
            id: id.to_string(),
        })
    }

    /// All categories, alphabetical.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at FROM categories ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(categories)
    }

    /// Create a category. Duplicate names return the existing row.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<Category, DbError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, image_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, description, image_url, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(image_url)
        .fetch_one(self.pool)
        .await?;
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    // Integration tests - run with DATABASE_URL set

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_is_idempotent_by_name() {}
}
