//! Category repository

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::{Category, NewCategory, UpdateCategory};

const CATEGORY_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Category repository
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category
    pub async fn create(&self, new_category: &NewCategory) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, description, is_active) \
             VALUES ($1, $2, $3) \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&new_category.name)
        .bind(&new_category.description)
        .bind(new_category.is_active)
        .fetch_one(&self.pool)
        .await?;

        info!("Created category {}", category.id);
        Ok(category)
    }

    /// List all categories
    pub async fn find_all(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Find a category by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Check whether a category id exists
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Check whether a category name is already taken, optionally excluding
    /// one category (for updates)
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Apply a partial update. Returns `None` when the category doesn't
    /// exist.
    pub async fn update(&self, id: i64, changes: &UpdateCategory) -> Result<Option<Category>> {
        let Some(mut category) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        category.apply(changes);

        let updated = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories \
             SET name = $1, description = $2, is_active = $3, updated_at = NOW() \
             WHERE id = $4 \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.is_active)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        info!("Updated category {}", id);
        Ok(Some(updated))
    }

    /// Delete a category. Returns false when no row matched.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("Deleted category {}", id);
        }
        Ok(result.rows_affected() > 0)
    }

    /// Number of products still referencing this category
    pub async fn product_count(&self, id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
