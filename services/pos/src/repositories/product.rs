//! Product repository

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::{NewProduct, Product, ProductRecord, UpdateProduct};

const PRODUCT_COLUMNS: &str =
    "id, category_id, name, photo, description, price, stock, is_active, created_at, updated_at";

const RECORD_QUERY: &str = "SELECT p.id, p.category_id, p.name, p.photo, p.description, \
     p.price, p.stock, p.is_active, p.created_at, p.updated_at, \
     c.name AS category_name \
     FROM products p \
     JOIN categories c ON c.id = p.category_id";

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product
    pub async fn create(&self, new_product: &NewProduct) -> Result<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (category_id, name, photo, description, price, stock, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(new_product.category_id)
        .bind(&new_product.name)
        .bind(&new_product.photo)
        .bind(&new_product.description)
        .bind(new_product.price)
        .bind(new_product.stock)
        .bind(new_product.is_active)
        .fetch_one(&self.pool)
        .await?;

        info!("Created product {}", product.id);
        Ok(product)
    }

    /// List all products joined with their category names
    pub async fn find_all_records(&self) -> Result<Vec<ProductRecord>> {
        let records =
            sqlx::query_as::<_, ProductRecord>(&format!("{RECORD_QUERY} ORDER BY p.id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(records)
    }

    /// Find a product joined with its category name
    pub async fn find_record(&self, id: i64) -> Result<Option<ProductRecord>> {
        let record =
            sqlx::query_as::<_, ProductRecord>(&format!("{RECORD_QUERY} WHERE p.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record)
    }

    /// Find a product by ID (stored shape, no projections)
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a partial update. Returns `None` when the product doesn't
    /// exist.
    pub async fn update(&self, id: i64, changes: &UpdateProduct) -> Result<Option<Product>> {
        let Some(mut product) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        product.apply(changes);

        let updated = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products \
             SET category_id = $1, name = $2, photo = $3, description = $4, \
                 price = $5, stock = $6, is_active = $7, updated_at = NOW() \
             WHERE id = $8 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.photo)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        info!("Updated product {}", id);
        Ok(Some(updated))
    }

    /// Check whether any other product row references the same photo file.
    /// Content-hashed filenames mean identical uploads share one file.
    pub async fn photo_in_use(&self, filename: &str, exclude_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM products WHERE photo = $1 AND id <> $2)",
        )
        .bind(filename)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Delete a product. Returns false when no row matched.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("Deleted product {}", id);
        }
        Ok(result.rows_affected() > 0)
    }
}
