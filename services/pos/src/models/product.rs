//! Product model and related payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Product entity as stored. `photo` is a bare filename inside the products
/// storage namespace; the public URL is derived at read time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub photo: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New product creation payload
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: i64,
    pub name: String,
    pub photo: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
}

/// Product partial-update payload. `None` leaves a field untouched; nullable
/// columns use a nested option so an explicit `null` clears them.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub photo: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

/// Product row joined with its category name
#[derive(Debug, Clone, FromRow)]
pub struct ProductRecord {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub photo: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: String,
}

/// Serialized product shape. `category_name` and `photo_url` are read-time
/// projections, never stored columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub photo: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: String,
    pub photo_url: Option<String>,
}

impl ProductRecord {
    /// Build the response shape, resolving the photo filename against the
    /// storage base URL
    pub fn into_response(self, photo_url: Option<String>) -> ProductResponse {
        ProductResponse {
            id: self.id,
            category_id: self.category_id,
            name: self.name,
            photo: self.photo,
            description: self.description,
            price: self.price,
            stock: self.stock,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            category_name: self.category_name,
            photo_url,
        }
    }
}

impl Product {
    /// Apply a partial update, leaving unsupplied fields unchanged
    pub fn apply(&mut self, changes: &UpdateProduct) {
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(photo) = &changes.photo {
            self.photo = photo.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock) = changes.stock {
            self.stock = stock;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn sample_product() -> Product {
        Product {
            id: 1,
            category_id: 1,
            name: "iPhone 15 Pro".to_string(),
            photo: Some("abc123.jpg".to_string()),
            description: None,
            price: dec("1999.99"),
            stock: 100,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_overwrites_exactly_the_supplied_fields() {
        let mut product = sample_product();
        product.apply(&UpdateProduct {
            price: Some(dec("1499.99")),
            stock: Some(50),
            ..Default::default()
        });

        assert_eq!(product.price, dec("1499.99"));
        assert_eq!(product.stock, 50);
        assert_eq!(product.name, "iPhone 15 Pro");
        assert_eq!(product.photo.as_deref(), Some("abc123.jpg"));
    }

    #[test]
    fn test_apply_explicit_false_is_not_dropped() {
        let mut product = sample_product();
        product.apply(&UpdateProduct {
            is_active: Some(false),
            ..Default::default()
        });

        assert!(!product.is_active);
    }

    #[test]
    fn test_into_response_carries_projections() {
        let record = ProductRecord {
            id: 1,
            category_id: 2,
            name: "iPhone 15 Pro".to_string(),
            photo: Some("abc123.jpg".to_string()),
            description: None,
            price: dec("1999.99"),
            stock: 100,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            category_name: "Electronics".to_string(),
        };

        let response =
            record.into_response(Some("http://localhost:3000/storage/products/abc123.jpg".into()));
        assert_eq!(response.category_name, "Electronics");
        assert_eq!(
            response.photo_url.as_deref(),
            Some("http://localhost:3000/storage/products/abc123.jpg")
        );
    }
}
