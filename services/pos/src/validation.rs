//! Input validation utilities
//!
//! Field validators return `Result<(), String>`; handlers collect messages
//! into a [`ValidationErrors`] map before touching the database. Uniqueness
//! and foreign-key checks live in the repositories since they need queries.

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Field-level validation messages, keyed by field name
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// Run a validator and record its message under `field` on failure
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Turn accumulated messages into an error, or `Ok` when clean
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed")
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a required display name (categories, products, users)
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 255 {
        return Err("Name must be at most 255 characters long".to_string());
    }

    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a product price
pub fn validate_price(price: Decimal) -> Result<(), String> {
    if price < Decimal::ZERO {
        return Err("Price must not be negative".to_string());
    }

    Ok(())
}

/// Validate a product stock count
pub fn validate_stock(stock: i32) -> Result<(), String> {
    if stock < 0 {
        return Err("Stock must not be negative".to_string());
    }

    Ok(())
}

/// Allowed photo extensions
const PHOTO_EXTENSIONS: &[&str] = &["jpeg", "png", "jpg", "gif", "svg"];

/// Maximum photo size in bytes (2 MiB)
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Validate an uploaded photo by extension and size
pub fn validate_photo(extension: &str, size: usize) -> Result<(), String> {
    let extension = extension.to_ascii_lowercase();
    if !PHOTO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "Photo must be one of: {}",
            PHOTO_EXTENSIONS.join(", ")
        ));
    }

    if size > MAX_PHOTO_BYTES {
        return Err("Photo must be at most 2048 kilobytes".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Electronics").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price("19.99".parse().unwrap()).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price("-0.01".parse().unwrap()).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(100).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_photo() {
        assert!(validate_photo("jpg", 1024).is_ok());
        assert!(validate_photo("PNG", 1024).is_ok());
        assert!(validate_photo("pdf", 1024).is_err());
        assert!(validate_photo("jpg", MAX_PHOTO_BYTES + 1).is_err());
    }

    #[test]
    fn test_validation_errors_collect_per_field() {
        let mut errors = ValidationErrors::new();
        errors.check("name", validate_name(""));
        errors.check("email", validate_email("bad"));
        errors.add("email", "Email has already been taken");

        assert!(!errors.is_empty());
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["name"][0], "Name is required");
        assert_eq!(value["email"][1], "Email has already been taken");
    }

    #[test]
    fn test_empty_errors_into_result_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
