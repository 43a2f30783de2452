//! POS service models

pub mod category;
pub mod product;
pub mod user;

// Re-export for convenience
pub use category::{Category, NewCategory, UpdateCategory};
pub use product::{NewProduct, Product, ProductRecord, ProductResponse, UpdateProduct};
pub use user::{NewUser, UpdateUser, User, UserResponse, UserWithRoles};

use serde::{Deserialize, Deserializer};

/// Deserialize a field where absent, null, and a value must stay
/// distinguishable. Absent gives `None`, `null` gives `Some(None)`,
/// a value gives `Some(Some(v))`. Use with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize a boolean flag that clients may send as a real boolean, a
/// number, or a truthy string ("true"/"1"/"on"/"yes"). Use with
/// `#[serde(default)]` so an absent field stays `None`.
pub fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b)),
        Some(serde_json::Value::String(s)) => Ok(Some(parse_loose_bool(&s))),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.as_i64().unwrap_or(0) != 0)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a boolean, got {}",
            other
        ))),
    }
}

/// Coerce a loosely-typed truthy string into a bool
pub fn parse_loose_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "double_option")]
        description: Option<Option<String>>,
        #[serde(default, deserialize_with = "loose_bool")]
        is_active: Option<bool>,
    }

    #[test]
    fn test_double_option_distinguishes_absent_null_value() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.description, None);

        let null: Probe = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let value: Probe = serde_json::from_str(r#"{"description":"text"}"#).unwrap();
        assert_eq!(value.description, Some(Some("text".to_string())));
    }

    #[test]
    fn test_loose_bool_accepts_bools_strings_and_numbers() {
        let b: Probe = serde_json::from_str(r#"{"is_active":false}"#).unwrap();
        assert_eq!(b.is_active, Some(false));

        let s: Probe = serde_json::from_str(r#"{"is_active":"true"}"#).unwrap();
        assert_eq!(s.is_active, Some(true));

        let n: Probe = serde_json::from_str(r#"{"is_active":1}"#).unwrap();
        assert_eq!(n.is_active, Some(true));

        let off: Probe = serde_json::from_str(r#"{"is_active":"nope"}"#).unwrap();
        assert_eq!(off.is_active, Some(false));

        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.is_active, None);
    }

    #[test]
    fn test_parse_loose_bool() {
        assert!(parse_loose_bool("true"));
        assert!(parse_loose_bool("1"));
        assert!(parse_loose_bool(" Yes "));
        assert!(!parse_loose_bool("false"));
        assert!(!parse_loose_bool("0"));
        assert!(!parse_loose_bool(""));
    }
}
