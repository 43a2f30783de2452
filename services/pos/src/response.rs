//! Uniform response envelope
//!
//! Every response, success or business failure, is serialized as
//! `{success, message, data}`. `data` is always present and is `null` when
//! there is nothing to return.

use serde::Serialize;

/// API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Successful response with no payload (`data: null`)
    pub fn success_empty(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::success("Category created successfully", json!({"id": 1}));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "Category created successfully",
                "data": {"id": 1}
            })
        );
    }

    #[test]
    fn test_empty_data_serializes_as_null() {
        let response = ApiResponse::success_empty("Product deleted successfully");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["data"], serde_json::Value::Null);
        assert_eq!(value["success"], true);
    }
}
