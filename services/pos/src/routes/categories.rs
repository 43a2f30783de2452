//! Category CRUD endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    models::{Category, NewCategory, UpdateCategory},
    response::ApiResponse,
    validation::{self, ValidationErrors},
    AppState,
};

/// Request to create a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::models::loose_bool")]
    pub is_active: Option<bool>,
}

/// Request to update a category; absent fields are left untouched
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::loose_bool")]
    pub is_active: Option<bool>,
}

/// List all categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = state
        .category_repository
        .find_all()
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(ApiResponse::success(
        "Categories fetched successfully",
        categories,
    )))
}

/// Create a category
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let mut errors = ValidationErrors::new();
    let name = payload.name.unwrap_or_default();
    errors.check("name", validation::validate_name(&name));

    if errors.is_empty()
        && state
            .category_repository
            .name_exists(&name, None)
            .await
            .map_err(ApiError::internal)?
    {
        errors.add("name", "Name has already been taken");
    }
    errors.into_result()?;

    let new_category = NewCategory {
        name,
        description: payload.description,
        is_active: payload.is_active.unwrap_or(true),
    };

    let category = state
        .category_repository
        .create(&new_category)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create category: {}", e)))?;

    Ok(Json(ApiResponse::success(
        "Category created successfully",
        category,
    )))
}

/// Get a category by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let category = state
        .category_repository
        .find_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        "Category retrieved successfully",
        category,
    )))
}

/// Partially update a category
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let mut errors = ValidationErrors::new();
    if let Some(name) = &payload.name {
        errors.check("name", validation::validate_name(name));

        if errors.is_empty()
            && state
                .category_repository
                .name_exists(name, Some(id))
                .await
                .map_err(ApiError::internal)?
        {
            errors.add("name", "Name has already been taken");
        }
    }
    errors.into_result()?;

    let changes = UpdateCategory {
        name: payload.name,
        description: payload.description,
        is_active: payload.is_active,
    };

    let category = state
        .category_repository
        .update(id, &changes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to update category: {}", e)))?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        "Category updated successfully",
        category,
    )))
}

/// Delete a category. Deletion is restricted while products still
/// reference it.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    if state
        .category_repository
        .find_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .is_none()
    {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    let product_count = state
        .category_repository
        .product_count(id)
        .await
        .map_err(ApiError::internal)?;

    if product_count > 0 {
        let mut errors = ValidationErrors::new();
        errors.add(
            "category",
            format!(
                "Category is still referenced by {} product(s)",
                product_count
            ),
        );
        return Err(errors.into());
    }

    state
        .category_repository
        .delete(id)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to delete category: {}", e)))?;

    Ok(Json(ApiResponse::success_empty(
        "Category deleted successfully",
    )))
}
