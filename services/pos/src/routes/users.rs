//! User CRUD endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    models::{NewUser, UpdateUser, UserResponse, UserWithRoles},
    response::ApiResponse,
    validation::{self, ValidationErrors},
    AppState,
};

/// Request to create a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<i64>>,
}

/// Request to update a user; absent fields are left untouched. A supplied
/// `roles` array replaces the assignment set wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<i64>>,
}

/// List all users with their roles
pub async fn list(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state
        .user_repository
        .find_all_with_roles()
        .await
        .map_err(ApiError::internal)?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(
        "Users fetched successfully",
        users,
    )))
}

/// Create a user
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let mut errors = ValidationErrors::new();
    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    errors.check("name", validation::validate_name(&name));
    errors.check("email", validation::validate_email(&email));
    errors.check("password", validation::validate_password(&password));

    if !email.is_empty()
        && state
            .user_repository
            .email_exists(&email, None)
            .await
            .map_err(ApiError::internal)?
    {
        errors.add("email", "Email has already been taken");
    }

    if let Some(roles) = &payload.roles {
        if !state
            .role_repository
            .all_exist(roles)
            .await
            .map_err(ApiError::internal)?
        {
            errors.add("roles", "One or more selected roles do not exist");
        }
    }
    errors.into_result()?;

    let new_user = NewUser {
        name,
        email,
        password,
    };

    let user = state
        .user_repository
        .create(&new_user)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create user: {}", e)))?;

    if let Some(roles) = &payload.roles {
        state
            .user_repository
            .sync_roles(user.id, roles)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to assign roles: {}", e)))?;
    }

    let roles = state
        .role_repository
        .names_for_user(user.id)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(ApiResponse::success(
        "User created successfully",
        UserResponse::from(UserWithRoles { user, roles }),
    )))
}

/// Get a user by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let roles = state
        .role_repository
        .names_for_user(user.id)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        UserResponse::from(UserWithRoles { user, roles }),
    )))
}

/// Partially update a user
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let mut errors = ValidationErrors::new();

    if let Some(name) = &payload.name {
        errors.check("name", validation::validate_name(name));
    }
    if let Some(email) = &payload.email {
        errors.check("email", validation::validate_email(email));

        if errors.is_empty()
            && state
                .user_repository
                .email_exists(email, Some(id))
                .await
                .map_err(ApiError::internal)?
        {
            errors.add("email", "Email has already been taken");
        }
    }
    if let Some(password) = &payload.password {
        errors.check("password", validation::validate_password(password));
    }
    if let Some(roles) = &payload.roles {
        if !state
            .role_repository
            .all_exist(roles)
            .await
            .map_err(ApiError::internal)?
        {
            errors.add("roles", "One or more selected roles do not exist");
        }
    }
    errors.into_result()?;

    let changes = UpdateUser {
        name: payload.name,
        email: payload.email,
        password: payload.password,
    };

    let user = state
        .user_repository
        .update(id, &changes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to update user: {}", e)))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(roles) = &payload.roles {
        state
            .user_repository
            .sync_roles(user.id, roles)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to assign roles: {}", e)))?;
    }

    let roles = state
        .role_repository
        .names_for_user(user.id)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(ApiResponse::success(
        "User updated successfully",
        UserResponse::from(UserWithRoles { user, roles }),
    )))
}

/// Delete a user
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let deleted = state
        .user_repository
        .delete(id)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to delete user: {}", e)))?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(ApiResponse::success_empty("User deleted successfully")))
}
