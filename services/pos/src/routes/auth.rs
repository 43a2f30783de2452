//! Authentication endpoints

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthContext,
    models::{UserResponse, UserWithRoles},
    response::ApiResponse,
    validation::{self, ValidationErrors},
    AppState,
};

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let mut errors = ValidationErrors::new();
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    errors.check("email", validation::validate_email(&email));
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()?;

    let user = state
        .user_repository
        .find_by_email(&email)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::Unauthorized)?;

    if !state
        .user_repository
        .verify_password(&user, &password)
        .map_err(ApiError::internal)?
    {
        return Err(ApiError::Unauthorized);
    }

    let token = state
        .jwt_service
        .generate_token(user.id)
        .map_err(|e| {
            error!("Failed to generate token: {}", e);
            ApiError::Internal("Failed to generate token".to_string())
        })?;

    info!("User {} logged in", user.id);
    Ok(Json(ApiResponse::success(
        "Login successful",
        json!({"token": token}),
    )))
}

/// Logout endpoint: blacklist the presented token for its remaining lifetime
pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    state
        .jwt_service
        .blacklist_token(&state.redis_pool, &ctx.token)
        .await
        .map_err(|e| {
            error!("Failed to blacklist token: {}", e);
            ApiError::Internal("Failed to invalidate token".to_string())
        })?;

    info!("User {} logged out", ctx.user_id);
    Ok(Json(ApiResponse::success_empty("Logout successful")))
}

/// Current user endpoint: resolve the token to a user and its roles
pub async fn me(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_repository
        .find_by_id(ctx.user_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::Internal("User for this token no longer exists".to_string()))?;

    let roles = state
        .role_repository
        .names_for_user(user.id)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(ApiResponse::success(
        "Profile fetched successfully",
        UserResponse::from(UserWithRoles { user, roles }),
    )))
}

/// Refresh endpoint: rotate the presented token
pub async fn refresh(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let token = state
        .jwt_service
        .rotate_token(&state.redis_pool, &ctx.token)
        .await
        .map_err(|e| {
            error!("Failed to rotate token: {}", e);
            ApiError::Internal("Failed to refresh token".to_string())
        })?;

    info!("Rotated token for user {}", ctx.user_id);
    Ok(Json(ApiResponse::success(
        "Token refreshed successfully",
        json!({"token": token}),
    )))
}
