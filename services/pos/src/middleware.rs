//! Authentication middleware
//!
//! Validates the bearer token on protected routes and inserts a
//! request-scoped [`AuthContext`] into the request extensions, so handlers
//! receive the caller's identity explicitly instead of reading global state.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::{error::ApiError, AppState};

/// Identity of the authenticated caller for the current request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    /// Raw bearer token, needed by logout/refresh for blacklisting
    pub token: String,
}

/// Extract and validate the JWT from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    // Owned so the borrow of `req` ends before extensions_mut below
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let claims = state
        .jwt_service
        .validate_token(&token)
        .map_err(|_| ApiError::Unauthorized)?;

    let is_blacklisted = state
        .jwt_service
        .is_token_blacklisted(&state.redis_pool, &token)
        .await
        .map_err(|e| {
            error!("Failed to check token blacklist: {}", e);
            ApiError::Internal("Failed to check token blacklist".to_string())
        })?;

    if is_blacklisted {
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        token,
    });

    Ok(next.run(req).await)
}
