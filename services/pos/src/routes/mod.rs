//! POS service routes

pub mod auth;
pub mod categories;
pub mod products;
pub mod users;

use axum::{
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::{middleware::auth_middleware, AppState};

/// Create the router for the POS service. Everything except /health and
/// login sits behind the bearer token middleware.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/logout", post(auth::logout))
        .route("/v1/me", get(auth::me))
        .route("/v1/refresh", post(auth::refresh))
        .route("/v1/categories", get(categories::list).post(categories::create))
        .route(
            "/v1/categories/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::destroy),
        )
        .route("/v1/products", get(products::list).post(products::create))
        .route(
            "/v1/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/v1/users", get(users::list).post(users::create))
        .route(
            "/v1/users/:id",
            get(users::get).put(users::update).delete(users::destroy),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/v1/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pos-api"
    }))
}
