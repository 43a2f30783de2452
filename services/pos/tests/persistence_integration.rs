//! End-to-end tests against live Postgres and Redis
//!
//! These drive the full router with real pools: validation that must never
//! reach persistence, the login/me round trip, and photo file lifecycle
//! across rows sharing a content hash. The schema is created and truncated
//! per test, so they run serialized.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use serial_test::serial;
use tower::ServiceExt;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{init_pool, DatabaseConfig},
};
use pos::{
    jwt::{JwtConfig, JwtService},
    models::{NewCategory, NewProduct, NewUser},
    routes::create_router,
    storage::{PhotoStorage, StorageConfig},
    AppState,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS roles (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS user_roles (
        user_id BIGINT NOT NULL REFERENCES users(id),
        role_id BIGINT NOT NULL REFERENCES roles(id),
        PRIMARY KEY (user_id, role_id)
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        category_id BIGINT NOT NULL REFERENCES categories(id),
        name TEXT NOT NULL,
        photo TEXT,
        description TEXT,
        price NUMERIC NOT NULL,
        stock INT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
];

async fn test_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }
    sqlx::query("TRUNCATE users, roles, user_roles, categories, products RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await?;

    let redis_pool = RedisPool::new(&RedisConfig::from_env()?).await?;

    let jwt_service = JwtService::new(&JwtConfig {
        secret: "persistence-test-secret".to_string(),
        token_expiry: 3600,
    });

    let storage = PhotoStorage::new(&StorageConfig {
        root: std::env::temp_dir().join("pos_persistence_tests"),
        base_url: "http://localhost:3000/storage".to_string(),
    });

    Ok(AppState::new(pool, redis_pool, jwt_service, storage))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

async fn post_json(app: Router, uri: &str, token: Option<&str>, body: &str) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires running Postgres and Redis"]
#[serial]
async fn test_product_create_with_unknown_category_never_persists() -> TestResult {
    let state = test_state().await?;
    let app = create_router(state.clone());
    let token = state.jwt_service.generate_token(1)?;

    let response = post_json(
        app,
        "/v1/products",
        Some(&token),
        r#"{"category_id":999999,"name":"Widget","price":10,"stock":1}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["data"]["errors"]["category_id"].is_array());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&state.db_pool)
        .await?;
    assert_eq!(count, 0, "rejected payload must never reach persistence");

    Ok(())
}

#[tokio::test]
#[ignore = "requires running Postgres and Redis"]
#[serial]
async fn test_login_token_resolves_to_same_user_via_me() -> TestResult {
    let state = test_state().await?;
    let app = create_router(state.clone());

    let user = state
        .user_repository
        .create(&NewUser {
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await?;

    // Wrong password issues no token
    let denied = post_json(
        app.clone(),
        "/v1/login",
        None,
        r#"{"email":"admin@example.com","password":"wrong-password"}"#,
    )
    .await;
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app.clone(),
        "/v1/login",
        None,
        r#"{"email":"admin@example.com","password":"password123"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let me = app
        .oneshot(
            Request::builder()
                .uri("/v1/me")
                .header(header::AUTHORIZATION, bearer(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let body = body_json(me).await;
    assert_eq!(body["data"]["id"], user.id);
    assert_eq!(body["data"]["email"], "admin@example.com");

    Ok(())
}

#[tokio::test]
#[ignore = "requires running Postgres and Redis"]
#[serial]
async fn test_destroy_keeps_photo_shared_with_another_product() -> TestResult {
    let state = test_state().await?;
    let app = create_router(state.clone());
    let token = state.jwt_service.generate_token(1)?;

    let category = state
        .category_repository
        .create(&NewCategory {
            name: "Electronics".to_string(),
            description: None,
            is_active: true,
        })
        .await?;

    // Two products referencing one content-hashed file
    let filename = state.storage.store(b"same-bytes", "jpg").await?;
    let mut ids = Vec::new();
    for name in ["First", "Second"] {
        let product = state
            .product_repository
            .create(&NewProduct {
                category_id: category.id,
                name: name.to_string(),
                photo: Some(filename.clone()),
                description: None,
                price: "10".parse()?,
                stock: 1,
                is_active: true,
            })
            .await?;
        ids.push(product.id);
    }

    let path = std::env::temp_dir()
        .join("pos_persistence_tests")
        .join("products")
        .join(&filename);

    let delete = |id: i64| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/v1/products/{}", id))
            .header(header::AUTHORIZATION, bearer(&token))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete(ids[0])).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        path.exists(),
        "file still referenced by another product must survive"
    );

    let response = app.oneshot(delete(ids[1])).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!path.exists(), "last reference gone, file removed");

    Ok(())
}
