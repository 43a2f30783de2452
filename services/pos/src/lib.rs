//! Point-of-sale REST backend
//!
//! JSON API over Postgres with bearer token auth, Redis-backed token
//! revocation, and local photo storage for products.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod storage;
pub mod validation;

use sqlx::PgPool;

use common::cache::RedisPool;

use crate::{
    jwt::JwtService,
    repositories::{CategoryRepository, ProductRepository, RoleRepository, UserRepository},
    storage::PhotoStorage,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub redis_pool: RedisPool,
    pub jwt_service: JwtService,
    pub storage: PhotoStorage,
    pub user_repository: UserRepository,
    pub role_repository: RoleRepository,
    pub category_repository: CategoryRepository,
    pub product_repository: ProductRepository,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        redis_pool: RedisPool,
        jwt_service: JwtService,
        storage: PhotoStorage,
    ) -> Self {
        let user_repository = UserRepository::new(db_pool.clone());
        let role_repository = RoleRepository::new(db_pool.clone());
        let category_repository = CategoryRepository::new(db_pool.clone());
        let product_repository = ProductRepository::new(db_pool.clone());

        Self {
            db_pool,
            redis_pool,
            jwt_service,
            storage,
            user_repository,
            role_repository,
            category_repository,
            product_repository,
        }
    }
}
