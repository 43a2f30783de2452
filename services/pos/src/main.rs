use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use common::{cache, database};
use pos::{jwt, routes, storage, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting POS service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize Redis connection pool
    let redis_config = cache::RedisConfig::from_env()?;
    let redis_pool = cache::RedisPool::new(&redis_config).await?;

    // Initialize JWT service
    let jwt_config = jwt::JwtConfig::from_env()?;
    let jwt_service = jwt::JwtService::new(&jwt_config);

    // Initialize photo storage
    let storage_config = storage::StorageConfig::from_env()?;
    let photo_storage = storage::PhotoStorage::new(&storage_config);

    let app_state = AppState::new(pool, redis_pool, jwt_service, photo_storage);

    info!("POS service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("POS service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
