use std::sync::Arc;

use students_api::{
    auth::JwtAuthService,
    config::Config,
    create_router,
    db::{self, PgDatabaseService},
    AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("students_api=debug,tower_http=debug")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Students API - Starting...");

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    });
    tracing::debug!("Loaded configuration: {:?}", config);

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let auth = JwtAuthService::from_config(&config.auth).expect("Invalid password hashing parameters");
    let state = AppState::new(Arc::new(PgDatabaseService::new(pool)), Arc::new(auth));
    let app = create_router(state);

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Students API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
