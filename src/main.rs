//! Circulation Server - loan workflow for a multi-service library system

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use circulation_server::{
    api,
    clients::{HttpBookClient, HttpUserClient},
    config::AppConfig,
    repository::PgLoanStore,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "circulation_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Circulation Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Shared HTTP client for the collaborator services; every call carries
    // the configured timeout
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.collaborators.request_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");

    let user_client = Arc::new(HttpUserClient::new(
        http.clone(),
        config.collaborators.user_service_url.clone(),
    ));
    let book_client = Arc::new(HttpBookClient::new(
        http,
        config.collaborators.book_service_url.clone(),
    ));

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Wire the store and services
    let store = Arc::new(PgLoanStore::new(pool));
    let services = Services::new(store, user_client, book_client.clone(), book_client);

    // Background overdue sweep
    if config.sweeper.enabled {
        let sweeper = services.sweeper.clone();
        let period = Duration::from_secs(config.sweeper.interval_secs);
        tokio::spawn(sweeper.run_periodic(period));
        tracing::info!(
            interval_secs = config.sweeper.interval_secs,
            "Overdue sweeper scheduled"
        );
    }

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse().expect("Invalid host address"), server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Loans
        .route("/loans", post(api::loans::create_loan))
        .route("/loans/overdue", get(api::loans::get_overdue_loans))
        .route("/loans/user/:user_id", get(api::loans::get_user_loans))
        .route("/loans/:id", get(api::loans::get_loan))
        .route("/loans/:id/return", post(api::loans::return_loan))
        .route("/loans/:id/extend", post(api::loans::extend_loan))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
