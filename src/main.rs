//! Matchmaker Backend
//!
//! A small matchmaking REST backend persisted to a single JSON file.

mod api;
mod auth;
mod config;
mod errors;
mod matcher;
mod models;
mod registration;
mod safety;
mod sanitize;
mod store;
mod uploads;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{AdminAuthorizer, SharedSecret};
use config::{Config, LogFormat};
use safety::{ImageSafetyChecker, PermissiveChecker};
use store::{JsonFileStore, Repository};
use uploads::{UploadStore, PUBLIC_PREFIX};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub uploads: Arc<UploadStore>,
    pub safety: Arc<dyn ImageSafetyChecker>,
    pub admin: Arc<dyn AdminAuthorizer>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Matchmaker Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Upload directory: {:?}", config.upload_dir);
    tracing::info!("Persistence policy: {}", config.persistence.as_str());
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_secret.is_none() {
        tracing::warn!("No admin secret configured (MATCH_ADMIN_SECRET). Admin endpoints are disabled!");
    }

    let store = Arc::new(JsonFileStore::new(&config.db_path));
    let repo = Arc::new(Repository::new(store, config.persistence));

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let uploads = Arc::new(UploadStore::new(&config.upload_dir));

    let state = AppState {
        repo,
        uploads,
        safety: Arc::new(PermissiveChecker),
        admin: Arc::new(SharedSecret::new(config.admin_secret.clone())),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Two images plus the text fields of the form.
    let register_limit = DefaultBodyLimit::max(2 * state.uploads.max_bytes() + 64 * 1024);

    let api_routes = Router::new()
        // Accounts
        .route("/login", post(api::login))
        .route("/register", post(api::register).layer(register_limit))
        // Matching
        .route("/matches", get(api::get_matches))
        // Chat
        .route("/messages", get(api::get_thread).post(api::post_message))
        // Admin
        .route("/admin/users", get(api::admin_list_users))
        .route("/admin/delete", delete(api::admin_delete_user))
        .route("/admin/stats", get(api::admin_stats));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    let uploads_dir = ServeDir::new(state.uploads.dir());

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .nest_service(PUBLIC_PREFIX, uploads_dir)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
