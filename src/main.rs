//! NESPAK Admin Backend
//!
//! Serves the association website's records (events, news, resources and the site
//! configuration) and the admin dashboard's cached reads and notifying mutations.

mod admin_data;
mod api;
mod auth;
mod cache;
mod config;
mod errors;
mod models;
mod notify;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use admin_data::AdminData;
use auth::TokenIssuer;
use config::{Config, LogFormat, StoreBackend};
use errors::AppError;
use notify::NotificationCenter;
use store::{AdminCredential, RecordStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub data: AdminData,
    pub store: RecordStore,
    pub notifications: Arc<NotificationCenter>,
}

impl AppState {
    /// Wire the data layer, notifications and token issuer over a store backend.
    pub fn new(backend: Arc<dyn store::RecordBackend>, config: &Config) -> Self {
        let tokens = Arc::new(TokenIssuer::new(&config.token_secret, config.token_ttl));
        let store = RecordStore::new(backend, tokens);
        let notifications = Arc::new(NotificationCenter::new());
        let data = AdminData::new(store.clone(), notifications.clone());

        Self {
            data,
            store,
            notifications,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!("Starting NESPAK Admin Backend");
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize the record store
    let backend = store::open_backend(&config).await?;
    let state = AppState::new(backend, &config);
    tracing::info!("Store backend: {}", state.store.backend_name());
    if config.store_backend == StoreBackend::Sqlite {
        tracing::info!("Database path: {:?}", config.db_path);
    }

    tracing::info!(
        "Store holds {} events, {} news items, {} resources",
        state.store.fetch_events().await.len(),
        state.store.fetch_news().await.len(),
        state.store.fetch_resources().await.len()
    );
    if state.store.fetch_site_config().await.banner_text.is_some() {
        tracing::info!("Site banner is active");
    }

    bootstrap_admin(&state.store, &config).await?;

    // Build router
    let store = state.store.clone();
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Store closed, shutting down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Register the configured admin credential, hashing a plain password if that is all we have.
async fn bootstrap_admin(store: &RecordStore, config: &Config) -> Result<(), AppError> {
    if !config.has_admin_credential() {
        tracing::warn!(
            "No admin credential configured (NESPAK_ADMIN_PASSWORD_HASH). Admin login is disabled!"
        );
        return Ok(());
    }

    let password_hash = match (&config.admin_password_hash, &config.admin_password) {
        (Some(hash), _) => hash.clone(),
        (None, password) => {
            tracing::warn!("Using plain NESPAK_ADMIN_PASSWORD; prefer NESPAK_ADMIN_PASSWORD_HASH");
            let password = password.clone().unwrap_or_default();
            tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
                .await??
        }
    };

    store
        .register_admin(&AdminCredential {
            username: config.admin_username.clone(),
            password_hash,
        })
        .await?;
    tracing::info!(username = %config.admin_username, "Admin credential registered");
    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the issuer for the auth layer
    let tokens = Arc::clone(state.store.tokens());

    // Public reads and the login flow
    let public_routes = Router::new()
        .route("/events", get(api::list_events))
        .route("/news", get(api::list_news))
        .route("/resources", get(api::list_resources))
        .route("/site-config", get(api::get_site_config))
        .route("/auth/login", post(api::login))
        .route("/auth/session", get(api::get_session));

    // Dashboard mutations
    let admin_routes = Router::new()
        // Events
        .route("/events", post(api::create_event))
        .route("/events/{id}", put(api::update_event))
        .route("/events/{id}", delete(api::delete_event))
        // News
        .route("/news", post(api::create_news))
        .route("/news/{id}", put(api::update_news))
        .route("/news/{id}", delete(api::delete_news))
        // Resources
        .route("/resources", post(api::create_resource))
        .route("/resources/{id}", put(api::update_resource))
        .route("/resources/{id}", delete(api::delete_resource))
        // Site configuration
        .route("/site-config", patch(api::update_site_config))
        // Notification feed
        .route("/admin/notifications", get(api::list_notifications))
        // Apply admin session middleware
        .route_layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(tokens.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(admin_routes))
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
