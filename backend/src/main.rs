//! AgroStock Inventory Dashboard - Backend Server
//!
//! Stock reconciliation for an agricultural retail store: spreadsheet
//! ingestion, count-annotation parsing, restock queue and damage reports.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use external::agrofit::AgrofitClient;
use services::store::SharedStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Arc<Config>,
    pub agrofit: AgrofitClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrostock_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting AgroStock Inventory Server");
    tracing::info!("Environment: {}", config.environment);

    let agrofit = AgrofitClient::new(&config.agrofit)?;

    // Create application state
    let state = AppState {
        store: SharedStore::default(),
        config: Arc::new(config.clone()),
        agrofit,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AgroStock Inventory Dashboard API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
