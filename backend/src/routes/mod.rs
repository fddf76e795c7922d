//! Route definitions for the AgroStock inventory dashboard

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Spreadsheet uploads
        .nest("/uploads", upload_routes())
        // Stock queries
        .nest("/stock", stock_routes())
        // Store-restock queue
        .nest("/reposition", reposition_routes())
        // Damage reports
        .nest("/damages", damage_routes())
        // AGROFIT catalog lookups
        .nest("/agrofit", agrofit_routes())
}

/// Spreadsheet upload routes
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_uploads))
        .route("/master", post(handlers::upload_master))
        .route("/partial", post(handlers::upload_partial))
        .route("/preview", post(handlers::preview_grid))
}

/// Stock query routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock))
        .route("/counts", get(handlers::get_stock_counts))
        .route("/categories", get(handlers::get_category_summary))
        .route("/:code", get(handlers::get_product))
}

/// Store-restock queue routes
fn reposition_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_reposition))
        .route("/:item_id/restocked", post(handlers::mark_restocked))
}

/// Damage report routes
fn damage_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_damages).post(handlers::register_damage))
        .route("/:report_id/resolve", post(handlers::resolve_damage))
        .route("/:report_id", delete(handlers::delete_damage))
}

/// AGROFIT catalog routes
fn agrofit_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::search_agrofit_products))
        .route("/ingredients", get(handlers::search_agrofit_ingredients))
        .route("/match", get(handlers::match_agrofit_product))
}
