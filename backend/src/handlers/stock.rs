//! HTTP handlers for stock queries

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::AppResult;
use crate::services::stock::{CategorySummary, StockCounts, StockFilter, StockService};
use crate::services::store::StockEntry;
use crate::AppState;

/// List stock entries with optional filters
pub async fn list_stock(
    State(state): State<AppState>,
    Query(filter): Query<StockFilter>,
) -> AppResult<Json<Vec<StockEntry>>> {
    let service = StockService::new(state.store);
    Ok(Json(service.list(&filter).await))
}

/// Look up a single product by code
pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<StockEntry>> {
    let service = StockService::new(state.store);
    Ok(Json(service.get(&code).await?))
}

/// Headline counters for the dashboard
pub async fn get_stock_counts(State(state): State<AppState>) -> AppResult<Json<StockCounts>> {
    let service = StockService::new(state.store);
    Ok(Json(service.counts().await))
}

/// Per-category rollup
pub async fn get_category_summary(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategorySummary>>> {
    let service = StockService::new(state.store);
    Ok(Json(service.category_summary().await))
}
