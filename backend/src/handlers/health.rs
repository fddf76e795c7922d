//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub products: usize,
    pub agrofit_configured: bool,
}

/// Health check with a glance at the loaded snapshot
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store.read().await;
    Json(HealthResponse {
        status: "ok",
        products: store.stock.len(),
        agrofit_configured: state.agrofit.is_configured(),
    })
}
