//! HTTP handlers for the store-restock queue

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reposition::{RepositionQueue, RepositionService};
use crate::services::store::RepositionItem;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RepositionQuery {
    #[serde(default)]
    pub pending_only: bool,
}

/// List restock queue items
pub async fn list_reposition(
    State(state): State<AppState>,
    Query(query): Query<RepositionQuery>,
) -> AppResult<Json<RepositionQueue>> {
    let service = RepositionService::new(state.store);
    Ok(Json(service.list(query.pending_only).await))
}

/// Mark a queue item as restocked on the shop floor
pub async fn mark_restocked(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<RepositionItem>> {
    let service = RepositionService::new(state.store);
    Ok(Json(service.mark_restocked(id).await?))
}
