//! HTTP handlers for damage reports

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::damage::{DamageReportView, DamageService, RegisterDamageInput};
use crate::services::store::DamageReport;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DamageQuery {
    #[serde(default)]
    pub open_only: bool,
}

/// Register a damage report
pub async fn register_damage(
    State(state): State<AppState>,
    Json(input): Json<RegisterDamageInput>,
) -> AppResult<Json<DamageReport>> {
    let service = DamageService::new(state.store);
    Ok(Json(service.register(input).await?))
}

/// List damage reports
pub async fn list_damages(
    State(state): State<AppState>,
    Query(query): Query<DamageQuery>,
) -> AppResult<Json<Vec<DamageReportView>>> {
    let service = DamageService::new(state.store);
    Ok(Json(service.list(query.open_only).await))
}

/// Resolve a damage report
pub async fn resolve_damage(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<DamageReport>> {
    let service = DamageService::new(state.store);
    Ok(Json(service.resolve(id).await?))
}

/// Delete a damage report
pub async fn delete_damage(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<()>> {
    let service = DamageService::new(state.store);
    service.delete(id).await?;
    Ok(Json(()))
}
