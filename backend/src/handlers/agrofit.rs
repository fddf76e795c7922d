//! HTTP handlers for AGROFIT catalog lookups

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::external::agrofit::{AgrofitMatch, AgrofitProduct};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Search registered products by brand name
pub async fn search_agrofit_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<AgrofitProduct>>> {
    Ok(Json(state.agrofit.search_product(&query.q).await?))
}

/// Search registered products by active ingredient
pub async fn search_agrofit_ingredients(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<AgrofitProduct>>> {
    Ok(Json(state.agrofit.search_active_ingredient(&query.q).await?))
}

/// Best catalog match for a local product name
pub async fn match_agrofit_product(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Option<AgrofitMatch>>> {
    Ok(Json(state.agrofit.best_match(&query.q).await?))
}
