//! AGROFIT catalog client
//!
//! Integrates with the Embrapa AGROFIT API to enrich field-defensive
//! products with their official registration data. The raw API nests
//! most fields inside lists of objects; responses are flattened into a
//! single struct before they reach the dashboard.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::AgrofitConfig;
use crate::error::{AppError, AppResult};

/// Minimum name similarity for a search hit to count as a match
const MATCH_THRESHOLD: f64 = 0.4;

/// AGROFIT API client
#[derive(Clone)]
pub struct AgrofitClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Flattened AGROFIT product record
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgrofitProduct {
    pub brand: String,
    pub registration: Option<String>,
    pub holder: Option<String>,
    pub agronomic_classes: Vec<String>,
    pub active_ingredients: Vec<String>,
    pub toxicological_class: Option<String>,
    pub formulation: Option<String>,
}

/// A match candidate scored against the local product name
#[derive(Debug, Clone, Serialize)]
pub struct AgrofitMatch {
    pub product: AgrofitProduct,
    pub similarity: f64,
}

impl AgrofitClient {
    pub fn new(config: &AgrofitConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Value> {
        if !self.is_configured() {
            return Err(AppError::AgrofitToken);
        }
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::AgrofitError(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::AgrofitToken),
            status if !status.is_success() => {
                Err(AppError::AgrofitError(format!("HTTP {}", status.as_u16())))
            }
            _ => response
                .json()
                .await
                .map_err(|e| AppError::AgrofitError(e.to_string())),
        }
    }

    /// Search registered products by commercial brand name
    pub async fn search_product(&self, name: &str) -> AppResult<Vec<AgrofitProduct>> {
        let body = self
            .get_json("produtos-formulados", &[("marcaComercial", name)])
            .await?;
        Ok(items(&body).iter().map(flatten_product).collect())
    }

    /// Search products by active ingredient name
    pub async fn search_active_ingredient(&self, name: &str) -> AppResult<Vec<AgrofitProduct>> {
        let body = self
            .get_json("produtos-formulados", &[("ingredienteAtivo", name)])
            .await?;
        Ok(items(&body).iter().map(flatten_product).collect())
    }

    /// Best catalog match for a local product name, if any hit is close
    /// enough
    pub async fn best_match(&self, product_name: &str) -> AppResult<Option<AgrofitMatch>> {
        let candidates = self.search_product(product_name).await?;
        let best = candidates
            .into_iter()
            .map(|product| AgrofitMatch {
                similarity: name_similarity(product_name, &product.brand),
                product,
            })
            .filter(|m| m.similarity >= MATCH_THRESHOLD)
            .max_by(|a, b| a.similarity.total_cmp(&b.similarity));
        Ok(best)
    }
}

/// The API wraps result pages in a `data` array; bare arrays also occur
fn items(body: &Value) -> Vec<Value> {
    match body {
        Value::Array(arr) => arr.clone(),
        Value::Object(obj) => obj
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn str_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Collect a list field whose entries are either strings or objects
/// carrying the value under `inner_key`
fn list_field(item: &Value, key: &str, inner_key: &str) -> Vec<String> {
    item.get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Object(_) => str_field(v, inner_key),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Flatten one raw API product object
fn flatten_product(item: &Value) -> AgrofitProduct {
    let brands = list_field(item, "marca_comercial", "marca_comercial");
    let brand = if brands.is_empty() {
        str_field(item, "marca_comercial").unwrap_or_default()
    } else {
        brands.join(" / ")
    };

    AgrofitProduct {
        brand,
        registration: str_field(item, "numero_registro"),
        holder: str_field(item, "titular_registro"),
        agronomic_classes: list_field(item, "classe_categoria_agronomica", "descricao"),
        active_ingredients: list_field(item, "ingrediente_ativo", "ingrediente_ativo"),
        toxicological_class: str_field(item, "classificacao_toxicologica"),
        formulation: str_field(item, "formulacao"),
    }
}

/// Dice coefficient over character bigrams of the uppercased
/// alphanumeric form of both names; 1.0 for identical, 0.0 for disjoint
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let ga = bigrams(a);
    let gb = bigrams(b);
    if ga.is_empty() && gb.is_empty() {
        return 1.0;
    }
    if ga.is_empty() || gb.is_empty() {
        return 0.0;
    }
    let mut gb = gb;
    let mut shared = 0usize;
    for g in &ga {
        if let Some(pos) = gb.iter().position(|x| x == g) {
            gb.swap_remove(pos);
            shared += 1;
        }
    }
    (2.0 * shared as f64) / (ga.len() + gb.len() + shared) as f64
}

fn bigrams(s: &str) -> Vec<[char; 2]> {
    let chars: Vec<char> = s
        .to_uppercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    chars.windows(2).map(|w| [w[0], w[1]]).collect()
}
