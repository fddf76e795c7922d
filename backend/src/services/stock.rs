//! Stock query service
//!
//! Read side of the dashboard: filtered listings, per-status counters and
//! the per-category rollup feeding the overview charts.

use serde::{Deserialize, Serialize};
use shared::category::sort_categories;

use crate::error::{AppError, AppResult};
use crate::models::StockStatus;
use crate::services::store::{SharedStore, StockEntry};

/// Stock query service
#[derive(Clone)]
pub struct StockService {
    store: SharedStore,
}

/// Listing filters, all optional
#[derive(Debug, Default, Deserialize)]
pub struct StockFilter {
    pub category: Option<String>,
    pub status: Option<StockStatus>,
    /// Keep only rows where the count disagrees with the system
    #[serde(default)]
    pub divergent_only: bool,
    /// Case-insensitive substring match on product name or code
    pub search: Option<String>,
}

/// Headline counters for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct StockCounts {
    pub total_products: usize,
    pub divergent: usize,
    pub shortages: usize,
    pub overages: usize,
    pub damaged: usize,
    pub qty_system_total: i64,
    pub qty_physical_total: i64,
}

/// Per-category rollup row
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub products: usize,
    pub divergent: usize,
    pub qty_system_total: i64,
}

impl StockService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List stock entries matching the filter, sorted by category display
    /// priority and product name
    pub async fn list(&self, filter: &StockFilter) -> Vec<StockEntry> {
        let store = self.store.read().await;
        let search = filter.search.as_deref().map(str::to_uppercase);

        let mut entries: Vec<StockEntry> = store
            .stock
            .values()
            .filter(|e| {
                if let Some(cat) = &filter.category {
                    if !e.category.eq_ignore_ascii_case(cat) {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if e.status != status {
                        return false;
                    }
                }
                if filter.divergent_only && !e.status.is_divergent() {
                    return false;
                }
                if let Some(term) = &search {
                    if !e.product.to_uppercase().contains(term)
                        && !e.code.to_uppercase().contains(term)
                    {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        let mut categories: Vec<String> = entries.iter().map(|e| e.category.clone()).collect();
        categories.sort();
        categories.dedup();
        sort_categories(&mut categories);
        let rank = |cat: &str| categories.iter().position(|c| c == cat).unwrap_or(usize::MAX);

        entries.sort_by(|a, b| {
            rank(&a.category)
                .cmp(&rank(&b.category))
                .then_with(|| a.product.cmp(&b.product))
        });
        entries
    }

    /// Look up a single product by code
    pub async fn get(&self, code: &str) -> AppResult<StockEntry> {
        let store = self.store.read().await;
        store
            .stock
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("product {}", code)))
    }

    /// Headline counters over the whole snapshot
    pub async fn counts(&self) -> StockCounts {
        let store = self.store.read().await;
        let mut counts = StockCounts {
            total_products: store.stock.len(),
            divergent: 0,
            shortages: 0,
            overages: 0,
            damaged: 0,
            qty_system_total: 0,
            qty_physical_total: 0,
        };
        for e in store.stock.values() {
            if e.status.is_divergent() {
                counts.divergent += 1;
            }
            match e.status {
                StockStatus::Shortage => counts.shortages += 1,
                StockStatus::Overage => counts.overages += 1,
                StockStatus::Damaged => counts.damaged += 1,
                StockStatus::Ok => {}
            }
            counts.qty_system_total += e.qty_system;
            counts.qty_physical_total += e.qty_physical;
        }
        counts
    }

    /// Per-category rollup, ordered by category display priority
    pub async fn category_summary(&self) -> Vec<CategorySummary> {
        let store = self.store.read().await;
        let mut by_category: std::collections::HashMap<String, CategorySummary> =
            std::collections::HashMap::new();
        for e in store.stock.values() {
            let row = by_category
                .entry(e.category.clone())
                .or_insert_with(|| CategorySummary {
                    category: e.category.clone(),
                    products: 0,
                    divergent: 0,
                    qty_system_total: 0,
                });
            row.products += 1;
            if e.status.is_divergent() {
                row.divergent += 1;
            }
            row.qty_system_total += e.qty_system;
        }

        let mut categories: Vec<String> = by_category.keys().cloned().collect();
        sort_categories(&mut categories);
        categories
            .into_iter()
            .filter_map(|c| by_category.remove(&c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(code: &str, product: &str, category: &str, status: StockStatus) -> StockEntry {
        StockEntry {
            code: code.to_string(),
            product: product.to_string(),
            category: category.to_string(),
            qty_system: 10,
            qty_physical: if status == StockStatus::Shortage { 8 } else { 10 },
            difference: if status == StockStatus::Shortage { -2 } else { 0 },
            note: String::new(),
            status,
            qty_sold: 0,
            updated_at: Utc::now(),
        }
    }

    async fn seeded() -> StockService {
        let store = SharedStore::default();
        {
            let mut guard = store.write().await;
            for e in [
                entry("1", "SEMENTE MILHO", "SEMENTES", StockStatus::Ok),
                entry("2", "HERBICIDA X", "HERBICIDAS", StockStatus::Shortage),
                entry("3", "PARAFUSO", "OUTROS", StockStatus::Ok),
                entry("4", "HERBICIDA A", "HERBICIDAS", StockStatus::Ok),
            ] {
                guard.stock.insert(e.code.clone(), e);
            }
        }
        StockService::new(store)
    }

    #[tokio::test]
    async fn test_list_sorted_by_category_priority_then_name() {
        let service = seeded().await;
        let all = service.list(&StockFilter::default()).await;
        let order: Vec<&str> = all.iter().map(|e| e.product.as_str()).collect();
        assert_eq!(
            order,
            vec!["HERBICIDA A", "HERBICIDA X", "SEMENTE MILHO", "PARAFUSO"]
        );
    }

    #[tokio::test]
    async fn test_divergent_filter_and_search() {
        let service = seeded().await;

        let divergent = service
            .list(&StockFilter {
                divergent_only: true,
                ..Default::default()
            })
            .await;
        assert_eq!(divergent.len(), 1);
        assert_eq!(divergent[0].code, "2");

        let found = service
            .list(&StockFilter {
                search: Some("parafuso".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_counts() {
        let service = seeded().await;
        let counts = service.counts().await;
        assert_eq!(counts.total_products, 4);
        assert_eq!(counts.divergent, 1);
        assert_eq!(counts.shortages, 1);
        assert_eq!(counts.qty_system_total, 40);
        assert_eq!(counts.qty_physical_total, 38);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let service = seeded().await;
        assert!(matches!(
            service.get("nope").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_category_summary_ordering() {
        let service = seeded().await;
        let summary = service.category_summary().await;
        let cats: Vec<&str> = summary.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(cats, vec!["HERBICIDAS", "SEMENTES", "OUTROS"]);
        assert_eq!(summary[0].products, 2);
        assert_eq!(summary[0].divergent, 1);
    }
}
