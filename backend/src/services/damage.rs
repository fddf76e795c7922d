//! Damage report service
//!
//! Damaged-goods reports are recorded by hand and deliberately survive
//! stock uploads; a loss stays on the board until resolved or deleted.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::store::{DamageReport, DamageStatus, SharedStore};

/// Damage report service
#[derive(Clone)]
pub struct DamageService {
    store: SharedStore,
}

/// Input for registering a damage report
#[derive(Debug, Deserialize)]
pub struct RegisterDamageInput {
    pub code: String,
    pub product: String,
    pub qty: i64,
    pub description: String,
}

/// A report as listed, with the age counter shown on the board
#[derive(Debug, Clone, Serialize)]
pub struct DamageReportView {
    #[serde(flatten)]
    pub report: DamageReport,
    pub days_open: i64,
}

impl DamageService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Register a new damage report
    pub async fn register(&self, input: RegisterDamageInput) -> AppResult<DamageReport> {
        if input.qty < 1 {
            return Err(AppError::Validation {
                field: "qty".to_string(),
                message: "damaged quantity must be at least 1".to_string(),
                message_pt: "A quantidade avariada deve ser pelo menos 1.".to_string(),
            });
        }
        let product = input.product.trim();
        if product.is_empty() {
            return Err(AppError::Validation {
                field: "product".to_string(),
                message: "product name is required".to_string(),
                message_pt: "Informe o nome do produto.".to_string(),
            });
        }

        let mut store = self.store.write().await;
        let id = store.next_damage_id();
        let report = DamageReport {
            id,
            code: input.code.trim().to_string(),
            product: product.to_string(),
            qty: input.qty,
            description: input.description.trim().to_string(),
            reported_at: Utc::now(),
            status: DamageStatus::Open,
            resolved_at: None,
        };
        store.damages.push(report.clone());
        tracing::info!(id, product = %report.product, qty = report.qty, "damage reported");
        Ok(report)
    }

    /// List reports, newest first, optionally only the open ones
    pub async fn list(&self, open_only: bool) -> Vec<DamageReportView> {
        let store = self.store.read().await;
        let now = Utc::now();
        let mut views: Vec<DamageReportView> = store
            .damages
            .iter()
            .filter(|r| !open_only || r.status == DamageStatus::Open)
            .map(|r| DamageReportView {
                days_open: (now - r.reported_at).num_days(),
                report: r.clone(),
            })
            .collect();
        views.sort_by(|a, b| b.report.reported_at.cmp(&a.report.reported_at));
        views
    }

    /// Close a report, keeping it in the history
    pub async fn resolve(&self, id: u64) -> AppResult<DamageReport> {
        let mut store = self.store.write().await;
        let report = store
            .damages
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("damage report {}", id)))?;
        report.status = DamageStatus::Resolved;
        report.resolved_at = Some(Utc::now());
        Ok(report.clone())
    }

    /// Remove a report entirely
    pub async fn delete(&self, id: u64) -> AppResult<()> {
        let mut store = self.store.write().await;
        let before = store.damages.len();
        store.damages.retain(|r| r.id != id);
        if store.damages.len() == before {
            return Err(AppError::NotFound(format!("damage report {}", id)));
        }
        Ok(())
    }

    pub async fn open_count(&self) -> usize {
        let store = self.store.read().await;
        store
            .damages
            .iter()
            .filter(|r| r.status == DamageStatus::Open)
            .count()
    }
}
