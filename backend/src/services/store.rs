//! In-memory dashboard state
//!
//! The dashboard holds one working snapshot of the store's stock plus the
//! restock queue and damage reports. Persistence is out of scope; the
//! state lives behind a single `RwLock` shared by all handlers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::StockStatus;

/// Shared handle to the dashboard state
pub type SharedStore = Arc<RwLock<StockStore>>;

/// One product as currently held by the dashboard, keyed by product code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    pub code: String,
    pub product: String,
    pub category: String,
    pub qty_system: i64,
    pub qty_physical: i64,
    pub difference: i64,
    pub note: String,
    pub status: StockStatus,
    /// Units sold since the last sales upload, zero for count-only rows
    pub qty_sold: i64,
    pub updated_at: DateTime<Utc>,
}

/// Kind of spreadsheet upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    /// Full snapshot; replaces the whole stock table
    Master,
    /// Incremental sales or count sheet; merged into the snapshot
    Partial,
}

/// Upload audit trail entry
#[derive(Debug, Clone, Serialize)]
pub struct UploadHistoryEntry {
    pub id: u64,
    pub kind: UploadKind,
    pub filename: String,
    pub rows: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// A sold-out product waiting to be restocked on the shop floor
#[derive(Debug, Clone, Serialize)]
pub struct RepositionItem {
    pub id: u64,
    pub code: String,
    pub product: String,
    pub group: String,
    pub qty_sold: i64,
    pub queued_at: DateTime<Utc>,
    pub restocked: bool,
    pub restocked_at: Option<DateTime<Utc>>,
}

/// Damage report lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageStatus {
    Open,
    Resolved,
}

/// A damaged-goods report; outlives stock uploads so losses stay visible
/// until someone resolves them
#[derive(Debug, Clone, Serialize)]
pub struct DamageReport {
    pub id: u64,
    pub code: String,
    pub product: String,
    pub qty: i64,
    pub description: String,
    pub reported_at: DateTime<Utc>,
    pub status: DamageStatus,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// The whole dashboard state
#[derive(Debug, Default)]
pub struct StockStore {
    pub stock: HashMap<String, StockEntry>,
    pub uploads: Vec<UploadHistoryEntry>,
    pub reposition: Vec<RepositionItem>,
    pub damages: Vec<DamageReport>,
    next_upload_id: u64,
    next_reposition_id: u64,
    next_damage_id: u64,
}

impl StockStore {
    pub fn next_upload_id(&mut self) -> u64 {
        self.next_upload_id += 1;
        self.next_upload_id
    }

    pub fn next_reposition_id(&mut self) -> u64 {
        self.next_reposition_id += 1;
        self.next_reposition_id
    }

    pub fn next_damage_id(&mut self) -> u64 {
        self.next_damage_id += 1;
        self.next_damage_id
    }

    /// Whether a code already sits unrestocked in the restock queue
    pub fn is_queued_for_restock(&self, code: &str) -> bool {
        self.reposition
            .iter()
            .any(|item| !item.restocked && item.code == code)
    }
}
