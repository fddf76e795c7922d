//! Stock count models

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;

/// Reconciliation status derived from a count annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Physical count matches the system quantity
    #[default]
    Ok,
    /// Physical count below system quantity (falta)
    Shortage,
    /// Physical count above system quantity (sobra)
    Overage,
    /// Note reports damaged goods; no quantity correction inferred
    Damaged,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Ok => "ok",
            StockStatus::Shortage => "shortage",
            StockStatus::Overage => "overage",
            StockStatus::Damaged => "damaged",
        }
    }

    /// Anything other than a clean count is surfaced as a divergence
    pub fn is_divergent(&self) -> bool {
        !matches!(self, StockStatus::Ok)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reconciled row of a stock count spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub code: String,
    pub product: String,
    pub category: String,
    pub qty_system: i64,
    pub qty_physical: i64,
    pub difference: i64,
    pub note: String,
    pub status: StockStatus,
}

impl StockRecord {
    /// Build a record from a parsed annotation, keeping the
    /// `difference == qty_physical - qty_system` invariant by construction
    pub fn from_count(
        code: String,
        product: String,
        category: String,
        qty_system: i64,
        annotation: Annotation,
    ) -> Self {
        Self {
            code,
            product,
            category,
            qty_system,
            qty_physical: annotation.qty_physical,
            difference: annotation.difference,
            note: annotation.note,
            status: annotation.status,
        }
    }
}
