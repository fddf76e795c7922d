//! Sales report models

use serde::{Deserialize, Serialize};

use super::StockStatus;

/// One row of a sales spreadsheet, reconciled against the stock column
///
/// Sales sheets carry the same annotation column as stock counts, so the
/// full reconciliation fields are derived here too; `qty_sold` feeds the
/// store-restock queue downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub code: String,
    pub product: String,
    /// Normalized group label from the sheet's group column
    pub category: String,
    pub qty_system: i64,
    pub qty_physical: i64,
    pub difference: i64,
    pub note: String,
    pub status: StockStatus,
    pub qty_sold: i64,
}

/// A product that sold out: zero stock left but positive sales
///
/// These rows are kept in a side list instead of being discarded, since a
/// stock-out is exactly what the restock workflow needs to know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroedProduct {
    pub code: String,
    pub product: String,
    pub group: String,
    pub qty_sold: i64,
}
