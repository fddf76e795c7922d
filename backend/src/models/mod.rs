//! Data models for the AgroStock inventory dashboard
//!
//! The reconciliation types live in the shared crate so the wasm bindings
//! can reuse them; this module re-exports them for backend code.

pub use shared::models::{SalesRecord, StockRecord, StockStatus, ZeroedProduct};
