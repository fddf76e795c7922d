//! Shared types and parsing logic for the AgroStock inventory dashboard
//!
//! This crate contains the spreadsheet ingestion core shared between the
//! backend, frontend (via WASM), and other components of the system:
//! annotation parsing, category classification, and sheet format detection.

pub mod annotation;
pub mod category;
pub mod models;
pub mod sheet;

pub use annotation::*;
pub use category::*;
pub use models::*;
pub use sheet::*;
