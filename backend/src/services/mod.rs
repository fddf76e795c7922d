//! Business logic services for the AgroStock inventory dashboard

pub mod damage;
pub mod ingest;
pub mod reposition;
pub mod stock;
pub mod store;

pub use damage::DamageService;
pub use ingest::IngestService;
pub use reposition::RepositionService;
pub use stock::StockService;
