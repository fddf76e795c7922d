//! Domain models for the AgroStock inventory dashboard

mod sales;
mod stock;

pub use sales::*;
pub use stock::*;
