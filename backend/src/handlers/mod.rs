//! HTTP handlers for the AgroStock inventory dashboard

pub mod agrofit;
pub mod damage;
pub mod health;
pub mod reposition;
pub mod stock;
pub mod upload;

pub use agrofit::*;
pub use damage::*;
pub use health::*;
pub use reposition::*;
pub use stock::*;
pub use upload::*;
