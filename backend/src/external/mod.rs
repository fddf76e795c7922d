//! External service clients

pub mod agrofit;

pub use agrofit::AgrofitClient;
