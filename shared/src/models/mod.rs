//! Data models
//!
//! Shared between salon-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflake ids.

pub mod appointment;
pub mod sale;
pub mod service;

// Re-exports
pub use appointment::*;
pub use sale::*;
pub use service::*;
