//! Shared types for the salon back office
//!
//! Domain models, the unified error system and small utilities used by the
//! server and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
pub use serde::{Deserialize, Serialize};
