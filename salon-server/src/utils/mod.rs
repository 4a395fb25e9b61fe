//! Utility module: shared error types, logging, time, money and validation helpers

pub mod error;
pub mod logger;
pub mod money;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
