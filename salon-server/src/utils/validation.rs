//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;
use crate::utils::money;
use shared::error::ErrorCode;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: service, customer, staff
pub const MAX_NAME_LEN: usize = 200;

/// Free-text service description on a sale
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Short identifiers: phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Largest accepted price or amount
pub const MAX_AMOUNT: f64 = 1_000_000.0;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Trim an optional string and collapse blanks to `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Catalog price: finite, non-negative, whole cents
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 || price > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::ServiceInvalidPrice,
            format!("Price must be between 0 and {MAX_AMOUNT}, got {price}"),
        ));
    }
    if money::has_sub_cent_digits(price) {
        return Err(AppError::with_message(
            ErrorCode::ServiceInvalidPrice,
            format!("Price must have at most 2 decimal places, got {price}"),
        ));
    }
    Ok(())
}

/// Catalog duration: positive minutes
pub fn validate_duration(duration: i64) -> Result<(), AppError> {
    if duration <= 0 {
        return Err(AppError::with_message(
            ErrorCode::ServiceInvalidDuration,
            format!("Duration must be a positive number of minutes, got {duration}"),
        ));
    }
    Ok(())
}

/// Sale amount: finite, strictly positive, whole cents
pub fn validate_amount(amount: f64) -> Result<(), AppError> {
    if !amount.is_finite() || amount <= 0.0 || amount > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::SaleInvalidAmount,
            format!("Amount must be greater than 0 and at most {MAX_AMOUNT}, got {amount}"),
        ));
    }
    if money::has_sub_cent_digits(amount) {
        return Err(AppError::with_message(
            ErrorCode::SaleInvalidAmount,
            format!("Amount must have at most 2 decimal places, got {amount}"),
        ));
    }
    Ok(())
}
