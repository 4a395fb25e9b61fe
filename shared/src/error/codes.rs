//! Unified error codes for the salon back office
//!
//! This module defines all error codes used across the server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Appointment / completion errors
//! - 5xxx: Sale errors
//! - 6xxx: Service catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 4xxx: Appointment ====================
    /// Appointment not found
    AppointmentNotFound = 4001,
    /// Appointment has no services
    AppointmentEmpty = 4002,
    /// Appointment total is not positive
    AppointmentInvalidTotal = 4003,
    /// Completion aborted: the sale could not be recorded
    CompletionSaleFailed = 4101,
    /// Completion aborted after the sale step: appointment could not be removed
    CompletionReconciliationRequired = 4102,

    // ==================== 5xxx: Sale ====================
    /// Sale not found
    SaleNotFound = 5001,
    /// Sale amount is invalid
    SaleInvalidAmount = 5002,

    // ==================== 6xxx: Service catalog ====================
    /// Service not found
    ServiceNotFound = 6001,
    /// Service name already exists
    ServiceNameExists = 6002,
    /// Service price is invalid
    ServiceInvalidPrice = 6003,
    /// Service duration is invalid
    ServiceInvalidDuration = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Export generation failed
    ExportFailed = 9006,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Appointment
            ErrorCode::AppointmentNotFound => "Appointment not found",
            ErrorCode::AppointmentEmpty => "Appointment has no services",
            ErrorCode::AppointmentInvalidTotal => "Appointment total must be positive",
            ErrorCode::CompletionSaleFailed => {
                "Sale could not be recorded; appointment left unchanged"
            }
            ErrorCode::CompletionReconciliationRequired => {
                "Appointment could not be removed after recording the sale"
            }

            // Sale
            ErrorCode::SaleNotFound => "Sale not found",
            ErrorCode::SaleInvalidAmount => "Sale amount is invalid",

            // Service catalog
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::ServiceNameExists => "Service name already exists",
            ErrorCode::ServiceInvalidPrice => "Service price must be non-negative",
            ErrorCode::ServiceInvalidDuration => "Service duration must be positive",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ExportFailed => "Export failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Appointment
            4001 => Ok(ErrorCode::AppointmentNotFound),
            4002 => Ok(ErrorCode::AppointmentEmpty),
            4003 => Ok(ErrorCode::AppointmentInvalidTotal),
            4101 => Ok(ErrorCode::CompletionSaleFailed),
            4102 => Ok(ErrorCode::CompletionReconciliationRequired),

            // Sale
            5001 => Ok(ErrorCode::SaleNotFound),
            5002 => Ok(ErrorCode::SaleInvalidAmount),

            // Service catalog
            6001 => Ok(ErrorCode::ServiceNotFound),
            6002 => Ok(ErrorCode::ServiceNameExists),
            6003 => Ok(ErrorCode::ServiceInvalidPrice),
            6004 => Ok(ErrorCode::ServiceInvalidDuration),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::ExportFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
