//! API routes
//!
//! - [`health`] - liveness and database reachability
//! - [`auth`] - login / logout / current user
//! - [`services`] - service catalog
//! - [`appointments`] - bookings and completion
//! - [`sales`] - sales ledger and CSV export
//! - [`statistics`] - dashboard, analytics, sales report

pub mod appointments;
pub mod auth;
pub mod health;
pub mod sales;
pub mod services;
pub mod statistics;

pub use crate::utils::{AppError, AppResult};
