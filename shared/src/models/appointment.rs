//! Appointment Model (scheduled booking)

use super::service::ServiceSnapshot;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Scheduled booking of one or more services.
///
/// `total_price` and `total_duration` are always derived from `services`,
/// see [`AppointmentTotals::from_services`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub customer_name: String,
    pub phone: Option<String>,
    pub staff: Option<String>,
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM)
    pub time: String,
    /// Ordered service snapshots
    pub services: Vec<ServiceSnapshot>,
    pub total_duration: i64,
    pub total_price: f64,
    pub created_at: i64,
}

impl Appointment {
    /// Service names joined with ", " (the label a completed sale carries)
    pub fn service_label(&self) -> String {
        self.services
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Totals derived from a list of service snapshots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppointmentTotals {
    pub total_price: f64,
    pub total_duration: i64,
}

impl AppointmentTotals {
    /// Sum prices in decimal space; the total is exact for the stored prices
    pub fn from_services(services: &[ServiceSnapshot]) -> Self {
        let price: Decimal = services
            .iter()
            .map(|s| Decimal::from_f64(s.price).unwrap_or_default())
            .sum();
        let total_price = price.to_f64().unwrap_or_default();
        let total_duration = services.iter().map(|s| s.duration).sum();

        Self {
            total_price,
            total_duration,
        }
    }
}

/// Create appointment payload; services are picked from the catalog by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub customer_name: String,
    pub phone: Option<String>,
    pub staff: Option<String>,
    pub date: String,
    pub time: String,
    pub service_ids: Vec<i64>,
}

/// Update appointment payload
///
/// When `service_ids` is present the snapshots are re-captured from the
/// current catalog and totals recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub staff: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub service_ids: Option<Vec<i64>>,
}

/// Complete appointment payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentComplete {
    /// Completion day (YYYY-MM-DD); defaults to today in the business timezone
    pub date: Option<String>,
}

/// Appointment list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentQuery {
    /// Exact calendar day
    pub date: Option<String>,
    /// Inclusive range start
    pub from: Option<String>,
    /// Inclusive range end
    pub to: Option<String>,
}
