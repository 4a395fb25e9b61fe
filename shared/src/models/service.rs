//! Service Model (catalog entry)

use serde::{Deserialize, Serialize};

/// Catalog service offered by the salon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Service {
    pub id: i64,
    /// Unique display label
    pub name: String,
    /// Non-negative price
    pub price: f64,
    /// Duration in minutes (positive)
    pub duration: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub price: f64,
    pub duration: i64,
}

/// Update service payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<i64>,
}

/// Service captured by value inside an appointment.
///
/// Later catalog edits never touch existing snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub name: String,
    pub price: f64,
    pub duration: i64,
}

impl From<&Service> for ServiceSnapshot {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            price: service.price,
            duration: service.duration,
        }
    }
}
