//! Sale Model (completed transaction)

use serde::{Deserialize, Serialize};

/// Completed transaction. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub customer_name: String,
    /// Free-text service description, e.g. "Haircut, Manicure"
    pub service: String,
    pub amount: f64,
    /// Business day (YYYY-MM-DD)
    pub date: String,
    pub staff: Option<String>,
    /// Appointment this sale was completed from (None for manual entries)
    #[serde(default)]
    pub appointment_id: Option<i64>,
    /// Creation time (Unix millis)
    pub created_at: Option<i64>,
}

/// Manual sale entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreate {
    pub customer_name: String,
    pub service: String,
    pub amount: f64,
    pub date: String,
    pub staff: Option<String>,
}

/// Sale list query (inclusive date range)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}
