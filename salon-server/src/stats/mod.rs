//! Revenue and booking aggregation
//!
//! - [`period`] - day / week / month boundaries shared with export
//! - [`aggregation`] - pure functions over already-fetched sales and appointments

pub mod aggregation;
pub mod period;

pub use aggregation::{
    PeriodRevenue, ServiceCount, TrendPoint, appointments_on_date, daily_trend, period_revenue,
    revenue_by_service, top_services, total_revenue,
};
pub use period::Period;
