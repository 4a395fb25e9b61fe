//! Period boundaries
//!
//! A period starts at the beginning of the reference day, week or month and
//! is open-ended. Weeks start on Monday. The week boundary never reaches
//! back past the month boundary, so daily ⊆ weekly ⊆ monthly always holds.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use shared::models::Sale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    All,
}

impl Period {
    /// First day included in the period, `None` for [`Period::All`]
    pub fn start(self, reference_day: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Daily => Some(reference_day),
            Period::Weekly => Some(start_of_week(reference_day).max(start_of_month(reference_day))),
            Period::Monthly => Some(start_of_month(reference_day)),
            Period::All => None,
        }
    }

    /// Whether `day` is on or after the period start
    pub fn contains(self, day: NaiveDate, reference_day: NaiveDate) -> bool {
        self.start(reference_day).is_none_or(|start| day >= start)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "today" | "day" => Ok(Period::Daily),
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            "all" => Ok(Period::All),
            other => Err(format!("Unknown period: {other}")),
        }
    }
}

/// Monday of the week containing `day`
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `day`
pub fn start_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Calendar day of a sale; unparseable dates belong to no period
pub fn sale_day(sale: &Sale) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&sale.date, "%Y-%m-%d").ok()
}

/// Sales inside `period` relative to `reference_day`, input order kept
pub fn filter_sales(sales: &[Sale], period: Period, reference_day: NaiveDate) -> Vec<&Sale> {
    sales
        .iter()
        .filter(|sale| match period {
            Period::All => true,
            _ => sale_day(sale).is_some_and(|day| period.contains(day, reference_day)),
        })
        .collect()
}
