//! Time helpers: business timezone conversion and date parsing
//!
//! Dates are stored as `YYYY-MM-DD` text and times as `HH:MM`; every
//! "today" is evaluated in the configured business timezone.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Parse a time string (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, TIME_FORMAT)
        .map_err(|_| AppError::validation(format!("Invalid time format: {time}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Calendar day of `instant` in the business timezone
pub fn business_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Parse an optional date, falling back to `default`
pub fn parse_date_or(date: Option<&str>, default: NaiveDate) -> AppResult<NaiveDate> {
    match date {
        Some(d) => parse_date(d),
        None => Ok(default),
    }
}
