//! CSV serialization of sales
//!
//! Period filtering is done by the caller with [`crate::stats::period`], the
//! same boundaries the dashboard uses.

use chrono::NaiveDate;

use shared::models::Sale;

use crate::stats::Period;
use crate::utils::money;
use crate::utils::time::format_date;

/// Serialize sales to CSV with a header row and a trailing total row
pub fn sales_to_csv(sales: &[&Sale], currency: &str) -> String {
    let header = [
        "Date".to_string(),
        "Customer".to_string(),
        "Service".to_string(),
        "Staff".to_string(),
        format!("Amount ({currency})"),
    ];

    let mut lines = Vec::with_capacity(sales.len() + 2);
    lines.push(join_row(header.iter().map(String::as_str)));

    for sale in sales {
        let amount = format!("{:.2}", sale.amount);
        lines.push(join_row([
            sale.date.as_str(),
            sale.customer_name.as_str(),
            sale.service.as_str(),
            sale.staff.as_deref().unwrap_or_default(),
            amount.as_str(),
        ]));
    }

    let total = format!("{:.2}", money::sum(sales.iter().map(|s| s.amount)));
    lines.push(join_row(["Total", "", "", "", total.as_str()]));

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

/// e.g. `sales-weekly-2024-03-14.csv`
pub fn export_filename(period: Period, reference_day: NaiveDate) -> String {
    format!("sales-{}-{}.csv", period.as_str(), format_date(reference_day))
}

fn join_row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields.into_iter().map(csv_escape).collect::<Vec<_>>().join(",")
}

/// Spreadsheet apps evaluate cells starting with these as formulas
fn should_neutralize(value: &str) -> bool {
    value.starts_with(['=', '+', '-', '@', '\t', '\r'])
}

fn csv_escape(value: &str) -> String {
    let safe = if should_neutralize(value) {
        format!("'{value}")
    } else {
        value.to_string()
    };
    if safe.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", safe.replace('"', "\"\""))
    } else {
        safe
    }
}
