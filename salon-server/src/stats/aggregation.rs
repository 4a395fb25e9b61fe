//! Aggregation engine
//!
//! Pure functions over already-fetched sales and appointments. No I/O, no
//! clock: reference days are explicit parameters. Inputs are never mutated
//! and the same input always yields the same output.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use shared::models::{Appointment, Sale};

use super::period::{Period, sale_day};
use crate::utils::money;
use crate::utils::time::format_date;

/// Revenue from the start of the reference day, week and month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodRevenue {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCount {
    pub name: String,
    pub count: usize,
}

/// One day of the revenue trend (`date` is YYYY-MM-DD)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub amount: f64,
}

/// Sum of all sale amounts
pub fn total_revenue(sales: &[Sale]) -> f64 {
    money::sum(sales.iter().map(|s| s.amount))
}

/// Each bucket is computed independently over the whole list
pub fn period_revenue(sales: &[Sale], reference_day: NaiveDate) -> PeriodRevenue {
    let bucket = |period: Period| {
        money::sum(
            sales
                .iter()
                .filter(|s| sale_day(s).is_some_and(|day| period.contains(day, reference_day)))
                .map(|s| s.amount),
        )
    };

    PeriodRevenue {
        daily: bucket(Period::Daily),
        weekly: bucket(Period::Weekly),
        monthly: bucket(Period::Monthly),
    }
}

/// Group by the exact `service` label. Blank labels are skipped.
///
/// "Haircut, Manicure" and "Manicure, Haircut" are different keys.
pub fn revenue_by_service(sales: &[Sale]) -> BTreeMap<String, f64> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for sale in sales.iter().filter(|s| !s.service.trim().is_empty()) {
        grouped
            .entry(sale.service.clone())
            .or_default()
            .push(sale.amount);
    }

    grouped
        .into_iter()
        .map(|(label, amounts)| (label, money::sum(amounts)))
        .collect()
}

/// Most booked service names across all embedded snapshots.
///
/// Sorted by count descending; equal counts keep first-encountered order.
pub fn top_services(appointments: &[Appointment], n: usize) -> Vec<ServiceCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for service in appointments.iter().flat_map(|a| a.services.iter()) {
        let name = service.name.as_str();
        let count = counts.entry(name).or_insert_with(|| {
            order.push(name);
            0
        });
        *count += 1;
    }

    let mut ranked: Vec<ServiceCount> = order
        .into_iter()
        .map(|name| ServiceCount {
            name: name.to_string(),
            count: counts.get(name).copied().unwrap_or_default(),
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

/// Revenue per calendar day for the `days` days ending at `reference_day`,
/// oldest first, days without sales included as zero.
///
/// A window reaching past the earliest representable date starts there.
pub fn daily_trend(sales: &[Sale], days: u32, reference_day: NaiveDate) -> Vec<TrendPoint> {
    if days == 0 {
        return Vec::new();
    }
    let first_day = reference_day
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .unwrap_or(NaiveDate::MIN);

    let mut per_day: HashMap<NaiveDate, Vec<f64>> = HashMap::new();
    for sale in sales {
        if let Some(day) = sale_day(sale) {
            per_day.entry(day).or_default().push(sale.amount);
        }
    }

    first_day
        .iter_days()
        .take_while(|day| *day <= reference_day)
        .map(|day| {
            let amount = per_day
                .get(&day)
                .map(|amounts| money::sum(amounts.iter().copied()))
                .unwrap_or_default();
            TrendPoint {
                date: format_date(day),
                amount,
            }
        })
        .collect()
}

/// Appointments booked on exactly `target`
pub fn appointments_on_date(appointments: &[Appointment], target: NaiveDate) -> Vec<&Appointment> {
    appointments
        .iter()
        .filter(|a| NaiveDate::parse_from_str(&a.date, "%Y-%m-%d").is_ok_and(|day| day == target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ServiceSnapshot;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sale(service: &str, amount: f64, date: &str) -> Sale {
        Sale {
            id: 0,
            customer_name: "Customer".into(),
            service: service.into(),
            amount,
            date: date.into(),
            staff: None,
            appointment_id: None,
            created_at: None,
        }
    }

    fn appointment(date: &str, services: &[&str]) -> Appointment {
        Appointment {
            id: 0,
            customer_name: "Customer".into(),
            phone: None,
            staff: None,
            date: date.into(),
            time: "10:00".into(),
            services: services
                .iter()
                .map(|name| ServiceSnapshot {
                    name: name.to_string(),
                    price: 10.0,
                    duration: 10,
                })
                .collect(),
            total_duration: 10 * services.len() as i64,
            total_price: 10.0 * services.len() as f64,
            created_at: 0,
        }
    }

    #[test]
    fn test_revenue_by_service_scenario() {
        let sales = vec![
            sale("Haircut", 30.0, "2024-03-01"),
            sale("Haircut", 20.0, "2024-03-01"),
            sale("Manicure", 45.0, "2024-03-01"),
        ];

        let by_service = revenue_by_service(&sales);
        let expected: BTreeMap<String, f64> =
            [("Haircut".to_string(), 50.0), ("Manicure".to_string(), 45.0)].into();
        assert_eq!(by_service, expected);
        assert_eq!(total_revenue(&sales), 95.0);
    }

    #[test]
    fn test_revenue_by_service_exact_labels() {
        let sales = vec![
            sale("Haircut, Manicure", 75.0, "2024-03-01"),
            sale("Manicure, Haircut", 75.0, "2024-03-01"),
            sale("", 10.0, "2024-03-01"),
            sale("   ", 10.0, "2024-03-01"),
        ];

        let by_service = revenue_by_service(&sales);
        assert_eq!(by_service.len(), 2);
        assert_eq!(by_service["Haircut, Manicure"], 75.0);
        assert_eq!(by_service["Manicure, Haircut"], 75.0);
    }

    #[test]
    fn test_total_revenue_is_additive() {
        let x = vec![sale("A", 10.25, "2024-03-01"), sale("B", 0.5, "2024-03-02")];
        let y = vec![sale("C", 33.75, "2024-03-03"), sale("D", 0.25, "2024-03-04")];
        let joined: Vec<Sale> = x.iter().chain(y.iter()).cloned().collect();

        assert_eq!(total_revenue(&joined), total_revenue(&x) + total_revenue(&y));
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn test_total_revenue_is_additive_with_cents() {
        let x = vec![sale("A", 0.1, "2024-03-01"), sale("B", 19.99, "2024-03-01")];
        let y = vec![sale("C", 0.2, "2024-03-02"), sale("D", 0.07, "2024-03-02")];
        let joined: Vec<Sale> = x.iter().chain(y.iter()).cloned().collect();

        assert_eq!(total_revenue(&joined), 20.36);
        assert_eq!(
            money::sum([total_revenue(&x), total_revenue(&y)]),
            total_revenue(&joined)
        );
    }

    #[test]
    fn test_period_revenue_buckets() {
        let sales = vec![
            sale("A", 10.0, "2024-03-14"), // reference day (Thursday)
            sale("B", 20.0, "2024-03-11"), // Monday of the same week
            sale("C", 40.0, "2024-03-02"), // same month
            sale("D", 80.0, "2024-02-29"), // previous month
        ];

        let revenue = period_revenue(&sales, d("2024-03-14"));
        assert_eq!(revenue.daily, 10.0);
        assert_eq!(revenue.weekly, 30.0);
        assert_eq!(revenue.monthly, 70.0);
    }

    #[test]
    fn test_period_revenue_is_monotonic_across_month_start() {
        // 2024-03-01 is a Friday; the Monday of its week is in February
        let sales = vec![
            sale("A", 15.0, "2024-02-26"),
            sale("B", 25.0, "2024-02-28"),
            sale("C", 5.0, "2024-03-01"),
        ];

        for reference in ["2024-03-01", "2024-03-02", "2024-03-03", "2024-02-28"] {
            let revenue = period_revenue(&sales, d(reference));
            assert!(revenue.daily <= revenue.weekly, "{reference}: {revenue:?}");
            assert!(revenue.weekly <= revenue.monthly, "{reference}: {revenue:?}");
        }
    }

    #[test]
    fn test_top_services_sorted_and_truncated() {
        let appointments = vec![
            appointment("2024-03-01", &["Haircut", "Manicure"]),
            appointment("2024-03-01", &["Pedicure", "Manicure"]),
            appointment("2024-03-02", &["Haircut", "Facial"]),
            appointment("2024-03-03", &["Manicure"]),
        ];

        let top = top_services(&appointments, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(
            top,
            vec![
                ServiceCount { name: "Manicure".into(), count: 3 },
                ServiceCount { name: "Haircut".into(), count: 2 },
                ServiceCount { name: "Pedicure".into(), count: 1 },
            ]
        );
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));

        // fewer distinct names than n
        assert_eq!(top_services(&appointments, 10).len(), 4);
        assert!(top_services(&appointments, 0).is_empty());
        assert!(top_services(&[], 5).is_empty());
    }

    #[test]
    fn test_top_services_ties_keep_first_seen() {
        let appointments = vec![
            appointment("2024-03-01", &["Facial"]),
            appointment("2024-03-01", &["Haircut"]),
            appointment("2024-03-01", &["Braids"]),
        ];

        let names: Vec<_> = top_services(&appointments, 3)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Facial", "Haircut", "Braids"]);
    }

    #[test]
    fn test_daily_trend_zero_filled_oldest_first() {
        let sales = vec![
            sale("A", 30.0, "2024-03-01"),
            sale("B", 20.0, "2024-03-01"),
            sale("C", 45.0, "2024-02-28"),
            sale("D", 99.0, "2024-02-20"), // outside the window
            sale("E", 99.0, "2024-03-02"), // after the reference day
        ];

        let trend = daily_trend(&sales, 3, d("2024-03-01"));
        assert_eq!(
            trend,
            vec![
                TrendPoint { date: "2024-02-28".into(), amount: 45.0 },
                TrendPoint { date: "2024-02-29".into(), amount: 0.0 },
                TrendPoint { date: "2024-03-01".into(), amount: 50.0 },
            ]
        );
        assert!(daily_trend(&sales, 0, d("2024-03-01")).is_empty());
    }

    #[test]
    fn test_daily_trend_stops_at_earliest_date() {
        let reference = NaiveDate::MIN + Duration::days(2);
        let trend = daily_trend(&[], u32::MAX, reference);
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].date, format_date(NaiveDate::MIN));
        assert_eq!(trend[2].date, format_date(reference));
    }

    #[test]
    fn test_appointments_on_date_exact_match() {
        let appointments = vec![
            appointment("2024-03-01", &["Haircut"]),
            appointment("2024-03-02", &["Manicure"]),
            appointment("2024-03-01", &["Facial"]),
        ];

        let on_day = appointments_on_date(&appointments, d("2024-03-01"));
        assert_eq!(on_day.len(), 2);
        assert!(on_day.iter().all(|a| a.date == "2024-03-01"));
        assert!(appointments_on_date(&appointments, d("2024-03-03")).is_empty());
    }

    #[test]
    fn test_aggregations_are_idempotent() {
        let sales = vec![
            sale("Haircut", 30.0, "2024-03-01"),
            sale("Manicure", 45.5, "2024-02-27"),
        ];
        let appointments = vec![appointment("2024-03-01", &["Haircut", "Manicure"])];
        let before = sales.clone();
        let reference = d("2024-03-01");

        assert_eq!(total_revenue(&sales), total_revenue(&sales));
        assert_eq!(period_revenue(&sales, reference), period_revenue(&sales, reference));
        assert_eq!(revenue_by_service(&sales), revenue_by_service(&sales));
        assert_eq!(top_services(&appointments, 5), top_services(&appointments, 5));
        assert_eq!(daily_trend(&sales, 7, reference), daily_trend(&sales, 7, reference));
        assert_eq!(
            appointments_on_date(&appointments, reference),
            appointments_on_date(&appointments, reference)
        );
        assert_eq!(sales, before);
    }
}
