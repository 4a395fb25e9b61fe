//! Statistics API Handlers
//!
//! Data is fetched once per request and handed to the pure functions in
//! [`crate::stats`]; nothing here computes revenue itself.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::{appointment, sale};
use crate::stats::period::filter_sales;
use crate::stats::{
    Period, PeriodRevenue, ServiceCount, TrendPoint, appointments_on_date, daily_trend,
    period_revenue, revenue_by_service, top_services, total_revenue,
};
use crate::utils::money;
use crate::utils::time::format_date;
use crate::utils::{AppError, AppResult};
use shared::models::{Appointment, Sale};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    /// Business day the figures refer to
    pub date: String,
    pub revenue: PeriodRevenue,
    pub total_revenue: f64,
    pub sales_count: usize,
    pub today_appointments: Vec<Appointment>,
    pub recent_sales: Vec<Sale>,
}

/// Revenue per service label with a chart colour
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRevenue {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    pub total_revenue: f64,
    pub revenue_by_service: Vec<ServiceRevenue>,
    pub top_services: Vec<ServiceCount>,
    pub daily_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesReportResponse {
    pub period: Period,
    pub items: Vec<Sale>,
    pub total: usize,
    pub total_amount: f64,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_top")]
    pub top: usize,
}

#[derive(Debug, Deserialize)]
pub struct SalesReportQuery {
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_days() -> u32 {
    7
}

fn default_top() -> usize {
    5
}

fn default_period() -> String {
    "monthly".to_string()
}

fn default_page() -> usize {
    1
}

const MAX_TREND_DAYS: u32 = 366;
const MAX_TOP: usize = 50;
const RECENT_SALES: usize = 5;
const REPORT_PAGE_SIZE: usize = 10;

/// Predefined colors for the revenue-by-service chart
const CATEGORY_COLORS: &[&str] = &[
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6",
    "#EC4899", "#06B6D4", "#84CC16", "#F97316", "#6366F1",
];

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/statistics/dashboard
pub async fn get_dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardResponse>> {
    let today = state.today();
    let sales = sale::find_all(state.pool()).await?;
    let appointments = appointment::find_all(state.pool()).await?;

    let today_appointments = appointments_on_date(&appointments, today)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(DashboardResponse {
        date: format_date(today),
        revenue: period_revenue(&sales, today),
        total_revenue: total_revenue(&sales),
        sales_count: sales.len(),
        today_appointments,
        recent_sales: sales.iter().take(RECENT_SALES).cloned().collect(),
    }))
}

/// GET /api/statistics/analytics?days=7&top=5
pub async fn get_analytics(
    State(state): State<ServerState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<AnalyticsResponse>> {
    let days = query.days.clamp(1, MAX_TREND_DAYS);
    let top = query.top.clamp(1, MAX_TOP);
    let today = state.today();

    let sales = sale::find_all(state.pool()).await?;
    let appointments = appointment::find_all(state.pool()).await?;

    let mut by_service: Vec<(String, f64)> = revenue_by_service(&sales).into_iter().collect();
    // stable: equal amounts stay in name order
    by_service.sort_by(|a, b| b.1.total_cmp(&a.1));

    let revenue_by_service = by_service
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| ServiceRevenue {
            name,
            value,
            color: CATEGORY_COLORS
                .get(i % CATEGORY_COLORS.len())
                .unwrap_or(&"#6B7280")
                .to_string(),
        })
        .collect();

    Ok(Json(AnalyticsResponse {
        total_revenue: total_revenue(&sales),
        revenue_by_service,
        top_services: top_services(&appointments, top),
        daily_trend: daily_trend(&sales, days, today),
    }))
}

/// GET /api/statistics/sales-report?period=monthly&page=1
pub async fn get_sales_report(
    State(state): State<ServerState>,
    Query(query): Query<SalesReportQuery>,
) -> AppResult<Json<SalesReportResponse>> {
    let period: Period = query.period.parse().map_err(AppError::validation)?;
    let page = query.page.max(1);

    let sales = sale::find_all(state.pool()).await?;
    let selected = filter_sales(&sales, period, state.today());

    let total = selected.len();
    let total_amount = money::sum(selected.iter().map(|s| s.amount));
    let total_pages = total.div_ceil(REPORT_PAGE_SIZE);
    let items = selected
        .into_iter()
        .skip((page - 1).saturating_mul(REPORT_PAGE_SIZE))
        .take(REPORT_PAGE_SIZE)
        .cloned()
        .collect();

    Ok(Json(SalesReportResponse {
        period,
        items,
        total,
        total_amount,
        page,
        page_size: REPORT_PAGE_SIZE,
        total_pages,
    }))
}
