//! Sales API Handlers

use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    response::Response,
};
use http::header;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::sale::{self, SaleDraft};
use crate::export::{export_filename, sales_to_csv};
use crate::stats::Period;
use crate::stats::period::filter_sales;
use crate::utils::money;
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, normalize_optional, validate_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Sale, SaleCreate, SaleQuery};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// daily | weekly | monthly | all (default)
    pub period: Option<String>,
}

/// GET /api/sales - newest first, optional inclusive `from`/`to`
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SaleQuery>,
) -> AppResult<Json<Vec<Sale>>> {
    for bound in [query.from.as_deref(), query.to.as_deref()].into_iter().flatten() {
        parse_date(bound)?;
    }
    let sales = sale::find_in_range(state.pool(), query.from.as_deref(), query.to.as_deref()).await?;
    Ok(Json(sales))
}

/// GET /api/sales/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Sale>> {
    let found = sale::find_by_id(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::SaleNotFound, format!("Sale {id} not found"))
            .with_detail("sale_id", id)
    })?;
    Ok(Json(found))
}

/// POST /api/sales - manual entry (walk-ins, products)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SaleCreate>,
) -> AppResult<Json<Sale>> {
    validate_required_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.service, "service", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.staff, "staff", MAX_NAME_LEN)?;
    validate_amount(payload.amount)?;
    parse_date(&payload.date)?;

    let mut draft = SaleDraft::from(payload);
    draft.customer_name = draft.customer_name.trim().to_string();
    draft.service = draft.service.trim().to_string();
    draft.staff = normalize_optional(draft.staff);

    let recorded = sale::create(state.pool(), &draft).await?;

    tracing::info!(sale_id = recorded.id, amount = recorded.amount, operator = %user.email, "Manual sale recorded");
    Ok(Json(recorded))
}

/// GET /api/sales/export?period= - CSV attachment
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let period: Period = match query.period.as_deref() {
        Some(p) => p.parse().map_err(AppError::validation)?,
        None => Period::All,
    };
    let today = state.today();

    let sales = sale::find_all(state.pool()).await?;
    let selected = filter_sales(&sales, period, today);
    let csv = sales_to_csv(&selected, &state.config.currency);
    let filename = export_filename(period, today);

    let total = money::sum(selected.iter().map(|s| s.amount));
    tracing::info!(
        period = %period,
        rows = selected.len(),
        total = %money::format_amount(&state.config.currency, total),
        "Sales exported"
    );

    Response::builder()
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::export_failed(format!("Failed to build export response: {e}")))
}
