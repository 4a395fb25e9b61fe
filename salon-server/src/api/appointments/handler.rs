//! Appointment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::appointment::AppointmentDraft;
use crate::db::repository::{RepoError, appointment, service};
use crate::services::completion;
use crate::stats::appointments_on_date;
use crate::utils::time::{parse_date, parse_date_or, parse_time};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_optional, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Appointment, AppointmentComplete, AppointmentCreate, AppointmentQuery, AppointmentUpdate,
    Sale, ServiceSnapshot,
};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::AppointmentNotFound, format!("Appointment {id} not found"))
        .with_detail("appointment_id", id)
}

async fn load(pool: &SqlitePool, id: i64) -> AppResult<Appointment> {
    appointment::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Snapshot the current catalog entries, keeping the requested order
async fn capture_services(pool: &SqlitePool, service_ids: &[i64]) -> AppResult<Vec<ServiceSnapshot>> {
    if service_ids.is_empty() {
        return Err(AppError::new(ErrorCode::AppointmentEmpty));
    }

    let services = service::find_by_ids(pool, service_ids)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ServiceNotFound, msg),
            other => other.into(),
        })?;

    Ok(services.iter().map(ServiceSnapshot::from).collect())
}

/// Shared field checks for create and update
fn validate_draft(draft: &AppointmentDraft) -> AppResult<()> {
    validate_required_text(&draft.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_optional_text(&draft.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&draft.staff, "staff", MAX_NAME_LEN)?;
    parse_date(&draft.date)?;
    parse_time(&draft.time)?;
    Ok(())
}

/// GET /api/appointments
///
/// `?date=YYYY-MM-DD` returns that day's bookings, `?from=&to=` an
/// inclusive range, neither returns everything. Soonest first.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    if let Some(date) = query.date.as_deref() {
        let day = parse_date(date)?;
        let all = appointment::find_all(state.pool()).await?;
        let on_day: Vec<Appointment> = appointments_on_date(&all, day).into_iter().cloned().collect();
        return Ok(Json(on_day));
    }

    for bound in [query.from.as_deref(), query.to.as_deref()].into_iter().flatten() {
        parse_date(bound)?;
    }
    let appointments =
        appointment::find_in_range(state.pool(), query.from.as_deref(), query.to.as_deref())
            .await?;
    Ok(Json(appointments))
}

/// GET /api/appointments/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Appointment>> {
    Ok(Json(load(state.pool(), id).await?))
}

/// POST /api/appointments
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AppointmentCreate>,
) -> AppResult<Json<Appointment>> {
    let mut draft = AppointmentDraft {
        customer_name: payload.customer_name.trim().to_string(),
        phone: normalize_optional(payload.phone),
        staff: normalize_optional(payload.staff),
        date: payload.date,
        time: payload.time,
        services: Vec::new(),
    };
    validate_draft(&draft)?;
    draft.services = capture_services(state.pool(), &payload.service_ids).await?;

    let created = appointment::create(state.pool(), draft).await?;

    tracing::info!(
        appointment_id = created.id,
        date = %created.date,
        total_price = created.total_price,
        operator = %user.email,
        "Appointment booked"
    );
    Ok(Json(created))
}

/// PUT /api/appointments/{id}
///
/// Absent fields keep their value; a blank phone or staff clears it.
/// `service_ids` re-captures snapshots from the current catalog.
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<AppointmentUpdate>,
) -> AppResult<Json<Appointment>> {
    let existing = load(state.pool(), id).await?;
    let mut draft = AppointmentDraft::from(&existing);

    if let Some(name) = payload.customer_name {
        draft.customer_name = name.trim().to_string();
    }
    if let Some(phone) = payload.phone {
        draft.phone = normalize_optional(Some(phone));
    }
    if let Some(staff) = payload.staff {
        draft.staff = normalize_optional(Some(staff));
    }
    if let Some(date) = payload.date {
        draft.date = date;
    }
    if let Some(time) = payload.time {
        draft.time = time;
    }
    validate_draft(&draft)?;

    if let Some(service_ids) = payload.service_ids.as_deref() {
        draft.services = capture_services(state.pool(), service_ids).await?;
    }

    let updated = appointment::update(state.pool(), id, draft)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;

    tracing::info!(appointment_id = id, operator = %user.email, "Appointment updated");
    Ok(Json(updated))
}

/// DELETE /api/appointments/{id} - cancel without recording a sale
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !appointment::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }

    tracing::info!(appointment_id = id, operator = %user.email, "Appointment cancelled");
    Ok(Json(true))
}

/// POST /api/appointments/{id}/complete[?date=YYYY-MM-DD]
///
/// The sale is dated today in the business timezone unless `date` is given.
pub async fn complete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Query(query): Query<AppointmentComplete>,
) -> AppResult<Json<Sale>> {
    let completion_date = parse_date_or(query.date.as_deref(), state.today())?;
    let recorded = completion::complete_appointment(state.pool(), id, completion_date).await?;

    tracing::info!(
        appointment_id = id,
        sale_id = recorded.id,
        operator = %user.email,
        "Appointment completed via API"
    );
    Ok(Json(recorded))
}
