//! Service catalog handlers
//!
//! Appointments keep their own snapshots, so edits and deletes here never
//! touch existing bookings.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, service};
use crate::utils::validation::{
    MAX_NAME_LEN, validate_duration, validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Service, ServiceCreate, ServiceUpdate};

/// Catalog-specific codes for repository failures
fn catalog_error(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ServiceNameExists, msg),
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ServiceNotFound, msg),
        other => other.into(),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ServiceNotFound, format!("Service {id} not found"))
        .with_detail("service_id", id)
}

/// GET /api/services - catalog ordered by name
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Service>>> {
    let services = service::find_all(state.pool()).await?;
    Ok(Json(services))
}

/// GET /api/services/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Service>> {
    let found = service::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// POST /api/services
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ServiceCreate>,
) -> AppResult<Json<Service>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_price(payload.price)?;
    validate_duration(payload.duration)?;

    let created = service::create(state.pool(), payload)
        .await
        .map_err(catalog_error)?;

    tracing::info!(service_id = created.id, name = %created.name, operator = %user.email, "Service created");
    Ok(Json(created))
}

/// PUT /api/services/{id} - partial update
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceUpdate>,
) -> AppResult<Json<Service>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(duration) = payload.duration {
        validate_duration(duration)?;
    }

    let updated = service::update(state.pool(), id, payload)
        .await
        .map_err(catalog_error)?;

    tracing::info!(service_id = id, operator = %user.email, "Service updated");
    Ok(Json(updated))
}

/// DELETE /api/services/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !service::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }

    tracing::info!(service_id = id, operator = %user.email, "Service deleted");
    Ok(Json(true))
}
