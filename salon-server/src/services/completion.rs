//! Appointment completion
//!
//! Converts a booked [`Appointment`] into a [`Sale`]:
//!
//! 1. read the booking and validate it (at least one service, positive total)
//! 2. insert the sale, linked back through `appointment_id`
//! 3. delete the appointment
//!
//! All three steps share one SQLite transaction. Any failure rolls back,
//! so an appointment is either still booked or converted into exactly one
//! sale. A delete that matches no row (completed or removed concurrently)
//! also rolls back.

use chrono::NaiveDate;
use shared::models::{Appointment, Sale};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

use crate::db::repository::sale::SaleDraft;
use crate::db::repository::{RepoError, appointment, sale};
use crate::utils::time::format_date;
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{reason}")]
    Validation { code: ErrorCode, reason: String },

    #[error("Appointment {0} not found")]
    AppointmentNotFound(i64),

    #[error("Appointment {0} has already been completed")]
    AlreadyCompleted(i64),

    #[error("Sale could not be recorded for appointment {appointment_id}: {source}")]
    SaleInsertFailed {
        appointment_id: i64,
        #[source]
        source: RepoError,
    },

    #[error(
        "Appointment {appointment_id} could not be removed, sale rolled back: {source}"
    )]
    AppointmentRemovalFailed {
        appointment_id: i64,
        #[source]
        source: RepoError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        let message = err.to_string();
        match err {
            CompletionError::Validation { code, .. } => AppError::with_message(code, message),
            CompletionError::AppointmentNotFound(id) => {
                AppError::with_message(ErrorCode::AppointmentNotFound, message)
                    .with_detail("appointment_id", id)
            }
            CompletionError::AlreadyCompleted(id) => {
                AppError::conflict(message).with_detail("appointment_id", id)
            }
            CompletionError::SaleInsertFailed { appointment_id, .. } => {
                AppError::with_message(ErrorCode::CompletionSaleFailed, message)
                    .with_detail("appointment_id", appointment_id)
            }
            CompletionError::AppointmentRemovalFailed { appointment_id, .. } => {
                AppError::with_message(ErrorCode::CompletionReconciliationRequired, message)
                    .with_detail("appointment_id", appointment_id)
            }
            CompletionError::Storage(_) => AppError::database(message),
        }
    }
}

/// Reject appointments that cannot become revenue
pub fn validate(appointment: &Appointment) -> Result<(), CompletionError> {
    if appointment.services.is_empty() {
        return Err(CompletionError::Validation {
            code: ErrorCode::AppointmentEmpty,
            reason: format!("Appointment {} has no services", appointment.id),
        });
    }
    if !(appointment.total_price > 0.0) {
        return Err(CompletionError::Validation {
            code: ErrorCode::AppointmentInvalidTotal,
            reason: format!(
                "Appointment {} total must be positive, got {}",
                appointment.id, appointment.total_price
            ),
        });
    }
    Ok(())
}

/// Sale that completing `appointment` on `date` records
pub fn build_sale_draft(appointment: &Appointment, date: NaiveDate) -> SaleDraft {
    SaleDraft {
        customer_name: appointment.customer_name.clone(),
        service: appointment.service_label(),
        amount: appointment.total_price,
        date: format_date(date),
        staff: appointment
            .staff
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        appointment_id: Some(appointment.id),
    }
}

/// Complete the appointment `id` on `date` (the business day, not the booked day).
///
/// The booking is read inside the transaction and the sale is built from
/// that row, so an edit committed before completion is what gets recorded.
pub async fn complete_appointment(
    pool: &SqlitePool,
    id: i64,
    date: NaiveDate,
) -> Result<Sale, CompletionError> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let booked = match appointment::find_by_id_in(&mut *tx, id).await {
        Ok(Some(booked)) => booked,
        Ok(None) => {
            let completed = sale::find_by_appointment_in(&mut *tx, id).await;
            rollback(tx, id).await;
            return Err(match completed? {
                Some(_) => CompletionError::AlreadyCompleted(id),
                None => CompletionError::AppointmentNotFound(id),
            });
        }
        Err(e) => {
            rollback(tx, id).await;
            return Err(e.into());
        }
    };

    if let Err(e) = validate(&booked) {
        rollback(tx, id).await;
        return Err(e);
    }
    let draft = build_sale_draft(&booked, date);

    let recorded = match sale::insert(&mut *tx, &draft).await {
        Ok(recorded) => recorded,
        Err(RepoError::Duplicate(_)) => {
            rollback(tx, id).await;
            return Err(CompletionError::AlreadyCompleted(id));
        }
        Err(source) => {
            tracing::warn!(appointment_id = id, error = %source, "Completion aborted: sale insert failed");
            rollback(tx, id).await;
            return Err(CompletionError::SaleInsertFailed {
                appointment_id: id,
                source,
            });
        }
    };

    match appointment::delete_in(&mut *tx, id).await {
        Ok(true) => {}
        Ok(false) => {
            rollback(tx, id).await;
            return Err(CompletionError::AppointmentNotFound(id));
        }
        Err(source) => {
            tracing::error!(
                appointment_id = id,
                sale_id = recorded.id,
                error = %source,
                "Completion aborted: appointment removal failed after the sale insert"
            );
            rollback(tx, id).await;
            return Err(CompletionError::AppointmentRemovalFailed {
                appointment_id: id,
                source,
            });
        }
    }

    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        appointment_id = id,
        sale_id = recorded.id,
        amount = recorded.amount,
        date = %recorded.date,
        "Appointment completed"
    );
    Ok(recorded)
}

async fn rollback(tx: Transaction<'static, Sqlite>, appointment_id: i64) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(appointment_id, error = %e, "Completion rollback failed");
    }
}
