//! Sale Repository
//!
//! Sales are append-only: there is no update, and deletion is not exposed.

use super::{RepoError, RepoResult};
use shared::models::{Sale, SaleCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, customer_name, service, amount, date, staff, appointment_id, created_at";

/// Sale about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub customer_name: String,
    pub service: String,
    pub amount: f64,
    pub date: String,
    pub staff: Option<String>,
    pub appointment_id: Option<i64>,
}

impl From<SaleCreate> for SaleDraft {
    fn from(data: SaleCreate) -> Self {
        Self {
            customer_name: data.customer_name,
            service: data.service,
            amount: data.amount,
            date: data.date,
            staff: data.staff,
            appointment_id: None,
        }
    }
}

/// All sales, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Sale>> {
    find_in_range(pool, None, None).await
}

/// Sales whose date falls in `[from, to]` (inclusive, YYYY-MM-DD), newest first
pub async fn find_in_range(
    pool: &SqlitePool,
    from: Option<&str>,
    to: Option<&str>,
) -> RepoResult<Vec<Sale>> {
    let sales = sqlx::query_as::<_, Sale>(&format!(
        "SELECT {COLUMNS} FROM sale WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2) ORDER BY date DESC, created_at DESC, id DESC"
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(sales)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(&format!("SELECT {COLUMNS} FROM sale WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(sale)
}

pub async fn find_by_appointment(pool: &SqlitePool, appointment_id: i64) -> RepoResult<Option<Sale>> {
    let mut conn = pool.acquire().await?;
    find_by_appointment_in(&mut *conn, appointment_id).await
}

pub async fn find_by_appointment_in(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> RepoResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(&format!(
        "SELECT {COLUMNS} FROM sale WHERE appointment_id = ?"
    ))
    .bind(appointment_id)
    .fetch_optional(conn)
    .await?;
    Ok(sale)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, draft: &SaleDraft) -> RepoResult<Sale> {
    let mut conn = pool.acquire().await?;
    insert(&mut *conn, draft).await
}

/// Insert on an existing connection (usually a transaction)
pub async fn insert(conn: &mut SqliteConnection, draft: &SaleDraft) -> RepoResult<Sale> {
    let sale = sqlx::query_as::<_, Sale>(&format!(
        "INSERT INTO sale (id, customer_name, service, amount, date, staff, appointment_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    ))
    .bind(snowflake_id())
    .bind(&draft.customer_name)
    .bind(&draft.service)
    .bind(draft.amount)
    .bind(&draft.date)
    .bind(&draft.staff)
    .bind(draft.appointment_id)
    .bind(now_millis())
    .fetch_one(conn)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Appointment {} already has a sale",
            draft.appointment_id.unwrap_or_default()
        )),
        other => other,
    })?;
    Ok(sale)
}
