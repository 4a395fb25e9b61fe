//! Appointment Repository
//!
//! Service snapshots live in the `services_json` column. Totals are
//! recomputed from the snapshots on every write and never taken from input.

use super::{RepoError, RepoResult};
use shared::models::{Appointment, AppointmentTotals, ServiceSnapshot};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const SELECT: &str = "SELECT id, customer_name, phone, staff, date, time, services_json, total_duration, total_price, created_at FROM appointment";

/// Raw row; `services_json` is decoded into [`Appointment::services`]
#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: i64,
    customer_name: String,
    phone: Option<String>,
    staff: Option<String>,
    date: String,
    time: String,
    services_json: String,
    total_duration: i64,
    total_price: f64,
    created_at: i64,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RepoError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let services: Vec<ServiceSnapshot> = serde_json::from_str(&row.services_json)?;
        Ok(Appointment {
            id: row.id,
            customer_name: row.customer_name,
            phone: row.phone,
            staff: row.staff,
            date: row.date,
            time: row.time,
            services,
            total_duration: row.total_duration,
            total_price: row.total_price,
            created_at: row.created_at,
        })
    }
}

/// Everything a booking stores apart from id and derived totals
#[derive(Debug, Clone)]
pub struct AppointmentDraft {
    pub customer_name: String,
    pub phone: Option<String>,
    pub staff: Option<String>,
    pub date: String,
    pub time: String,
    pub services: Vec<ServiceSnapshot>,
}

impl From<&Appointment> for AppointmentDraft {
    fn from(appointment: &Appointment) -> Self {
        Self {
            customer_name: appointment.customer_name.clone(),
            phone: appointment.phone.clone(),
            staff: appointment.staff.clone(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
            services: appointment.services.clone(),
        }
    }
}

fn decode_all(rows: Vec<AppointmentRow>) -> RepoResult<Vec<Appointment>> {
    rows.into_iter().map(Appointment::try_from).collect()
}

/// All appointments, soonest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!("{SELECT} ORDER BY date, time, id"))
        .fetch_all(pool)
        .await?;
    decode_all(rows)
}

/// Appointments whose date falls in `[from, to]` (inclusive, YYYY-MM-DD)
pub async fn find_in_range(
    pool: &SqlitePool,
    from: Option<&str>,
    to: Option<&str>,
) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "{SELECT} WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2) ORDER BY date, time, id"
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    decode_all(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Appointment>> {
    let mut conn = pool.acquire().await?;
    find_by_id_in(&mut *conn, id).await
}

/// Read on an existing connection, so a transaction sees the row it changes
pub async fn find_by_id_in(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Appointment>> {
    let row = sqlx::query_as::<_, AppointmentRow>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.map(Appointment::try_from).transpose()
}

pub async fn create(pool: &SqlitePool, draft: AppointmentDraft) -> RepoResult<Appointment> {
    let id = snowflake_id();
    let totals = AppointmentTotals::from_services(&draft.services);
    let services_json = serde_json::to_string(&draft.services)?;

    sqlx::query(
        "INSERT INTO appointment (id, customer_name, phone, staff, date, time, services_json, total_duration, total_price, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&draft.customer_name)
    .bind(&draft.phone)
    .bind(&draft.staff)
    .bind(&draft.date)
    .bind(&draft.time)
    .bind(&services_json)
    .bind(totals.total_duration)
    .bind(totals.total_price)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create appointment".into()))
}

/// Replace every editable field; totals follow the new service list
pub async fn update(pool: &SqlitePool, id: i64, draft: AppointmentDraft) -> RepoResult<Appointment> {
    let totals = AppointmentTotals::from_services(&draft.services);
    let services_json = serde_json::to_string(&draft.services)?;

    let rows = sqlx::query(
        "UPDATE appointment SET customer_name = ?, phone = ?, staff = ?, date = ?, time = ?, services_json = ?, total_duration = ?, total_price = ? WHERE id = ?",
    )
    .bind(&draft.customer_name)
    .bind(&draft.phone)
    .bind(&draft.staff)
    .bind(&draft.date)
    .bind(&draft.time)
    .bind(&services_json)
    .bind(totals.total_duration)
    .bind(totals.total_price)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Appointment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Appointment {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut conn = pool.acquire().await?;
    delete_in(&mut *conn, id).await
}

/// Delete on an existing connection (usually a transaction).
/// Returns false when no row matched.
pub async fn delete_in(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM appointment WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn snapshot(name: &str, price: f64, duration: i64) -> ServiceSnapshot {
        ServiceSnapshot {
            name: name.into(),
            price,
            duration,
        }
    }

    fn draft(date: &str, services: Vec<ServiceSnapshot>) -> AppointmentDraft {
        AppointmentDraft {
            customer_name: "Aina".into(),
            phone: Some("012-3456789".into()),
            staff: Some("Mei".into()),
            date: date.into(),
            time: "10:00".into(),
            services,
        }
    }

    #[tokio::test]
    async fn test_create_derives_totals() {
        let db = DbService::in_memory().await.unwrap();
        let created = create(
            &db.pool,
            draft(
                "2024-03-01",
                vec![snapshot("Haircut", 30.0, 30), snapshot("Manicure", 45.0, 45)],
            ),
        )
        .await
        .unwrap();

        assert_eq!(created.total_price, 75.0);
        assert_eq!(created.total_duration, 75);
        assert_eq!(created.services.len(), 2);

        let found = find_by_id(&db.pool, created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_update_recomputes_totals() {
        let db = DbService::in_memory().await.unwrap();
        let created = create(&db.pool, draft("2024-03-01", vec![snapshot("Haircut", 30.0, 30)]))
            .await
            .unwrap();

        let mut changed = AppointmentDraft::from(&created);
        changed.services.push(snapshot("Hair Wash", 12.5, 15));
        let updated = update(&db.pool, created.id, changed).await.unwrap();

        assert_eq!(updated.total_price, 42.5);
        assert_eq!(updated.total_duration, 45);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_find_in_range_inclusive() {
        let db = DbService::in_memory().await.unwrap();
        for date in ["2024-02-29", "2024-03-01", "2024-03-02", "2024-03-03"] {
            create(&db.pool, draft(date, vec![snapshot("Haircut", 30.0, 30)]))
                .await
                .unwrap();
        }

        let found = find_in_range(&db.pool, Some("2024-03-01"), Some("2024-03-02"))
            .await
            .unwrap();
        let dates: Vec<_> = found.iter().map(|a| a.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02"]);

        let open_ended = find_in_range(&db.pool, Some("2024-03-02"), None).await.unwrap();
        assert_eq!(open_ended.len(), 2);
        assert_eq!(find_in_range(&db.pool, None, None).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_rows() {
        let db = DbService::in_memory().await.unwrap();
        let created = create(&db.pool, draft("2024-03-01", vec![snapshot("Haircut", 30.0, 30)]))
            .await
            .unwrap();

        assert!(delete(&db.pool, created.id).await.unwrap());
        assert!(!delete(&db.pool, created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_services_json_is_reported() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO appointment (id, customer_name, date, time, services_json, total_duration, total_price, created_at) VALUES (1, 'X', '2024-03-01', '10:00', 'not json', 0, 0, 0)",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        let err = find_by_id(&db.pool, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::Database(_)));
    }
}
