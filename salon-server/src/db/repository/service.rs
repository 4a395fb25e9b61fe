//! Service Repository (catalog)

use super::{RepoError, RepoResult};
use shared::models::{Service, ServiceCreate, ServiceUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, name, price, duration, created_at, updated_at FROM service";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Service>> {
    let services = sqlx::query_as::<_, Service>(&format!("{SELECT} ORDER BY name COLLATE NOCASE"))
        .fetch_all(pool)
        .await?;
    Ok(services)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Service>> {
    let service = sqlx::query_as::<_, Service>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(service)
}

/// Case-insensitive lookup
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Service>> {
    let service =
        sqlx::query_as::<_, Service>(&format!("{SELECT} WHERE name = ? COLLATE NOCASE LIMIT 1"))
            .bind(name)
            .fetch_optional(pool)
            .await?;
    Ok(service)
}

/// Resolve ids in the given order; repeated ids yield repeated services
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Service>> {
    let mut services = Vec::with_capacity(ids.len());
    for &id in ids {
        let service = find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service {id} not found")))?;
        services.push(service);
    }
    Ok(services)
}

pub async fn create(pool: &SqlitePool, data: ServiceCreate) -> RepoResult<Service> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO service (id, name, price, duration, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.price)
    .bind(data.duration)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| duplicate_name(e, &data.name))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create service".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ServiceUpdate) -> RepoResult<Service> {
    let name = data.name.as_deref().map(str::trim);
    let rows = sqlx::query(
        "UPDATE service SET name = COALESCE(?1, name), price = COALESCE(?2, price), duration = COALESCE(?3, duration), updated_at = ?4 WHERE id = ?5",
    )
    .bind(name)
    .bind(data.price)
    .bind(data.duration)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| duplicate_name(e, name.unwrap_or_default()))?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Service {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Service {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM service WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

fn duplicate_name(err: sqlx::Error, name: &str) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Service '{}' already exists", name.trim())),
        other => other,
    }
}
