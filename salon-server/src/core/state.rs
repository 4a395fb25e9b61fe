use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::{AdminAccount, JwtService};
use crate::clock::{Clock, SystemClock};
use crate::core::Config;
use crate::db::DbService;
use crate::utils::time::business_date;
use crate::utils::{AppError, AppResult};

/// Server state - shared handles cloned into every request
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | immutable configuration |
/// | db | DbService | SQLite pool |
/// | jwt_service | Arc<JwtService> | token issue / validation |
/// | admin | Arc<AdminAccount> | back-office credentials |
/// | clock | Arc<dyn Clock> | source of "now" |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub admin: Arc<AdminAccount>,
    pub clock: Arc<dyn Clock>,
}

impl ServerState {
    /// Open the database under the work directory and use the wall clock
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db = DbService::new(&config.database_path).await?;
        Self::with_parts(config.clone(), db, Arc::new(SystemClock))
    }

    /// Assemble from existing parts (tests pin the clock and use in-memory SQLite)
    pub fn with_parts(config: Config, db: DbService, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let admin = AdminAccount::new(&config.admin_email, &config.admin_password)
            .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
        let jwt_service = JwtService::with_config(config.jwt.clone());

        Ok(Self {
            config,
            db,
            jwt_service: Arc::new(jwt_service),
            admin: Arc::new(admin),
            clock,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// Current calendar day in the business timezone
    pub fn today(&self) -> NaiveDate {
        business_date(self.clock.now(), self.config.timezone)
    }
}
