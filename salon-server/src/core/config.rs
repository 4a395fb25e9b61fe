use chrono_tz::Tz;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | DATABASE_PATH | WORK_DIR/salon.db | SQLite file |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | TIMEZONE | Asia/Kuala_Lumpur | business timezone for "today" |
/// | CURRENCY | RM | currency prefix in exports |
/// | LOG_LEVEL | info | tracing level |
/// | LOG_DIR | - | daily rolling log files |
/// | ADMIN_EMAIL | admin@salon.local | back-office login |
/// | ADMIN_PASSWORD | admin | back-office password |
/// | JWT_SECRET | generated (dev only) | HS256 signing key, 32+ chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
///
/// ```ignore
/// WORK_DIR=/srv/salon HTTP_PORT=8080 cargo run -p salon-server
/// ```
#[derive(Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Business timezone: "today", week and month boundaries
    pub timezone: Tz,
    pub currency: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub admin_email: String,
    pub admin_password: String,
    pub jwt: JwtConfig,
    pub request_timeout_ms: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("work_dir", &self.work_dir)
            .field("database_path", &self.database_path)
            .field("http_port", &self.http_port)
            .field("environment", &self.environment)
            .field("timezone", &self.timezone)
            .field("currency", &self.currency)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("admin_email", &self.admin_email)
            .field("jwt_expiration_minutes", &self.jwt.expiration_minutes)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load from process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an explicit key/value map (tests)
    pub fn from_map(vars: &HashMap<&str, &str>) -> AppResult<Self> {
        Self::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let parse_or = |key: &str, default: u64| -> AppResult<u64> {
            match get(key) {
                Some(v) => v.parse().map_err(|_| config_error(key, &v)),
                None => Ok(default),
            }
        };

        let work_dir = get("WORK_DIR").unwrap_or_else(|| "./data".into());
        let database_path = get("DATABASE_PATH").unwrap_or_else(|| {
            PathBuf::from(&work_dir)
                .join("salon.db")
                .to_string_lossy()
                .into_owned()
        });

        let http_port = u16::try_from(parse_or("HTTP_PORT", 3000)?)
            .map_err(|_| AppError::with_message(ErrorCode::ConfigError, "HTTP_PORT out of range"))?;

        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let is_production = environment == "production";

        let tz_name = get("TIMEZONE").unwrap_or_else(|| "Asia/Kuala_Lumpur".into());
        let timezone: Tz = tz_name
            .parse()
            .map_err(|_| config_error("TIMEZONE", &tz_name))?;

        let admin_password = match get("ADMIN_PASSWORD") {
            Some(p) => p,
            None if is_production => {
                return Err(AppError::with_message(
                    ErrorCode::ConfigError,
                    "ADMIN_PASSWORD must be set in production",
                ));
            }
            None => {
                tracing::warn!("ADMIN_PASSWORD not set, using the default development password");
                "admin".into()
            }
        };

        let jwt_minutes = parse_or("JWT_EXPIRATION_MINUTES", 1440)? as i64;
        let jwt = JwtConfig::new(get("JWT_SECRET"), jwt_minutes, is_production)
            .map_err(|e| AppError::with_message(ErrorCode::ConfigError, e.to_string()))?;

        Ok(Self {
            work_dir,
            database_path,
            http_port,
            environment,
            timezone,
            currency: get("CURRENCY").unwrap_or_else(|| "RM".into()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: get("LOG_DIR"),
            admin_email: get("ADMIN_EMAIL").unwrap_or_else(|| "admin@salon.local".into()),
            admin_password,
            jwt,
            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 30_000)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Create the work directory (and the database's parent directory)
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        if let Some(parent) = PathBuf::from(&self.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

fn config_error(key: &str, value: &str) -> AppError {
    AppError::with_message(ErrorCode::ConfigError, format!("Invalid {key}: {value}"))
        .with_detail("key", key)
}
