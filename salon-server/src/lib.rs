//! Salon back office server
//!
//! # Overview
//!
//! - **Catalog** (`api/services`): services with price and duration
//! - **Appointments** (`api/appointments`): bookings holding service snapshots
//! - **Completion** (`services/completion`): appointment -> sale, atomically
//! - **Statistics** (`stats`): pure revenue aggregation over sales
//! - **Export** (`export`): CSV download of period-filtered sales
//!
//! # Layout
//!
//! ```text
//! salon-server/src/
//! ├── core/          # config, state, HTTP server
//! ├── auth/          # JWT, Argon2, middleware
//! ├── api/           # routers and handlers
//! ├── services/      # completion workflow
//! ├── stats/         # aggregation engine
//! ├── export/        # CSV
//! ├── db/            # SQLite pool and repositories
//! └── utils/         # errors, logging, money, time, validation
//! ```

pub mod api;
pub mod auth;
pub mod clock;
pub mod core;
pub mod db;
pub mod export;
pub mod services;
pub mod stats;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use clock::{Clock, FixedClock, SystemClock};
pub use core::{Config, Server, ServerState, build_router};
pub use db::DbService;
pub use utils::{AppError, AppResult};

pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____       __
  / ___/____ _/ /___  ____
  \__ \/ __ `/ / __ \/ __ \
 ___/ / /_/ / / /_/ / / / /
/____/\__,_/_/\____/_/ /_/
    "#
    );
}
