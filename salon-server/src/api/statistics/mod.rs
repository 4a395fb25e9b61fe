//! Statistics API

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/statistics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::get_dashboard))
        .route("/analytics", get(handler::get_analytics))
        .route("/sales-report", get(handler::get_sales_report))
}
