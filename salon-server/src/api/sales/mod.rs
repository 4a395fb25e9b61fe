//! Sales API
//!
//! Sales are append-only: list, manual entry, fetch, CSV export.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/export", get(handler::export))
        .route("/{id}", get(handler::get_by_id))
}
