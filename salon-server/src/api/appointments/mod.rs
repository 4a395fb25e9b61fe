//! Appointment API
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/appointments | GET | list (`?date=` or `?from=&to=`) |
//! | /api/appointments | POST | book from catalog service ids |
//! | /api/appointments/{id} | GET / PUT / DELETE | fetch / edit / cancel |
//! | /api/appointments/{id}/complete | POST | convert into a sale |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/appointments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/complete", post(handler::complete))
}
