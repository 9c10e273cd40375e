use axum::{
    routing::{get, post},
    Router,
};

use shared_database::AppState;

use crate::handlers;

pub fn webhook_routes(state: AppState) -> Router {
    Router::new()
        .route("/bookings", post(handlers::receive_booking_webhook))
        .route("/bookings", get(handlers::webhook_info))
        .with_state(state)
}
