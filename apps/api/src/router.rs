use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use booking_sync_cell::router::webhook_routes;
use patient_cell::router::patient_routes;
use shared_database::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "VetDesk API is running!" }))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/webhooks", webhook_routes(state))
}
