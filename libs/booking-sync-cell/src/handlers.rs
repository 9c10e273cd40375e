// libs/booking-sync-cell/src/handlers.rs
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use appointment_cell::models::AppointmentError;
use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::SesamiWebhookPayload;
use crate::services::reconciler::BookingReconciler;
use crate::services::signature::{verify_signature, SIGNATURE_HEADER};
use crate::validation::validate_webhook_payload;

/// POST /webhooks/bookings. Signature verification runs against the raw
/// body before anything is parsed; idempotent no-ops still answer 200.
#[axum::debug_handler]
pub async fn receive_booking_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    info!("Received booking webhook");

    let secret = &state.config.sesami_webhook_secret;
    if secret.is_empty() {
        warn!("SESAMI_WEBHOOK_SECRET not configured, accepting webhook without verification");
    } else {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Auth("Missing webhook signature".to_string()))?;

        if !verify_signature(secret, &body, signature) {
            return Err(AppError::Auth("Invalid webhook signature".to_string()));
        }
    }

    let payload: SesamiWebhookPayload = serde_json::from_slice(&body)
        .map_err(|err| AppError::BadRequest(format!("Invalid webhook payload: {err}")))?;

    let event = validate_webhook_payload(payload).map_err(AppError::Validation)?;

    let reconciler = BookingReconciler::new(&state);
    let message = reconciler.apply(event).await.map_err(|err| match err {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::Database(msg) => AppError::Database(msg),
    })?;

    Ok(Json(json!({
        "success": true,
        "message": message
    })))
}

/// GET /webhooks/bookings. Lets an operator confirm the receiver is wired up.
#[axum::debug_handler]
pub async fn webhook_info() -> Json<Value> {
    Json(json!({
        "message": "Sesami booking webhook endpoint is ready",
        "supported_events": [
            "appointment.created",
            "appointment.updated",
            "appointment.cancelled"
        ],
        "signature_header": SIGNATURE_HEADER
    }))
}
