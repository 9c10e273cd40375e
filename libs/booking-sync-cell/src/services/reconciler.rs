// libs/booking-sync-cell/src/services/reconciler.rs
//
// Maps one validated booking event onto exactly one repository call, keyed
// by the external booking id. Duplicate and out-of-order deliveries resolve
// to no-ops, and a no-op is still a successfully processed event.

use tracing::info;

use appointment_cell::models::AppointmentError;
use appointment_cell::services::appointment::AppointmentService;
use shared_database::AppState;

use crate::models::{BookingEvent, BookingEventKind};

pub struct BookingReconciler {
    appointments: AppointmentService,
}

impl BookingReconciler {
    pub fn new(state: &AppState) -> Self {
        Self {
            appointments: AppointmentService::new(state),
        }
    }

    /// Apply one event. The returned message is echoed to the webhook
    /// sender; every branch that reaches it counts as processed.
    pub async fn apply(&self, event: BookingEvent) -> Result<String, AppointmentError> {
        let kind = event.kind;
        let booking_id = event.booking.external_booking_id.clone();

        match kind {
            BookingEventKind::Created => {
                match self.appointments.create_external(event.booking).await? {
                    Some(appointment) => {
                        info!(
                            "Created appointment {} from booking {}",
                            appointment.id, booking_id
                        );
                    }
                    None => {
                        info!(
                            "Booking {} already reconciled, ignoring duplicate delivery",
                            booking_id
                        );
                    }
                }
            }
            BookingEventKind::Updated => {
                match self.appointments.update_external(event.booking).await? {
                    Some(appointment) => {
                        info!(
                            "Updated appointment {} from booking {}",
                            appointment.id, booking_id
                        );
                    }
                    None => {
                        // An update can arrive before its create; it is
                        // dropped rather than creating a partial record.
                        info!(
                            "No local appointment for booking {}, ignoring update",
                            booking_id
                        );
                    }
                }
            }
            BookingEventKind::Cancelled => {
                match self
                    .appointments
                    .cancel_by_external_id(&booking_id)
                    .await?
                {
                    Some(appointment) => {
                        info!(
                            "Cancelled appointment {} from booking {}",
                            appointment.id, booking_id
                        );
                    }
                    None => {
                        info!(
                            "No local appointment for booking {}, ignoring cancellation",
                            booking_id
                        );
                    }
                }
            }
        }

        Ok(format!("Processed {kind} for booking {booking_id}"))
    }
}
