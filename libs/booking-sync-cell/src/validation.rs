// libs/booking-sync-cell/src/validation.rs
//
// Validation of the booking webhook contract. Only the current payload shape
// is accepted; the retired `event_type`/`appointment_time` shape fails
// validation like any other malformed payload.

use shared_models::FieldViolation;
use shared_utils::validation::{check_optional_email, check_optional_text, require_text};

use appointment_cell::models::{AppointmentStatus, ExternalBooking};

use crate::models::{BookingEvent, BookingEventKind, SesamiWebhookPayload};

const EVENT_MESSAGE: &str =
    "must be one of appointment.created, appointment.updated, appointment.cancelled";
const STATUS_MESSAGE: &str =
    "must be one of confirmed, pending, cancelled, completed, in-progress";

pub fn validate_webhook_payload(
    raw: SesamiWebhookPayload,
) -> Result<BookingEvent, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let kind = match raw.event.as_deref() {
        Some(value) => match BookingEventKind::parse(value) {
            Some(kind) => Some(kind),
            None => {
                violations.push(FieldViolation::new("event", EVENT_MESSAGE));
                None
            }
        },
        None => {
            violations.push(FieldViolation::new("event", "is required"));
            None
        }
    };

    if raw.sent_at.is_none() {
        violations.push(FieldViolation::new("sent_at", "is required"));
    }

    let Some(booking) = raw.booking else {
        violations.push(FieldViolation::new("booking", "is required"));
        if raw.customer.is_none() {
            violations.push(FieldViolation::new("customer", "is required"));
        }
        return Err(violations);
    };

    let Some(customer) = raw.customer else {
        violations.push(FieldViolation::new("customer", "is required"));
        return Err(violations);
    };

    let booking_id = require_text(&mut violations, "booking.id", booking.id, 1, 100);
    let service_title =
        require_text(&mut violations, "booking.service_title", booking.service_title, 1, 100);

    let status = match booking.status.as_deref() {
        Some(value) => match AppointmentStatus::parse(value) {
            Some(status) => Some(status),
            None => {
                violations.push(FieldViolation::new("booking.status", STATUS_MESSAGE));
                None
            }
        },
        None => {
            violations.push(FieldViolation::new("booking.status", "is required"));
            None
        }
    };

    let starts_at = booking.starts_at;
    if starts_at.is_none() {
        violations.push(FieldViolation::new("booking.starts_at", "is required"));
    }
    let ends_at = booking.ends_at;
    if ends_at.is_none() {
        violations.push(FieldViolation::new("booking.ends_at", "is required"));
    }

    if let (Some(starts), Some(ends)) = (starts_at, ends_at) {
        if ends <= starts {
            violations.push(FieldViolation::new(
                "booking.ends_at",
                "must be after booking.starts_at",
            ));
        }
    }

    let customer_name = require_text(&mut violations, "customer.name", customer.name, 1, 100);
    check_optional_email(&mut violations, "customer.email", customer.email.as_deref());

    let metadata = raw.metadata;
    match &metadata {
        Some(metadata) => {
            check_optional_text(&mut violations, "metadata.notes", metadata.notes.as_deref(), 0, 500);
            if metadata.source.is_none() {
                violations.push(FieldViolation::new("metadata.source", "is required"));
            }
        }
        None => {
            violations.push(FieldViolation::new("metadata", "is required"));
        }
    }

    match (kind, booking_id, service_title, status, starts_at, ends_at, customer_name, metadata) {
        (
            Some(kind),
            Some(booking_id),
            Some(service_title),
            Some(status),
            Some(start_time),
            Some(end_time),
            Some(customer_name),
            Some(metadata),
        ) if violations.is_empty() => {
            // The current contract carries both endpoints; the duration is
            // derived rather than trusted from the payload.
            let duration_minutes = (end_time - start_time).num_minutes() as i32;

            Ok(BookingEvent {
                kind,
                booking: ExternalBooking {
                    external_booking_id: booking_id,
                    external_customer_id: customer.external_customer_id,
                    customer_name,
                    customer_email: customer.email,
                    customer_phone: customer.phone,
                    service_name: service_title,
                    service_id: booking.service_id,
                    resource_id: booking.resource_id,
                    resource_name: booking.resource_name,
                    time_zone: booking.time_zone,
                    tags: metadata.tags,
                    start_time,
                    end_time,
                    duration_minutes,
                    status,
                    notes: metadata.notes,
                },
            })
        }
        _ => Err(violations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingPayload, CustomerPayload, MetadataPayload};
    use chrono::{Duration, TimeZone, Utc};

    fn valid_payload() -> SesamiWebhookPayload {
        let starts = Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap();
        SesamiWebhookPayload {
            event: Some("appointment.created".into()),
            sent_at: Some(Utc::now()),
            booking: Some(BookingPayload {
                id: Some("bk_20250304_001".into()),
                status: Some("confirmed".into()),
                service_id: Some("svc_groom".into()),
                service_title: Some("Dog Grooming and Health Check".into()),
                starts_at: Some(starts),
                ends_at: Some(starts + Duration::minutes(60)),
                time_zone: Some("America/New_York".into()),
                resource_id: Some("vet_room_1".into()),
                resource_name: Some("Examination Room 1".into()),
            }),
            customer: Some(CustomerPayload {
                name: Some("Test Customer".into()),
                email: Some("test@example.com".into()),
                phone: Some("+1-555-0100".into()),
                external_customer_id: Some("cust_123456".into()),
            }),
            metadata: Some(MetadataPayload {
                notes: Some("First time customer".into()),
                tags: Some("new-customer,grooming".into()),
                source: Some("sesami".into()),
            }),
        }
    }

    #[test]
    fn maps_external_fields_onto_local_naming() {
        let event = validate_webhook_payload(valid_payload()).unwrap();
        assert_eq!(event.kind, BookingEventKind::Created);
        let booking = event.booking;
        assert_eq!(booking.external_booking_id, "bk_20250304_001");
        assert_eq!(booking.service_name, "Dog Grooming and Health Check");
        assert_eq!(booking.customer_name, "Test Customer");
        assert_eq!(booking.status, AppointmentStatus::Confirmed);
        assert_eq!(booking.time_zone.as_deref(), Some("America/New_York"));
        assert_eq!(booking.notes.as_deref(), Some("First time customer"));
    }

    #[test]
    fn derives_duration_from_the_booking_window() {
        let event = validate_webhook_payload(valid_payload()).unwrap();
        assert_eq!(event.booking.duration_minutes, 60);
    }

    #[test]
    fn parses_each_event_kind() {
        for (name, kind) in [
            ("appointment.created", BookingEventKind::Created),
            ("appointment.updated", BookingEventKind::Updated),
            ("appointment.cancelled", BookingEventKind::Cancelled),
        ] {
            let mut payload = valid_payload();
            payload.event = Some(name.into());
            let event = validate_webhook_payload(payload).unwrap();
            assert_eq!(event.kind, kind);
        }
    }

    #[test]
    fn rejects_the_retired_event_naming() {
        let mut payload = valid_payload();
        payload.event = Some("booking.created".into());
        let violations = validate_webhook_payload(payload).unwrap_err();
        assert_eq!(violations[0].field, "event");
    }

    #[test]
    fn collects_violations_across_sections() {
        let mut payload = valid_payload();
        payload.event = Some("appointment.refreshed".into());
        if let Some(booking) = payload.booking.as_mut() {
            booking.status = Some("no-show".into());
        }
        if let Some(customer) = payload.customer.as_mut() {
            customer.email = Some("not-an-email".into());
        }
        let violations = validate_webhook_payload(payload).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"event"));
        assert!(fields.contains(&"booking.status"));
        assert!(fields.contains(&"customer.email"));
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn rejects_inverted_booking_window() {
        let mut payload = valid_payload();
        if let Some(booking) = payload.booking.as_mut() {
            booking.ends_at = booking.starts_at.map(|t| t - Duration::minutes(30));
        }
        let violations = validate_webhook_payload(payload).unwrap_err();
        assert_eq!(violations[0].field, "booking.ends_at");
    }

    #[test]
    fn missing_sections_are_reported() {
        let payload = SesamiWebhookPayload {
            event: Some("appointment.created".into()),
            sent_at: Some(Utc::now()),
            booking: None,
            customer: None,
            metadata: None,
        };
        let violations = validate_webhook_payload(payload).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"booking"));
        assert!(fields.contains(&"customer"));
    }

    #[test]
    fn accepts_the_legacy_customer_id_alias() {
        let json = serde_json::json!({
            "event": "appointment.created",
            "sent_at": "2025-03-04T08:00:00Z",
            "booking": {
                "id": "bk_1",
                "status": "confirmed",
                "service_id": "svc_1",
                "service_title": "Checkup",
                "starts_at": "2025-03-04T09:00:00Z",
                "ends_at": "2025-03-04T09:30:00Z",
                "time_zone": "UTC"
            },
            "customer": {
                "name": "Test Customer",
                "shopify_customer_id": "shopify_123456"
            },
            "metadata": { "source": "sesami" }
        });
        let payload: SesamiWebhookPayload = serde_json::from_value(json).unwrap();
        let event = validate_webhook_payload(payload).unwrap();
        assert_eq!(
            event.booking.external_customer_id.as_deref(),
            Some("shopify_123456")
        );
    }
}
