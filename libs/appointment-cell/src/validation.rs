// libs/appointment-cell/src/validation.rs
//
// Pure input validation for appointment payloads. Collects every violated
// constraint so callers can render them all in a single response.

use shared_models::FieldViolation;
use shared_utils::validation::{
    check_i64_range, check_optional_email, check_optional_text, require_text,
};

use crate::models::{
    AppointmentStatus, AppointmentUpdate, CreateAppointmentRequest, NewAppointment,
    UpdateAppointmentRequest,
};

const STATUS_MESSAGE: &str =
    "must be one of confirmed, pending, cancelled, completed, in-progress";

pub fn validate_create_appointment(
    raw: CreateAppointmentRequest,
) -> Result<NewAppointment, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let customer_name = require_text(&mut violations, "customerName", raw.customer_name, 1, 100);
    check_optional_email(&mut violations, "customerEmail", raw.customer_email.as_deref());
    check_optional_text(&mut violations, "customerPhone", raw.customer_phone.as_deref(), 8, 25);
    let service_name = require_text(&mut violations, "serviceName", raw.service_name, 1, 100);
    check_optional_text(&mut violations, "staffMember", raw.staff_member.as_deref(), 0, 50);
    check_optional_text(&mut violations, "notes", raw.notes.as_deref(), 0, 500);

    let start_time = raw.start_time;
    if start_time.is_none() {
        violations.push(FieldViolation::new("startTime", "is required"));
    }
    let end_time = raw.end_time;
    if end_time.is_none() {
        violations.push(FieldViolation::new("endTime", "is required"));
    }

    let duration_minutes = match raw.duration_minutes {
        Some(minutes) => {
            check_i64_range(&mut violations, "durationMinutes", minutes, 15, 480);
            Some(minutes)
        }
        None => {
            violations.push(FieldViolation::new("durationMinutes", "is required"));
            None
        }
    };

    let status = parse_status(&mut violations, raw.status, true);

    check_time_window(&mut violations, start_time, end_time, duration_minutes);

    match (
        customer_name,
        service_name,
        start_time,
        end_time,
        duration_minutes,
        status,
    ) {
        (
            Some(customer_name),
            Some(service_name),
            Some(start_time),
            Some(end_time),
            Some(duration_minutes),
            Some(status),
        ) if violations.is_empty() => Ok(NewAppointment {
            patient_id: raw.patient_id,
            customer_name,
            customer_email: raw.customer_email,
            customer_phone: raw.customer_phone,
            service_name,
            staff_member: raw.staff_member,
            start_time,
            end_time,
            duration_minutes: duration_minutes as i32,
            status,
            notes: raw.notes,
        }),
        _ => Err(violations),
    }
}

pub fn validate_update_appointment(
    raw: UpdateAppointmentRequest,
) -> Result<AppointmentUpdate, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    check_optional_text(&mut violations, "customerName", raw.customer_name.as_deref(), 1, 100);
    check_optional_email(&mut violations, "customerEmail", raw.customer_email.as_deref());
    check_optional_text(&mut violations, "customerPhone", raw.customer_phone.as_deref(), 8, 25);
    check_optional_text(&mut violations, "serviceName", raw.service_name.as_deref(), 1, 100);
    check_optional_text(&mut violations, "staffMember", raw.staff_member.as_deref(), 0, 50);
    check_optional_text(&mut violations, "notes", raw.notes.as_deref(), 0, 500);

    if let Some(minutes) = raw.duration_minutes {
        check_i64_range(&mut violations, "durationMinutes", minutes, 15, 480);
    }

    let status = parse_status(&mut violations, raw.status, false);

    check_time_window(&mut violations, raw.start_time, raw.end_time, raw.duration_minutes);

    if !violations.is_empty() {
        return Err(violations);
    }

    let update = AppointmentUpdate {
        patient_id: raw.patient_id,
        customer_name: raw.customer_name,
        customer_email: raw.customer_email,
        customer_phone: raw.customer_phone,
        service_name: raw.service_name,
        staff_member: raw.staff_member,
        start_time: raw.start_time,
        end_time: raw.end_time,
        duration_minutes: raw.duration_minutes.map(|minutes| minutes as i32),
        status,
        notes: raw.notes,
    };

    if update.is_empty() {
        return Err(vec![FieldViolation::new("body", "no fields to update")]);
    }

    Ok(update)
}

fn parse_status(
    violations: &mut Vec<FieldViolation>,
    raw: Option<String>,
    required: bool,
) -> Option<AppointmentStatus> {
    match raw {
        Some(value) => match AppointmentStatus::parse(&value) {
            Some(status) => Some(status),
            None => {
                violations.push(FieldViolation::new("status", STATUS_MESSAGE));
                None
            }
        },
        None => {
            if required {
                violations.push(FieldViolation::new("status", "is required"));
            }
            None
        }
    }
}

/// Cross-field checks: the appointment interval must be positive, and when
/// both endpoints and a duration are supplied they must agree to the minute.
fn check_time_window(
    violations: &mut Vec<FieldViolation>,
    start_time: Option<chrono::DateTime<chrono::Utc>>,
    end_time: Option<chrono::DateTime<chrono::Utc>>,
    duration_minutes: Option<i64>,
) {
    let (Some(start), Some(end)) = (start_time, end_time) else {
        return;
    };

    if end <= start {
        violations.push(FieldViolation::new("endTime", "must be after startTime"));
        return;
    }

    if let Some(minutes) = duration_minutes {
        let window = (end - start).num_minutes();
        if window != minutes {
            violations.push(FieldViolation::new(
                "durationMinutes",
                format!("does not match the {window} minute window between startTime and endTime"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn valid_create() -> CreateAppointmentRequest {
        let start = Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap();
        CreateAppointmentRequest {
            patient_id: None,
            customer_name: Some("Jane Doe".into()),
            customer_email: Some("jane@example.com".into()),
            customer_phone: Some("+15551234567".into()),
            service_name: Some("Checkup".into()),
            staff_member: None,
            start_time: Some(start),
            end_time: Some(start + Duration::minutes(30)),
            duration_minutes: Some(30),
            status: Some("confirmed".into()),
            notes: None,
        }
    }

    #[test]
    fn accepts_a_valid_create_request() {
        let validated = validate_create_appointment(valid_create()).unwrap();
        assert_eq!(validated.customer_name, "Jane Doe");
        assert_eq!(validated.duration_minutes, 30);
        assert_eq!(validated.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn reports_every_violation_at_once() {
        let mut raw = valid_create();
        raw.duration_minutes = Some(1000);
        raw.customer_email = Some("not-an-email".into());
        raw.service_name = None;
        // 30 minute window no longer matches the bad duration either.
        let violations = validate_create_appointment(raw).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"durationMinutes"));
        assert!(fields.contains(&"customerEmail"));
        assert!(fields.contains(&"serviceName"));
        assert!(violations.len() >= 3);
    }

    #[test]
    fn rejects_inverted_time_window() {
        let mut raw = valid_create();
        let start = raw.start_time.unwrap();
        raw.end_time = Some(start - Duration::minutes(30));
        let violations = validate_create_appointment(raw).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "endTime");
    }

    #[test]
    fn rejects_duration_disagreeing_with_window() {
        let mut raw = valid_create();
        raw.duration_minutes = Some(45);
        let violations = validate_create_appointment(raw).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "durationMinutes");
    }

    #[test]
    fn rejects_unknown_status() {
        let mut raw = valid_create();
        raw.status = Some("rescheduled".into());
        let violations = validate_create_appointment(raw).unwrap_err();
        assert_eq!(violations[0].field, "status");
    }

    #[test]
    fn update_rejects_empty_body() {
        let raw = UpdateAppointmentRequest {
            patient_id: None,
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            service_name: None,
            staff_member: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            status: None,
            notes: None,
        };
        let violations = validate_update_appointment(raw).unwrap_err();
        assert_eq!(violations[0].field, "body");
    }

    #[test]
    fn update_accepts_a_single_field() {
        let raw = UpdateAppointmentRequest {
            patient_id: None,
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            service_name: None,
            staff_member: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            status: Some("completed".into()),
            notes: None,
        };
        let update = validate_update_appointment(raw).unwrap();
        assert_eq!(update.status, Some(AppointmentStatus::Completed));
        assert!(update.customer_name.is_none());
    }

    #[test]
    fn update_still_bounds_notes() {
        let raw = UpdateAppointmentRequest {
            patient_id: None,
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            service_name: None,
            staff_member: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            status: None,
            notes: Some("x".repeat(501)),
        };
        let violations = validate_update_appointment(raw).unwrap_err();
        assert_eq!(violations[0].field, "notes");
    }
}
