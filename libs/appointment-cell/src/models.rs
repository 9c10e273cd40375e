// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// An appointment as the API exposes it. Field names are camelCase on the
/// wire and snake_case in the `appointments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    /// Booking id assigned by the external scheduling service; present only
    /// for externally-sourced appointments. Unique across the table and used
    /// as the idempotency key for webhook reconciliation.
    pub external_booking_id: Option<String>,
    pub patient_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub service_name: String,
    pub service_id: Option<String>,
    pub staff_member: Option<String>,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub time_zone: Option<String>,
    pub external_customer_id: Option<String>,
    pub tags: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Cancelled,
    Completed,
    InProgress,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::InProgress => "in-progress",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "pending" => Some(AppointmentStatus::Pending),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            "completed" => Some(AppointmentStatus::Completed),
            "in-progress" => Some(AppointmentStatus::InProgress),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Raw create payload. Every field the validator checks is optional here so
/// a single request can report all of its violations at once.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub service_name: Option<String>,
    pub staff_member: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Raw partial-update payload. All fields optional; an update supplying
/// none of them is rejected by the validator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub patient_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub service_name: Option<String>,
    pub staff_member: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

// ==============================================================================
// VALIDATED MODELS
// ==============================================================================

/// A create request that passed validation, ready for the repository.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub service_name: String,
    pub staff_member: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// Validated partial update. Only the supplied fields are written.
#[derive(Debug, Clone, Default)]
pub struct AppointmentUpdate {
    pub patient_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub service_name: Option<String>,
    pub staff_member: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl AppointmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.patient_id.is_none()
            && self.customer_name.is_none()
            && self.customer_email.is_none()
            && self.customer_phone.is_none()
            && self.service_name.is_none()
            && self.staff_member.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.duration_minutes.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// A booking pushed by the external scheduling service, mapped into local
/// field naming by the reconciler.
#[derive(Debug, Clone)]
pub struct ExternalBooking {
    pub external_booking_id: String,
    pub external_customer_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub service_name: String,
    pub service_id: Option<String>,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub time_zone: Option<String>,
    pub tags: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for AppointmentError {
    fn from(err: sqlx::Error) -> Self {
        AppointmentError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_kebab_case() {
        for status in [
            AppointmentStatus::Confirmed,
            AppointmentStatus::Pending,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Completed,
            AppointmentStatus::InProgress,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_serializes_in_progress_with_hyphen() {
        let json = serde_json::to_string(&AppointmentStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(AppointmentStatus::parse("no-show"), None);
        assert_eq!(AppointmentStatus::parse(""), None);
    }

    #[test]
    fn appointment_serializes_camel_case() {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            external_booking_id: Some("bk_1".into()),
            patient_id: None,
            customer_name: "Jane Doe".into(),
            customer_email: None,
            customer_phone: None,
            service_name: "Checkup".into(),
            service_id: None,
            staff_member: None,
            resource_id: None,
            resource_name: None,
            time_zone: None,
            external_customer_id: None,
            tags: None,
            start_time: Utc::now(),
            end_time: Utc::now(),
            duration_minutes: 30,
            status: AppointmentStatus::Confirmed,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&appointment).unwrap();
        assert!(value.get("externalBookingId").is_some());
        assert!(value.get("durationMinutes").is_some());
        assert!(value.get("external_booking_id").is_none());
    }
}
