// libs/booking-sync-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use appointment_cell::models::ExternalBooking;

// ==============================================================================
// RAW WEBHOOK PAYLOAD
// ==============================================================================

/// The booking webhook payload as Sesami sends it. Everything is optional at
/// this layer; the validator reports missing or malformed fields as one
/// complete violation list.
#[derive(Debug, Clone, Deserialize)]
pub struct SesamiWebhookPayload {
    pub event: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub booking: Option<BookingPayload>,
    pub customer: Option<CustomerPayload>,
    pub metadata: Option<MetadataPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingPayload {
    pub id: Option<String>,
    pub status: Option<String>,
    pub service_id: Option<String>,
    pub service_title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "shopify_customer_id")]
    pub external_customer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataPayload {
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub source: Option<String>,
}

// ==============================================================================
// VALIDATED EVENT
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEventKind {
    Created,
    Updated,
    Cancelled,
}

impl BookingEventKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "appointment.created" => Some(BookingEventKind::Created),
            "appointment.updated" => Some(BookingEventKind::Updated),
            "appointment.cancelled" => Some(BookingEventKind::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingEventKind::Created => "appointment.created",
            BookingEventKind::Updated => "appointment.updated",
            BookingEventKind::Cancelled => "appointment.cancelled",
        }
    }
}

impl fmt::Display for BookingEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A webhook payload that passed validation: one event kind plus the booking
/// mapped into local field naming.
#[derive(Debug, Clone)]
pub struct BookingEvent {
    pub kind: BookingEventKind,
    pub booking: ExternalBooking,
}
