use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A patient record: the animal plus an owner contact snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub breed: String,
    pub birth_date: DateTime<Utc>,
    pub gender: Gender,
    pub weight: Option<f64>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: Option<String>,
    pub medical_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw create payload; the validator reports every violated field at once.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_email: Option<String>,
    pub medical_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_email: Option<String>,
    pub medical_notes: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub breed: String,
    pub birth_date: DateTime<Utc>,
    pub gender: Gender,
    pub weight: Option<f64>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: Option<String>,
    pub medical_notes: Option<String>,
}

/// Validated partial update.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_email: Option<String>,
    pub medical_notes: Option<String>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.breed.is_none()
            && self.birth_date.is_none()
            && self.gender.is_none()
            && self.weight.is_none()
            && self.color.is_none()
            && self.microchip_id.is_none()
            && self.owner_name.is_none()
            && self.owner_phone.is_none()
            && self.owner_email.is_none()
            && self.medical_notes.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for PatientError {
    fn from(err: sqlx::Error) -> Self {
        PatientError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_round_trips() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("MALE"), None);
        assert_eq!(Gender::parse("other"), None);
    }

    #[test]
    fn patient_serializes_camel_case() {
        let patient = Patient {
            id: Uuid::new_v4(),
            name: "Rex".into(),
            breed: "Labrador".into(),
            birth_date: Utc::now(),
            gender: Gender::Male,
            weight: Some(31.5),
            color: None,
            microchip_id: Some("985112003456789".into()),
            owner_name: "Jane Doe".into(),
            owner_phone: "+15551234567".into(),
            owner_email: None,
            medical_notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&patient).unwrap();
        assert!(value.get("microchipId").is_some());
        assert!(value.get("ownerName").is_some());
        assert_eq!(value.get("gender").unwrap(), "male");
    }
}
