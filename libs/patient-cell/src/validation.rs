// libs/patient-cell/src/validation.rs
use shared_models::FieldViolation;
use shared_utils::validation::{
    check_email, check_f64_range, check_optional_text, check_text, require_text,
};

use crate::models::{
    CreatePatientRequest, Gender, NewPatient, PatientUpdate, UpdatePatientRequest,
};

const GENDER_MESSAGE: &str = "must be one of male, female";

pub fn validate_create_patient(
    raw: CreatePatientRequest,
) -> Result<NewPatient, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let name = require_text(&mut violations, "name", raw.name, 1, 50);
    let breed = require_text(&mut violations, "breed", raw.breed, 1, 50);

    let birth_date = raw.birth_date;
    if birth_date.is_none() {
        violations.push(FieldViolation::new("birthDate", "is required"));
    }

    let gender = match raw.gender {
        Some(value) => match Gender::parse(&value) {
            Some(gender) => Some(gender),
            None => {
                violations.push(FieldViolation::new("gender", GENDER_MESSAGE));
                None
            }
        },
        None => {
            violations.push(FieldViolation::new("gender", "is required"));
            None
        }
    };

    if let Some(weight) = raw.weight {
        check_f64_range(&mut violations, "weight", weight, 0.1, 200.0);
    }
    check_optional_text(&mut violations, "color", raw.color.as_deref(), 0, 30);
    check_optional_text(&mut violations, "microchipId", raw.microchip_id.as_deref(), 0, 20);

    let owner_name = require_text(&mut violations, "ownerName", raw.owner_name, 1, 100);
    let owner_phone = require_text(&mut violations, "ownerPhone", raw.owner_phone, 8, 25);
    check_owner_email(&mut violations, raw.owner_email.as_deref());
    check_optional_text(&mut violations, "medicalNotes", raw.medical_notes.as_deref(), 0, 500);

    match (name, breed, birth_date, gender, owner_name, owner_phone) {
        (Some(name), Some(breed), Some(birth_date), Some(gender), Some(owner_name), Some(owner_phone))
            if violations.is_empty() =>
        {
            Ok(NewPatient {
                name,
                breed,
                birth_date,
                gender,
                weight: raw.weight,
                color: raw.color,
                microchip_id: raw.microchip_id,
                owner_name,
                owner_phone,
                owner_email: raw.owner_email,
                medical_notes: raw.medical_notes,
            })
        }
        _ => Err(violations),
    }
}

pub fn validate_update_patient(
    raw: UpdatePatientRequest,
) -> Result<PatientUpdate, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    check_optional_text(&mut violations, "name", raw.name.as_deref(), 1, 50);
    check_optional_text(&mut violations, "breed", raw.breed.as_deref(), 1, 50);

    let gender = match raw.gender {
        Some(value) => match Gender::parse(&value) {
            Some(gender) => Some(gender),
            None => {
                violations.push(FieldViolation::new("gender", GENDER_MESSAGE));
                None
            }
        },
        None => None,
    };

    if let Some(weight) = raw.weight {
        check_f64_range(&mut violations, "weight", weight, 0.1, 200.0);
    }
    check_optional_text(&mut violations, "color", raw.color.as_deref(), 0, 30);
    check_optional_text(&mut violations, "microchipId", raw.microchip_id.as_deref(), 0, 20);
    check_optional_text(&mut violations, "ownerName", raw.owner_name.as_deref(), 1, 100);
    check_optional_text(&mut violations, "ownerPhone", raw.owner_phone.as_deref(), 8, 25);
    check_owner_email(&mut violations, raw.owner_email.as_deref());
    check_optional_text(&mut violations, "medicalNotes", raw.medical_notes.as_deref(), 0, 500);

    if !violations.is_empty() {
        return Err(violations);
    }

    let update = PatientUpdate {
        name: raw.name,
        breed: raw.breed,
        birth_date: raw.birth_date,
        gender,
        weight: raw.weight,
        color: raw.color,
        microchip_id: raw.microchip_id,
        owner_name: raw.owner_name,
        owner_phone: raw.owner_phone,
        owner_email: raw.owner_email,
        medical_notes: raw.medical_notes,
    };

    if update.is_empty() {
        return Err(vec![FieldViolation::new("body", "no fields to update")]);
    }

    Ok(update)
}

// The owner_email column is VARCHAR(100), tighter than the general email
// length cap.
fn check_owner_email(violations: &mut Vec<FieldViolation>, value: Option<&str>) {
    if let Some(email) = value {
        check_email(violations, "ownerEmail", email);
        check_text(violations, "ownerEmail", email, 0, 100);
    }
}
