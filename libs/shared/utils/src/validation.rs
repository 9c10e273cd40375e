use std::sync::OnceLock;

use regex::Regex;

use shared_models::FieldViolation;

const MAX_EMAIL_LENGTH: usize = 254;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH && email_regex().is_match(email)
}

/// Record a violation when the field is absent; bounds-check it when present.
/// Returns the value so callers can assemble the validated struct once the
/// whole list has been collected.
pub fn require_text(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: Option<String>,
    min: usize,
    max: usize,
) -> Option<String> {
    match value {
        Some(value) => {
            check_text(violations, field, &value, min, max);
            Some(value)
        }
        None => {
            violations.push(FieldViolation::new(field, "is required"));
            None
        }
    }
}

pub fn check_text(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let length = value.chars().count();
    if length < min || length > max {
        violations.push(FieldViolation::new(
            field,
            format!("must be between {min} and {max} characters"),
        ));
    }
}

pub fn check_optional_text(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) {
    if let Some(value) = value {
        check_text(violations, field, value, min, max);
    }
}

pub fn check_email(violations: &mut Vec<FieldViolation>, field: &str, value: &str) {
    if !is_valid_email(value) {
        violations.push(FieldViolation::new(field, "must be a valid email address"));
    }
}

pub fn check_optional_email(violations: &mut Vec<FieldViolation>, field: &str, value: Option<&str>) {
    if let Some(value) = value {
        check_email(violations, field, value);
    }
}

pub fn check_i64_range(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: i64,
    min: i64,
    max: i64,
) {
    if value < min || value > max {
        violations.push(FieldViolation::new(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
}

pub fn check_f64_range(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if value < min || value > max {
        violations.push(FieldViolation::new(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
}
