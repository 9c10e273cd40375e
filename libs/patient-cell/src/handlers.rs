use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};
use crate::services::PatientService;
use crate::validation::{validate_create_patient, validate_update_patient};

#[axum::debug_handler]
pub async fn list_patients(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);

    let patients = service.list().await.map_err(map_patient_error)?;

    Ok(Json(json!(patients)))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let data = validate_create_patient(request).map_err(AppError::Validation)?;

    let service = PatientService::new(&state);
    let patient = service.create(data).await.map_err(map_patient_error)?;

    Ok((StatusCode::CREATED, Json(json!(patient))))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);

    let patient = service
        .get_by_id(patient_id)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let changes = validate_update_patient(request).map_err(AppError::Validation)?;

    let service = PatientService::new(&state);
    let patient = service
        .update(patient_id, changes)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "success": true,
        "patient": patient,
        "message": "Patient updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);

    service.delete(patient_id).await.map_err(map_patient_error)?;

    Ok(Json(json!({ "success": true })))
}

fn map_patient_error(err: PatientError) -> AppError {
    match err {
        PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
        PatientError::Database(msg) => AppError::Database(msg),
    }
}
