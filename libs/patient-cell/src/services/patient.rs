// libs/patient-cell/src/services/patient.rs
use chrono::{DateTime, Utc};
use sqlx::postgres::Postgres;
use sqlx::{FromRow, PgPool, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::AppState;

use crate::models::{Gender, NewPatient, Patient, PatientError, PatientUpdate};

const PATIENT_COLUMNS: &str = "id, name, breed, birth_date, gender, weight, color, \
     microchip_id, owner_name, owner_phone, owner_email, medical_notes, created_at, updated_at";

#[derive(Debug, FromRow)]
struct PatientRow {
    id: Uuid,
    name: String,
    breed: String,
    birth_date: DateTime<Utc>,
    gender: String,
    weight: Option<f64>,
    color: Option<String>,
    microchip_id: Option<String>,
    owner_name: String,
    owner_phone: String,
    owner_email: Option<String>,
    medical_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PatientRow> for Patient {
    type Error = PatientError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let gender = Gender::parse(&row.gender).ok_or_else(|| {
            PatientError::Database(format!("unknown gender in store: {}", row.gender))
        })?;

        Ok(Patient {
            id: row.id,
            name: row.name,
            breed: row.breed,
            birth_date: row.birth_date,
            gender,
            weight: row.weight,
            color: row.color,
            microchip_id: row.microchip_id,
            owner_name: row.owner_name,
            owner_phone: row.owner_phone,
            owner_email: row.owner_email,
            medical_notes: row.medical_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PatientService {
    pool: PgPool,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
        }
    }

    /// Newest patients first, matching the dashboard listing.
    pub async fn list(&self) -> Result<Vec<Patient>, PatientError> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY created_at DESC");
        let rows: Vec<PatientRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        debug!("Found {} patients", rows.len());
        rows.into_iter().map(Patient::try_from).collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Patient, PatientError> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1");
        let row: Option<PatientRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(PatientError::NotFound),
        }
    }

    pub async fn create(&self, data: NewPatient) -> Result<Patient, PatientError> {
        let query = format!(
            "INSERT INTO patients (id, name, breed, birth_date, gender, weight, color, \
                 microchip_id, owner_name, owner_phone, owner_email, medical_notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {PATIENT_COLUMNS}"
        );

        let row: PatientRow = sqlx::query_as(&query)
            .bind(Uuid::new_v4())
            .bind(&data.name)
            .bind(&data.breed)
            .bind(data.birth_date)
            .bind(data.gender.as_str())
            .bind(data.weight)
            .bind(&data.color)
            .bind(&data.microchip_id)
            .bind(&data.owner_name)
            .bind(&data.owner_phone)
            .bind(&data.owner_email)
            .bind(&data.medical_notes)
            .fetch_one(&self.pool)
            .await?;

        let patient: Patient = row.try_into()?;
        info!("Patient {} created", patient.id);
        Ok(patient)
    }

    pub async fn update(&self, id: Uuid, changes: PatientUpdate) -> Result<Patient, PatientError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE patients SET updated_at = now()");

        if let Some(name) = &changes.name {
            builder.push(", name = ");
            builder.push_bind(name.clone());
        }
        if let Some(breed) = &changes.breed {
            builder.push(", breed = ");
            builder.push_bind(breed.clone());
        }
        if let Some(birth_date) = changes.birth_date {
            builder.push(", birth_date = ");
            builder.push_bind(birth_date);
        }
        if let Some(gender) = changes.gender {
            builder.push(", gender = ");
            builder.push_bind(gender.as_str());
        }
        if let Some(weight) = changes.weight {
            builder.push(", weight = ");
            builder.push_bind(weight);
        }
        if let Some(color) = &changes.color {
            builder.push(", color = ");
            builder.push_bind(color.clone());
        }
        if let Some(microchip_id) = &changes.microchip_id {
            builder.push(", microchip_id = ");
            builder.push_bind(microchip_id.clone());
        }
        if let Some(owner_name) = &changes.owner_name {
            builder.push(", owner_name = ");
            builder.push_bind(owner_name.clone());
        }
        if let Some(owner_phone) = &changes.owner_phone {
            builder.push(", owner_phone = ");
            builder.push_bind(owner_phone.clone());
        }
        if let Some(owner_email) = &changes.owner_email {
            builder.push(", owner_email = ");
            builder.push_bind(owner_email.clone());
        }
        if let Some(medical_notes) = &changes.medical_notes {
            builder.push(", medical_notes = ");
            builder.push_bind(medical_notes.clone());
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(format!(" RETURNING {PATIENT_COLUMNS}"));

        let row: Option<PatientRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let patient: Patient = row.try_into()?;
                info!("Patient {} updated", patient.id);
                Ok(patient)
            }
            None => Err(PatientError::NotFound),
        }
    }

    /// Patients are removed outright; appointments referencing them keep
    /// their contact snapshot, so no cascading cleanup is needed.
    pub async fn delete(&self, id: Uuid) -> Result<(), PatientError> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PatientError::NotFound);
        }

        info!("Patient {} deleted", id);
        Ok(())
    }
}
