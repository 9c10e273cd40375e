// libs/appointment-cell/src/services/appointment.rs
//
// The appointment repository. Owns all reads and writes against the
// `appointments` table; no other component touches appointment rows.

use chrono::{DateTime, Utc};
use sqlx::postgres::Postgres;
use sqlx::{FromRow, PgPool, QueryBuilder};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::AppState;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, AppointmentUpdate, ExternalBooking,
    NewAppointment,
};
use crate::services::sync::{SesamiSyncClient, SyncAction};

const APPOINTMENT_COLUMNS: &str = "id, external_booking_id, patient_id, customer_name, \
     customer_email, customer_phone, service_name, service_id, staff_member, resource_id, \
     resource_name, time_zone, external_customer_id, tags, start_time, end_time, \
     duration_minutes, status, notes, created_at, updated_at";

/// Internal row shape. Status is stored as text and parsed on the way out so
/// a corrupted row surfaces as a store error instead of a panic.
#[derive(Debug, FromRow)]
struct AppointmentRow {
    id: Uuid,
    external_booking_id: Option<String>,
    patient_id: Option<Uuid>,
    customer_name: String,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    service_name: String,
    service_id: Option<String>,
    staff_member: Option<String>,
    resource_id: Option<String>,
    resource_name: Option<String>,
    time_zone: Option<String>,
    external_customer_id: Option<String>,
    tags: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    duration_minutes: i32,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = AppointmentError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = AppointmentStatus::parse(&row.status).ok_or_else(|| {
            AppointmentError::Database(format!("unknown appointment status in store: {}", row.status))
        })?;

        Ok(Appointment {
            id: row.id,
            external_booking_id: row.external_booking_id,
            patient_id: row.patient_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            service_name: row.service_name,
            service_id: row.service_id,
            staff_member: row.staff_member,
            resource_id: row.resource_id,
            resource_name: row.resource_name,
            time_zone: row.time_zone,
            external_customer_id: row.external_customer_id,
            tags: row.tags,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes,
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct AppointmentService {
    pool: PgPool,
    sync: SesamiSyncClient,
}

impl AppointmentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            sync: SesamiSyncClient::new(&state.config),
        }
    }

    /// List appointments ordered by start time. With a window, only
    /// appointments whose `[start_time, end_time]` lies within it are
    /// returned.
    pub async fn list(
        &self,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let rows: Vec<AppointmentRow> = match window {
            Some((start, end)) => {
                let query = format!(
                    "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
                     WHERE start_time >= $1 AND end_time <= $2 \
                     ORDER BY start_time ASC"
                );
                sqlx::query_as(&query)
                    .bind(start)
                    .bind(end)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query =
                    format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY start_time ASC");
                sqlx::query_as(&query).fetch_all(&self.pool).await?
            }
        };

        debug!("Found {} appointments", rows.len());
        rows.into_iter().map(Appointment::try_from).collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1");
        let row: Option<AppointmentRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppointmentError::NotFound),
        }
    }

    pub async fn create(&self, data: NewAppointment) -> Result<Appointment, AppointmentError> {
        let query = format!(
            "INSERT INTO appointments (id, patient_id, customer_name, customer_email, \
                 customer_phone, service_name, staff_member, start_time, end_time, \
                 duration_minutes, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {APPOINTMENT_COLUMNS}"
        );

        let row: AppointmentRow = sqlx::query_as(&query)
            .bind(Uuid::new_v4())
            .bind(data.patient_id)
            .bind(&data.customer_name)
            .bind(&data.customer_email)
            .bind(&data.customer_phone)
            .bind(&data.service_name)
            .bind(&data.staff_member)
            .bind(data.start_time)
            .bind(data.end_time)
            .bind(data.duration_minutes)
            .bind(data.status.as_str())
            .bind(&data.notes)
            .fetch_one(&self.pool)
            .await?;

        let appointment: Appointment = row.try_into()?;
        info!("Appointment {} created", appointment.id);
        Ok(appointment)
    }

    /// Merge the supplied fields into the row and refresh `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        changes: AppointmentUpdate,
    ) -> Result<Appointment, AppointmentError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE appointments SET updated_at = now()");
        push_changes(&mut builder, &changes);
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(format!(" RETURNING {APPOINTMENT_COLUMNS}"));

        let row: Option<AppointmentRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;

        let appointment: Appointment = match row {
            Some(row) => row.try_into()?,
            None => return Err(AppointmentError::NotFound),
        };

        info!("Appointment {} updated", appointment.id);
        self.notify_external_change(&appointment, SyncAction::Update);
        Ok(appointment)
    }

    /// Soft-cancel: the row stays, its status becomes `cancelled`.
    pub async fn cancel(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let query = format!(
            "UPDATE appointments SET status = 'cancelled', updated_at = now() \
             WHERE id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        );
        let row: Option<AppointmentRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let appointment: Appointment = match row {
            Some(row) => row.try_into()?,
            None => return Err(AppointmentError::NotFound),
        };

        info!("Appointment {} cancelled", appointment.id);
        self.notify_external_change(&appointment, SyncAction::Cancel);
        Ok(appointment)
    }

    /// Insert a booking delivered by the external scheduler. Duplicate
    /// deliveries of the same booking id hit the unique index and insert
    /// nothing; that case returns `Ok(None)`.
    pub async fn create_external(
        &self,
        booking: ExternalBooking,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let query = format!(
            "INSERT INTO appointments (id, external_booking_id, external_customer_id, \
                 customer_name, customer_email, customer_phone, service_name, service_id, \
                 resource_id, resource_name, time_zone, tags, start_time, end_time, \
                 duration_minutes, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             ON CONFLICT (external_booking_id) DO NOTHING \
             RETURNING {APPOINTMENT_COLUMNS}"
        );

        let row: Option<AppointmentRow> = sqlx::query_as(&query)
            .bind(Uuid::new_v4())
            .bind(&booking.external_booking_id)
            .bind(&booking.external_customer_id)
            .bind(&booking.customer_name)
            .bind(&booking.customer_email)
            .bind(&booking.customer_phone)
            .bind(&booking.service_name)
            .bind(&booking.service_id)
            .bind(&booking.resource_id)
            .bind(&booking.resource_name)
            .bind(&booking.time_zone)
            .bind(&booking.tags)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(booking.duration_minutes)
            .bind(booking.status.as_str())
            .bind(&booking.notes)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Appointment::try_from).transpose()
    }

    /// Overwrite the appointment owned by this external booking id with the
    /// fields the scheduler sent, absent values included. Returns `Ok(None)`
    /// when no such appointment exists.
    pub async fn update_external(
        &self,
        booking: ExternalBooking,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let query = format!(
            "UPDATE appointments SET \
                 external_customer_id = $2, customer_name = $3, customer_email = $4, \
                 customer_phone = $5, service_name = $6, service_id = $7, resource_id = $8, \
                 resource_name = $9, time_zone = $10, tags = $11, start_time = $12, \
                 end_time = $13, duration_minutes = $14, status = $15, notes = $16, \
                 updated_at = now() \
             WHERE external_booking_id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        );

        let row: Option<AppointmentRow> = sqlx::query_as(&query)
            .bind(&booking.external_booking_id)
            .bind(&booking.external_customer_id)
            .bind(&booking.customer_name)
            .bind(&booking.customer_email)
            .bind(&booking.customer_phone)
            .bind(&booking.service_name)
            .bind(&booking.service_id)
            .bind(&booking.resource_id)
            .bind(&booking.resource_name)
            .bind(&booking.time_zone)
            .bind(&booking.tags)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(booking.duration_minutes)
            .bind(booking.status.as_str())
            .bind(&booking.notes)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Appointment::try_from).transpose()
    }

    /// Soft-cancel by external booking id. Returns `Ok(None)` when no such
    /// appointment exists.
    pub async fn cancel_by_external_id(
        &self,
        external_booking_id: &str,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let query = format!(
            "UPDATE appointments SET status = 'cancelled', updated_at = now() \
             WHERE external_booking_id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        );
        let row: Option<AppointmentRow> = sqlx::query_as(&query)
            .bind(external_booking_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Appointment::try_from).transpose()
    }

    /// Fire-and-forget notification to the external scheduler when a synced
    /// appointment changes locally. Failure is logged, never propagated, and
    /// never rolls back the local write.
    fn notify_external_change(&self, appointment: &Appointment, action: SyncAction) {
        let Some(booking_id) = appointment.external_booking_id.clone() else {
            return;
        };

        let client = self.sync.clone();
        tokio::spawn(async move {
            if let Err(err) = client.notify(&booking_id, action).await {
                warn!(
                    "Failed to sync {} for booking {} to Sesami: {}",
                    action, booking_id, err
                );
            }
        });
    }
}

fn push_changes(builder: &mut QueryBuilder<'_, Postgres>, changes: &AppointmentUpdate) {
    if let Some(patient_id) = changes.patient_id {
        builder.push(", patient_id = ");
        builder.push_bind(patient_id);
    }
    if let Some(customer_name) = &changes.customer_name {
        builder.push(", customer_name = ");
        builder.push_bind(customer_name.clone());
    }
    if let Some(customer_email) = &changes.customer_email {
        builder.push(", customer_email = ");
        builder.push_bind(customer_email.clone());
    }
    if let Some(customer_phone) = &changes.customer_phone {
        builder.push(", customer_phone = ");
        builder.push_bind(customer_phone.clone());
    }
    if let Some(service_name) = &changes.service_name {
        builder.push(", service_name = ");
        builder.push_bind(service_name.clone());
    }
    if let Some(staff_member) = &changes.staff_member {
        builder.push(", staff_member = ");
        builder.push_bind(staff_member.clone());
    }
    if let Some(start_time) = changes.start_time {
        builder.push(", start_time = ");
        builder.push_bind(start_time);
    }
    if let Some(end_time) = changes.end_time {
        builder.push(", end_time = ");
        builder.push_bind(end_time);
    }
    if let Some(duration_minutes) = changes.duration_minutes {
        builder.push(", duration_minutes = ");
        builder.push_bind(duration_minutes);
    }
    if let Some(status) = changes.status {
        builder.push(", status = ");
        builder.push_bind(status.as_str());
    }
    if let Some(notes) = &changes.notes {
        builder.push(", notes = ");
        builder.push_bind(notes.clone());
    }
}
