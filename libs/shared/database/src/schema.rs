use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

/// Everything the request path assumes about the database. Runs once at
/// startup; a failure here aborts the process rather than letting requests
/// run against a half-built schema.
const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS patients (
        id UUID PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        breed VARCHAR(50) NOT NULL,
        birth_date TIMESTAMPTZ NOT NULL,
        gender TEXT NOT NULL,
        weight DOUBLE PRECISION,
        color VARCHAR(30),
        microchip_id VARCHAR(20),
        owner_name VARCHAR(100) NOT NULL,
        owner_phone VARCHAR(25) NOT NULL,
        owner_email VARCHAR(100),
        medical_notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS appointments (
        id UUID PRIMARY KEY,
        patient_id UUID,
        customer_name TEXT NOT NULL,
        customer_email TEXT,
        customer_phone TEXT,
        service_name TEXT NOT NULL,
        staff_member TEXT,
        start_time TIMESTAMPTZ NOT NULL,
        end_time TIMESTAMPTZ NOT NULL,
        duration_minutes INTEGER NOT NULL,
        status TEXT NOT NULL,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    // Columns added after the first deployed revision, for bookings that
    // arrive through the external scheduling integration.
    "ALTER TABLE appointments ADD COLUMN IF NOT EXISTS external_booking_id TEXT",
    "ALTER TABLE appointments ADD COLUMN IF NOT EXISTS external_customer_id TEXT",
    "ALTER TABLE appointments ADD COLUMN IF NOT EXISTS service_id TEXT",
    "ALTER TABLE appointments ADD COLUMN IF NOT EXISTS resource_id TEXT",
    "ALTER TABLE appointments ADD COLUMN IF NOT EXISTS resource_name TEXT",
    "ALTER TABLE appointments ADD COLUMN IF NOT EXISTS time_zone TEXT",
    "ALTER TABLE appointments ADD COLUMN IF NOT EXISTS tags TEXT",
    // Idempotency key for webhook reconciliation. Inserts rely on
    // ON CONFLICT against this index to make duplicate deliveries no-ops.
    "CREATE UNIQUE INDEX IF NOT EXISTS appointments_external_booking_id_key
        ON appointments (external_booking_id)",
];

pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("schema bootstrap statement failed: {statement}"))?;
    }

    info!("Database schema is up to date");
    Ok(())
}
