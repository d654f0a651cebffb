//! Schema creation for the measurement store.
//!
//! Every statement is guarded by `IF NOT EXISTS`, so running the
//! migrations against a populated database is a no-op.

use rusqlite::Connection;
use tracing::info;

use vitalog_domain::validation::{DIASTOLIC_RANGE, GLUCOSE_RANGE, PULSE_RANGE, SYSTOLIC_RANGE};

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    info!("Running SQLite migrations");

    create_measurements_table(conn)?;
    create_measurement_indexes(conn)?;
    create_touch_trigger(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the measurements table. The CHECK bounds are formatted from the
/// domain ranges so the schema and the validator cannot drift apart.
fn create_measurements_table(conn: &Connection) -> rusqlite::Result<()> {
    info!("Creating measurements table if not exists");

    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS measurements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                systolic INTEGER NOT NULL CHECK (systolic BETWEEN {} AND {}),
                diastolic INTEGER NOT NULL CHECK (diastolic BETWEEN {} AND {}),
                pulse INTEGER NOT NULL CHECK (pulse BETWEEN {} AND {}),
                glucose INTEGER CHECK (glucose IS NULL OR glucose BETWEEN {} AND {}),
                notes TEXT,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            SYSTOLIC_RANGE.min,
            SYSTOLIC_RANGE.max,
            DIASTOLIC_RANGE.min,
            DIASTOLIC_RANGE.max,
            PULSE_RANGE.min,
            PULSE_RANGE.max,
            GLUCOSE_RANGE.min,
            GLUCOSE_RANGE.max,
        ),
        [],
    )?;

    Ok(())
}

/// Create indexes for timestamp ordering and systolic filtering
fn create_measurement_indexes(conn: &Connection) -> rusqlite::Result<()> {
    info!("Creating measurement indexes");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_measurements_timestamp
        ON measurements (timestamp DESC)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_measurements_systolic
        ON measurements (systolic)",
        [],
    )?;

    Ok(())
}

/// Keep `updated_at` current whenever a row is rewritten
fn create_touch_trigger(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TRIGGER IF NOT EXISTS measurements_touch_updated_at
        AFTER UPDATE ON measurements
        BEGIN
            UPDATE measurements SET updated_at = CURRENT_TIMESTAMP
            WHERE id = NEW.id;
        END",
        [],
    )?;

    Ok(())
}
