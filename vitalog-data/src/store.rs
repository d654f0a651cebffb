//! SQLite-backed measurement store.
//!
//! All access goes through an r2d2 connection pool. Records are validated
//! by the domain rules before any statement runs, with the schema CHECK
//! constraints as a second line of defense.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Row, ToSql};
use serde::Serialize;
use tracing::{debug, info, warn};

use vitalog_domain::{validate, Measurement, TIMESTAMP_FORMAT};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::migrations;

/// Optional constraints for `list_filtered`
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Keep measurements taken at or after this time
    pub since: Option<NaiveDateTime>,

    /// Keep measurements taken at or before this time
    pub until: Option<NaiveDateTime>,

    /// Cap the number of returned measurements
    pub limit: Option<u32>,
}

/// Aggregate statistics over every stored measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementStats {
    /// Number of persisted measurements
    pub total: u64,

    /// Mean systolic pressure, rounded to one decimal
    pub avg_systolic: f64,

    /// Mean diastolic pressure, rounded to one decimal
    pub avg_diastolic: f64,

    /// Mean pulse rate, rounded to one decimal
    pub avg_pulse: f64,

    /// Mean glucose over the measurements that recorded one, rounded to
    /// one decimal
    pub avg_glucose: f64,

    /// Timestamp of the earliest measurement
    pub first_taken_at: Option<NaiveDateTime>,

    /// Timestamp of the latest measurement
    pub last_taken_at: Option<NaiveDateTime>,
}

/// SQLite-backed storage for measurement records
#[derive(Debug, Clone)]
pub struct MeasurementStore {
    pool: Pool<SqliteConnectionManager>,
}

impl MeasurementStore {
    /// Open a file-backed store at `path` with the default pool sizing,
    /// creating the parent directory if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let config = StoreConfig {
            path: path.as_ref().to_path_buf(),
            ..StoreConfig::default()
        };
        Self::open_with_config(&config)
    }

    /// Open a file-backed store sized from a configuration.
    pub fn open_with_config(config: &StoreConfig) -> Result<Self, StoreError> {
        info!("Opening measurement store at: {}", config.path.display());

        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating database directory: {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(&config.path).with_init(apply_pragmas);
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Open an in-memory store. The pool is capped at a single connection
    /// because every `:memory:` connection is its own empty database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        info!("Opening in-memory measurement store");

        let manager = SqliteConnectionManager::memory().with_init(apply_pragmas);
        let pool = Pool::builder().max_size(1).build(manager)?;

        Ok(Self { pool })
    }

    /// Create the schema if it does not exist. Safe to call on every
    /// startup; existing rows are never touched.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        migrations::run_migrations(&conn)?;
        Ok(())
    }

    /// Insert a measurement and return its assigned id.
    ///
    /// The record is validated before anything reaches the database. A
    /// measurement without `taken_at` is stamped with the current local
    /// time.
    pub fn insert(&self, measurement: &Measurement) -> Result<i64, StoreError> {
        validate(measurement)?;

        let taken_at = measurement
            .taken_at
            .unwrap_or_else(|| Local::now().naive_local());
        let stamp = taken_at.format(TIMESTAMP_FORMAT).to_string();

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO measurements (timestamp, systolic, diastolic, pulse, glucose, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &stamp,
                measurement.systolic,
                measurement.diastolic,
                measurement.pulse,
                measurement.glucose,
                &measurement.notes,
            ),
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted measurement: id={}", id);
        Ok(id)
    }

    /// Get every measurement, newest first.
    pub fn list_all(&self) -> Result<Vec<Measurement>, StoreError> {
        self.list_filtered(&ListFilter::default())
    }

    /// Get the measurements matching a filter, newest first. Both time
    /// bounds are inclusive; the limit keeps the newest rows.
    pub fn list_filtered(&self, filter: &ListFilter) -> Result<Vec<Measurement>, StoreError> {
        debug!("Listing measurements: filter={:?}", filter);

        let conn = self.pool.get()?;

        let mut query = String::from(
            "SELECT id, timestamp, systolic, diastolic, pulse, glucose, notes
             FROM measurements",
        );

        let mut where_clauses = Vec::new();
        let mut params: Vec<&dyn ToSql> = Vec::new();

        // Owned copies of the formatted bounds so they live until the query runs
        let since_stamp = filter.since.map(|t| t.format(TIMESTAMP_FORMAT).to_string());
        let until_stamp = filter.until.map(|t| t.format(TIMESTAMP_FORMAT).to_string());

        if let Some(ref since) = since_stamp {
            where_clauses.push("timestamp >= ?");
            params.push(since as &dyn ToSql);
        }

        if let Some(ref until) = until_stamp {
            where_clauses.push("timestamp <= ?");
            params.push(until as &dyn ToSql);
        }

        if !where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clauses.join(" AND "));
        }

        // Ties on the second-resolution timestamp fall back to insert order
        query.push_str(" ORDER BY timestamp DESC, id DESC");

        if let Some(limit) = filter.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), row_to_measurement)?;

        let mut measurements = Vec::new();
        for row in rows {
            measurements.push(row?);
        }

        debug!("Listed {} measurements", measurements.len());
        Ok(measurements)
    }

    /// Delete a measurement by id. Returns whether a row was removed.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM measurements WHERE id = ?1", params![id])?;

        if deleted > 0 {
            debug!("Deleted measurement: id={}", id);
        } else {
            warn!("No measurement to delete: id={}", id);
        }

        Ok(deleted > 0)
    }

    /// Overwrite the vitals and notes of a previously inserted record,
    /// keeping its id and original timestamp. Returns whether a row was
    /// rewritten.
    pub fn update(&self, measurement: &Measurement) -> Result<bool, StoreError> {
        let id = measurement.id.ok_or(StoreError::MissingId)?;
        validate(measurement)?;

        let conn = self.pool.get()?;
        let updated = conn.execute(
            "UPDATE measurements
             SET systolic = ?1, diastolic = ?2, pulse = ?3, glucose = ?4, notes = ?5
             WHERE id = ?6",
            (
                measurement.systolic,
                measurement.diastolic,
                measurement.pulse,
                measurement.glucose,
                &measurement.notes,
                id,
            ),
        )?;

        if updated > 0 {
            debug!("Updated measurement: id={}", id);
        } else {
            warn!("No measurement to update: id={}", id);
        }

        Ok(updated > 0)
    }

    /// Aggregate statistics over the whole store. An empty store yields
    /// zeroed means and no timestamps rather than an error.
    pub fn statistics(&self) -> Result<MeasurementStats, StoreError> {
        let conn = self.pool.get()?;

        let stats = conn.query_row(
            "SELECT COUNT(*), AVG(systolic), AVG(diastolic), AVG(pulse), AVG(glucose),
                    MIN(timestamp), MAX(timestamp)
             FROM measurements",
            [],
            |row| {
                let first: Option<String> = row.get(5)?;
                let last: Option<String> = row.get(6)?;

                Ok(MeasurementStats {
                    total: row.get::<_, i64>(0)? as u64,
                    avg_systolic: round1(row.get::<_, Option<f64>>(1)?.unwrap_or(0.0)),
                    avg_diastolic: round1(row.get::<_, Option<f64>>(2)?.unwrap_or(0.0)),
                    avg_pulse: round1(row.get::<_, Option<f64>>(3)?.unwrap_or(0.0)),
                    avg_glucose: round1(row.get::<_, Option<f64>>(4)?.unwrap_or(0.0)),
                    first_taken_at: first.as_deref().map(|s| parse_timestamp(5, s)).transpose()?,
                    last_taken_at: last.as_deref().map(|s| parse_timestamp(6, s)).transpose()?,
                })
            },
        )?;

        Ok(stats)
    }
}

/// Per-connection pragmas applied by the pool on checkout
fn apply_pragmas(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;",
    )
}

/// Map a SELECTed row onto a measurement record
fn row_to_measurement(row: &Row<'_>) -> rusqlite::Result<Measurement> {
    let timestamp: String = row.get(1)?;

    Ok(Measurement {
        id: Some(row.get(0)?),
        taken_at: Some(parse_timestamp(1, &timestamp)?),
        systolic: row.get::<_, i32>(2)? as u16,
        diastolic: row.get::<_, i32>(3)? as u16,
        pulse: row.get::<_, i32>(4)? as u16,
        glucose: row.get::<_, Option<i32>>(5)?.map(|g| g as u16),
        notes: row.get(6)?,
    })
}

/// Parse a stored timestamp, surfacing malformed text as a column
/// conversion failure
fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Round to one decimal place, the precision statistics are reported at
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
