// Vitalog Data
// This crate owns the SQLite persistence of measurement records

// Store configuration
pub mod config;

// Error type for store operations
pub mod errors;

// Schema creation and upgrades
pub mod migrations;

// The measurement store itself
pub mod store;

// Re-export the surface callers work with
pub use config::StoreConfig;
pub use errors::StoreError;
pub use store::{ListFilter, MeasurementStats, MeasurementStore};
