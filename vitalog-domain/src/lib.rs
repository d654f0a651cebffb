// Vitalog Domain
// This crate contains the measurement rules for the vitalog health tracker

// Measurement record and timestamp layout
pub mod measurement;

// Range and consistency validation
pub mod validation;

// Blood pressure classification table
pub mod classification;

// Re-export the surface the other crates work with
pub use classification::{classify, Category};
pub use measurement::{Measurement, TIMESTAMP_FORMAT};
pub use validation::{validate, ValidationError, VitalRange};
