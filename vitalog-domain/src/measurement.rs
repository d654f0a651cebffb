use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Timestamp layout used everywhere a measurement is rendered or persisted.
/// Lexicographic order of stamps in this layout matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Domain model for a single captured measurement: blood pressure, pulse
/// and an optional glucose reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Measurement {
    /// Identity assigned by the store on insert; `None` for transient records
    pub id: Option<i64>,

    /// When the measurement was taken; filled with the insert time when unset
    pub taken_at: Option<NaiveDateTime>,

    /// Systolic blood pressure in mmHg (the higher number)
    #[validate(range(min = 70, max = 250, message = "Systolic pressure must be between 70 and 250 mmHg"))]
    pub systolic: u16,

    /// Diastolic blood pressure in mmHg (the lower number)
    #[validate(range(min = 40, max = 150, message = "Diastolic pressure must be between 40 and 150 mmHg"))]
    pub diastolic: u16,

    /// Pulse rate in beats per minute
    #[validate(range(min = 30, max = 200, message = "Pulse must be between 30 and 200 bpm"))]
    pub pulse: u16,

    /// Optional blood glucose reading in mg/dL
    #[validate(range(min = 50, max = 500, message = "Glucose must be between 50 and 500 mg/dL"))]
    pub glucose: Option<u16>,

    /// Optional free-text notes about the reading
    pub notes: Option<String>,
}

impl Measurement {
    /// Create a transient measurement from the three mandatory vitals.
    /// The store assigns `id` and `taken_at` on insert.
    pub fn new(systolic: u16, diastolic: u16, pulse: u16) -> Self {
        Self {
            id: None,
            taken_at: None,
            systolic,
            diastolic,
            pulse,
            glucose: None,
            notes: None,
        }
    }

    /// Attach a glucose reading.
    pub fn with_glucose(mut self, glucose: u16) -> Self {
        self.glucose = Some(glucose);
        self
    }

    /// Pin the measurement to a specific time instead of the insert time.
    pub fn with_taken_at(mut self, taken_at: NaiveDateTime) -> Self {
        self.taken_at = Some(taken_at);
        self
    }

    /// Attach free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
