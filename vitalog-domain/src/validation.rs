use thiserror::Error;
use validator::Validate;

use crate::measurement::Measurement;

/// Inclusive bounds for one measured vital, as carried in validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalRange {
    /// Label used when the bound is reported to the user
    pub label: &'static str,

    /// Lower inclusive bound
    pub min: u16,

    /// Upper inclusive bound
    pub max: u16,

    /// Unit suffix used when the bound is reported to the user
    pub unit: &'static str,
}

/// Permitted systolic pressure range in mmHg.
pub const SYSTOLIC_RANGE: VitalRange = VitalRange {
    label: "Systolic pressure",
    min: 70,
    max: 250,
    unit: "mmHg",
};

/// Permitted diastolic pressure range in mmHg.
pub const DIASTOLIC_RANGE: VitalRange = VitalRange {
    label: "Diastolic pressure",
    min: 40,
    max: 150,
    unit: "mmHg",
};

/// Permitted pulse range in beats per minute.
pub const PULSE_RANGE: VitalRange = VitalRange {
    label: "Pulse",
    min: 30,
    max: 200,
    unit: "bpm",
};

/// Permitted glucose range in mg/dL.
pub const GLUCOSE_RANGE: VitalRange = VitalRange {
    label: "Glucose",
    min: 50,
    max: 500,
    unit: "mg/dL",
};

/// Field and bound pairs in the order range failures are reported.
const CHECK_ORDER: [(&str, VitalRange); 4] = [
    ("systolic", SYSTOLIC_RANGE),
    ("diastolic", DIASTOLIC_RANGE),
    ("pulse", PULSE_RANGE),
    ("glucose", GLUCOSE_RANGE),
];

/// Why a measurement was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A vital fell outside its permitted range
    #[error("{} must be between {} and {} {}", .0.label, .0.min, .0.max, .0.unit)]
    OutOfRange(VitalRange),

    /// Systolic pressure did not exceed diastolic pressure
    #[error("Systolic pressure must be greater than diastolic pressure")]
    InconsistentReading,
}

/// Validate a measurement, reporting only the first failing rule.
///
/// Ranges are checked in field order (systolic, diastolic, pulse, glucose);
/// the systolic/diastolic consistency rule runs last, so a reading that is
/// both out of range and inconsistent reports the range failure.
pub fn validate(measurement: &Measurement) -> Result<(), ValidationError> {
    if let Err(errors) = Validate::validate(measurement) {
        let fields = errors.field_errors();
        for (field, range) in CHECK_ORDER {
            if fields.contains_key(field) {
                return Err(ValidationError::OutOfRange(range));
            }
        }
    }

    if measurement.systolic <= measurement.diastolic {
        return Err(ValidationError::InconsistentReading);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_a_reading_with_all_fields_in_range() {
        let measurement = Measurement::new(120, 80, 72).with_glucose(95);
        assert!(validate(&measurement).is_ok());
    }

    #[test]
    fn test_accepts_missing_glucose() {
        assert!(validate(&Measurement::new(120, 80, 72)).is_ok());
    }

    #[test]
    fn test_accepts_boundary_values() {
        // Lower bounds
        assert!(validate(&Measurement::new(70, 40, 30).with_glucose(50)).is_ok());

        // Upper bounds
        assert!(validate(&Measurement::new(250, 150, 200).with_glucose(500)).is_ok());
    }

    #[test]
    fn test_rejects_systolic_out_of_range() {
        let error = validate(&Measurement::new(69, 40, 72)).unwrap_err();
        assert_eq!(error, ValidationError::OutOfRange(SYSTOLIC_RANGE));
        assert_eq!(
            error.to_string(),
            "Systolic pressure must be between 70 and 250 mmHg"
        );

        assert!(validate(&Measurement::new(251, 80, 72)).is_err());
    }

    #[test]
    fn test_rejects_diastolic_out_of_range() {
        let error = validate(&Measurement::new(120, 39, 72)).unwrap_err();
        assert_eq!(error, ValidationError::OutOfRange(DIASTOLIC_RANGE));
        assert_eq!(
            error.to_string(),
            "Diastolic pressure must be between 40 and 150 mmHg"
        );

        assert!(validate(&Measurement::new(200, 151, 72)).is_err());
    }

    #[test]
    fn test_rejects_pulse_out_of_range() {
        let error = validate(&Measurement::new(120, 80, 29)).unwrap_err();
        assert_eq!(error, ValidationError::OutOfRange(PULSE_RANGE));
        assert_eq!(error.to_string(), "Pulse must be between 30 and 200 bpm");

        assert!(validate(&Measurement::new(120, 80, 201)).is_err());
    }

    #[test]
    fn test_rejects_glucose_out_of_range() {
        let error = validate(&Measurement::new(120, 80, 72).with_glucose(49)).unwrap_err();
        assert_eq!(error, ValidationError::OutOfRange(GLUCOSE_RANGE));
        assert_eq!(error.to_string(), "Glucose must be between 50 and 500 mg/dL");

        assert!(validate(&Measurement::new(120, 80, 72).with_glucose(501)).is_err());
    }

    #[test]
    fn test_reports_the_first_failing_field() {
        // Systolic and pulse both out of range: systolic wins
        let error = validate(&Measurement::new(260, 80, 220)).unwrap_err();
        assert_eq!(error, ValidationError::OutOfRange(SYSTOLIC_RANGE));

        // Diastolic and glucose both out of range: diastolic wins
        let error = validate(&Measurement::new(120, 30, 72).with_glucose(40)).unwrap_err();
        assert_eq!(error, ValidationError::OutOfRange(DIASTOLIC_RANGE));
    }

    #[test]
    fn test_rejects_systolic_not_greater_than_diastolic() {
        // Equal values
        let error = validate(&Measurement::new(120, 120, 72)).unwrap_err();
        assert_eq!(error, ValidationError::InconsistentReading);
        assert_eq!(
            error.to_string(),
            "Systolic pressure must be greater than diastolic pressure"
        );

        // Inverted values
        let error = validate(&Measurement::new(90, 100, 72)).unwrap_err();
        assert_eq!(error, ValidationError::InconsistentReading);
    }

    #[test]
    fn test_range_failures_beat_the_consistency_rule() {
        // Glucose out of range on an inconsistent reading: the range error
        // is reported, not the consistency error
        let measurement = Measurement::new(100, 120, 72).with_glucose(40);
        let error = validate(&measurement).unwrap_err();
        assert_eq!(error, ValidationError::OutOfRange(GLUCOSE_RANGE));
    }
}
