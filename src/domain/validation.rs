//! Boundary validation of raw patient records.
//!
//! The intake form submits loosely typed fields (numbers, numeric strings,
//! checkbox booleans). `validate` is the only gate between that input and
//! the typed pipeline: it coerces, range-checks every field, and reports
//! every violation at once.

use serde::Serialize;
use serde_json::{Map, Value};

use super::patient::{
    AdmissionType, Comorbidities, Gender, NumericValues, PatientObservation,
    ADMISSION_TYPE_FIELD, BINARY_FIELDS, NUMERIC_BOUNDS,
};

/// Untyped field map as submitted by the form.
pub type RawPatientRecord = Map<String, Value>;

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind")]
pub enum ValidationError {
    #[error("{field}: expected a number, got {got}")]
    TypeMismatch { field: &'static str, got: String },

    #[error("{field}: {got} out of range [{min}, {max}]")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        got: f64,
    },

    #[error("{field}: {got} is not one of Emergency, Urgent, Elective")]
    InvalidEnum { field: &'static str, got: String },
}

impl ValidationError {
    /// Name of the offending field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::TypeMismatch { field, .. }
            | Self::RangeViolation { field, .. }
            | Self::InvalidEnum { field, .. } => field,
        }
    }
}

/// Every violation found in one record, in field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Offending field names, in field order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(ValidationError::field).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "missing".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => format!("{s:?}"),
        Some(Value::Array(_)) => "array".to_string(),
        Some(Value::Object(_)) => "object".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Coerce a raw value to a finite number.
///
/// Accepts JSON numbers, numeric strings (surrounding whitespace allowed)
/// and booleans (checkbox fields). Empty strings, null, and containers do
/// not coerce.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn check_numeric(
    raw: &RawPatientRecord,
    field: &'static str,
    min: f64,
    max: f64,
    errors: &mut Vec<ValidationError>,
) -> Option<f64> {
    let value = raw.get(field);
    let Some(n) = coerce_number(value) else {
        errors.push(ValidationError::TypeMismatch {
            field,
            got: describe(value),
        });
        return None;
    };
    if !(min..=max).contains(&n) {
        errors.push(ValidationError::RangeViolation {
            field,
            min,
            max,
            got: n,
        });
        return None;
    }
    Some(n)
}

fn check_binary(
    raw: &RawPatientRecord,
    field: &'static str,
    errors: &mut Vec<ValidationError>,
) -> Option<bool> {
    let n = check_numeric(raw, field, 0.0, 1.0, errors)?;
    if n == 0.0 {
        Some(false)
    } else if n == 1.0 {
        Some(true)
    } else {
        // In range but fractional.
        errors.push(ValidationError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            got: n,
        });
        None
    }
}

fn check_admission_type(
    raw: &RawPatientRecord,
    errors: &mut Vec<ValidationError>,
) -> Option<AdmissionType> {
    let value = raw.get(ADMISSION_TYPE_FIELD);
    let parsed = match value {
        Some(Value::String(s)) if !s.is_empty() => s.parse::<AdmissionType>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(ValidationError::InvalidEnum {
            field: ADMISSION_TYPE_FIELD,
            got: describe(value),
        });
    }
    parsed
}

/// Validate a raw record into a [`PatientObservation`].
///
/// Total: every field is checked, and all violations are returned together.
/// Unknown keys (such as a record `id`) are ignored.
///
/// # Errors
/// Returns every `TypeMismatch`, `RangeViolation` and `InvalidEnum` found.
pub fn validate(raw: &RawPatientRecord) -> Result<PatientObservation, ValidationErrors> {
    let mut errors = Vec::new();

    let mut numeric: NumericValues = [0.0; NUMERIC_BOUNDS.len()];
    for (slot, bound) in numeric.iter_mut().zip(NUMERIC_BOUNDS.iter()) {
        if let Some(v) = check_numeric(raw, bound.field, bound.min, bound.max, &mut errors) {
            *slot = v;
        }
    }

    let mut flags = [false; BINARY_FIELDS.len()];
    for (slot, field) in flags.iter_mut().zip(BINARY_FIELDS) {
        if let Some(v) = check_binary(raw, field, &mut errors) {
            *slot = v;
        }
    }

    let admission_type = check_admission_type(raw, &mut errors);

    // Any failed check left an entry in `errors`.
    match admission_type {
        Some(admission_type) if errors.is_empty() => {
            let [male, diabetes, hypertension, copd, asthma, chf, ckd, cancer] = flags;
            let gender = if male { Gender::Male } else { Gender::Female };
            let comorbidities = Comorbidities {
                diabetes,
                hypertension,
                copd,
                asthma,
                chf,
                ckd,
                cancer,
            };
            Ok(PatientObservation::from_parts(
                numeric,
                gender,
                comorbidities,
                admission_type,
            ))
        }
        _ => Err(ValidationErrors(errors)),
    }
}
