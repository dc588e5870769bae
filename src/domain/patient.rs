//! Patient observation types for in-hospital outcome scoring.
//!
//! A `PatientObservation` can only be obtained from [`validate`](super::validate),
//! so every instance in circulation satisfies the field bounds below.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed numeric bound for one raw record field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBound {
    /// Key in the raw record
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldBound {
    const fn new(field: &'static str, min: f64, max: f64) -> Self {
        Self { field, min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Continuous vitals and labs, in record order.
pub const NUMERIC_BOUNDS: [FieldBound; 13] = [
    FieldBound::new("age", 18.0, 120.0),
    FieldBound::new("heart_rate", 30.0, 220.0),
    FieldBound::new("systolic_bp", 50.0, 250.0),
    FieldBound::new("diastolic_bp", 30.0, 150.0),
    FieldBound::new("respiration_rate", 4.0, 60.0),
    FieldBound::new("temperature", 32.0, 43.0),
    FieldBound::new("oxygen_saturation", 50.0, 100.0),
    FieldBound::new("wbc_count", 0.5, 50.0),
    FieldBound::new("hemoglobin", 3.0, 25.0),
    FieldBound::new("platelet_count", 5.0, 1000.0),
    FieldBound::new("sodium", 110.0, 180.0),
    FieldBound::new("potassium", 2.0, 9.0),
    FieldBound::new("creatinine", 0.2, 20.0),
];

/// Fields that must be exactly 0 or 1.
pub const BINARY_FIELDS: [&str; 8] = [
    "gender",
    "diabetes",
    "hypertension",
    "copd",
    "asthma",
    "chf",
    "ckd",
    "cancer",
];

/// Key of the admission type field.
pub const ADMISSION_TYPE_FIELD: &str = "admission_type";

/// Binary sex code as captured by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

/// How the patient was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionType {
    Emergency,
    Urgent,
    Elective,
}

impl AdmissionType {
    pub const ALL: [Self; 3] = [Self::Emergency, Self::Urgent, Self::Elective];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "Emergency",
            Self::Urgent => "Urgent",
            Self::Elective => "Elective",
        }
    }
}

impl FromStr for AdmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown admission type '{s}'"))
    }
}

impl std::fmt::Display for AdmissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comorbidity flags. Cancer counts as a contributor alongside the six
/// chronic conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comorbidities {
    pub diabetes: bool,
    pub hypertension: bool,
    pub copd: bool,
    pub asthma: bool,
    pub chf: bool,
    pub ckd: bool,
    pub cancer: bool,
}

impl Comorbidities {
    /// Number of flags set (0..=7).
    #[must_use]
    pub fn count(&self) -> u8 {
        [
            self.diabetes,
            self.hypertension,
            self.copd,
            self.asthma,
            self.chf,
            self.ckd,
            self.cancer,
        ]
        .into_iter()
        .map(u8::from)
        .sum()
    }
}

/// Validated clinical snapshot of one patient.
///
/// Fields are private: the only constructor is the validator, and nothing
/// mutates an observation once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientObservation {
    age: f64,
    gender: Gender,
    heart_rate: f64,
    systolic_bp: f64,
    diastolic_bp: f64,
    respiration_rate: f64,
    temperature_c: f64,
    oxygen_saturation_pct: f64,
    wbc_count: f64,
    hemoglobin: f64,
    platelet_count: f64,
    sodium: f64,
    potassium: f64,
    creatinine: f64,
    comorbidities: Comorbidities,
    admission_type: AdmissionType,
}

/// Continuous values in `NUMERIC_BOUNDS` order, handed over by the validator.
pub(crate) type NumericValues = [f64; 13];

impl PatientObservation {
    pub(crate) fn from_parts(
        numeric: NumericValues,
        gender: Gender,
        comorbidities: Comorbidities,
        admission_type: AdmissionType,
    ) -> Self {
        let [
            age,
            heart_rate,
            systolic_bp,
            diastolic_bp,
            respiration_rate,
            temperature_c,
            oxygen_saturation_pct,
            wbc_count,
            hemoglobin,
            platelet_count,
            sodium,
            potassium,
            creatinine,
        ] = numeric;
        Self {
            age,
            gender,
            heart_rate,
            systolic_bp,
            diastolic_bp,
            respiration_rate,
            temperature_c,
            oxygen_saturation_pct,
            wbc_count,
            hemoglobin,
            platelet_count,
            sodium,
            potassium,
            creatinine,
            comorbidities,
            admission_type,
        }
    }

    /// Age in years (18-120)
    #[must_use]
    pub fn age(&self) -> f64 {
        self.age
    }

    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Heart rate in bpm (30-220)
    #[must_use]
    pub fn heart_rate(&self) -> f64 {
        self.heart_rate
    }

    /// Systolic blood pressure in mmHg (50-250)
    #[must_use]
    pub fn systolic_bp(&self) -> f64 {
        self.systolic_bp
    }

    /// Diastolic blood pressure in mmHg (30-150)
    #[must_use]
    pub fn diastolic_bp(&self) -> f64 {
        self.diastolic_bp
    }

    /// Breaths per minute (4-60)
    #[must_use]
    pub fn respiration_rate(&self) -> f64 {
        self.respiration_rate
    }

    /// Body temperature in °C (32-43)
    #[must_use]
    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    /// SpO2 in % (50-100)
    #[must_use]
    pub fn oxygen_saturation_pct(&self) -> f64 {
        self.oxygen_saturation_pct
    }

    /// White blood cells, 10^3/µL (0.5-50)
    #[must_use]
    pub fn wbc_count(&self) -> f64 {
        self.wbc_count
    }

    /// Hemoglobin in g/dL (3-25)
    #[must_use]
    pub fn hemoglobin(&self) -> f64 {
        self.hemoglobin
    }

    /// Platelets, 10^3/µL (5-1000)
    #[must_use]
    pub fn platelet_count(&self) -> f64 {
        self.platelet_count
    }

    /// Sodium in mEq/L (110-180)
    #[must_use]
    pub fn sodium(&self) -> f64 {
        self.sodium
    }

    /// Potassium in mEq/L (2-9)
    #[must_use]
    pub fn potassium(&self) -> f64 {
        self.potassium
    }

    /// Serum creatinine in mg/dL (0.2-20)
    #[must_use]
    pub fn creatinine(&self) -> f64 {
        self.creatinine
    }

    #[must_use]
    pub fn comorbidities(&self) -> Comorbidities {
        self.comorbidities
    }

    #[must_use]
    pub fn admission_type(&self) -> AdmissionType {
        self.admission_type
    }
}

impl Default for PatientObservation {
    /// The intake form's pre-filled record.
    fn default() -> Self {
        Self::from_parts(
            [
                65.0, 80.0, 130.0, 85.0, 18.0, 37.2, 96.0, 8.5, 14.0, 250.0, 140.0, 4.1, 1.1,
            ],
            Gender::Male,
            Comorbidities::default(),
            AdmissionType::Emergency,
        )
    }
}
