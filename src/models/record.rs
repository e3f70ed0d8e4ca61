use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalized input fed to the classifier, one per request.
///
/// `hypertension` and `heart_disease` carry the categorical "yes"/"no"
/// encoding the model was trained on. The serialized key for the HbA1c
/// column keeps the training-set capitalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub gender: String,
    pub age: i64,
    pub hypertension: String,
    pub heart_disease: String,
    pub smoking_history: String,
    pub bmi: f64,
    #[serde(rename = "HbA1c_level")]
    pub hba1c_level: f64,
    pub blood_glucose_level: i64,
}

/// Predicted class, straight from the raw binary class index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Diabetic,
    NotDiabetic,
}

impl Outcome {
    pub fn from_class(class: i32) -> Self {
        if class == 1 {
            Outcome::Diabetic
        } else {
            Outcome::NotDiabetic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Diabetic => "Diabetic",
            Outcome::NotDiabetic => "NotDiabetic",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-assigned record identifier.
///
/// The relational and in-memory backends hand out sequential integers, the
/// document backend hands out opaque UUIDs. Serializes untagged so clients
/// see a plain number or string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Seq(i64),
    Doc(Uuid),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Seq(id) => write!(f, "{id}"),
            RecordId::Doc(id) => write!(f, "{id}"),
        }
    }
}

/// A patient record ready to be persisted, before the store assigns an id.
///
/// The binary flags are stored back as 0/1 integers, matching the incoming
/// wire format rather than the model's categorical encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatientRecord {
    pub gender: String,
    pub age: i64,
    pub hypertension: i64,
    pub heart_disease: i64,
    pub smoking_history: String,
    pub bmi: f64,
    pub hba1c_level: f64,
    pub blood_glucose_level: i64,
    pub result: String,
}

impl NewPatientRecord {
    pub fn from_prediction(features: &FeatureRecord, outcome: Outcome) -> Self {
        Self {
            gender: features.gender.clone(),
            age: features.age,
            hypertension: i64::from(features.hypertension == "yes"),
            heart_disease: i64::from(features.heart_disease == "yes"),
            smoking_history: features.smoking_history.clone(),
            bmi: features.bmi,
            hba1c_level: features.hba1c_level,
            blood_glucose_level: features.blood_glucose_level,
            result: outcome.as_str().to_owned(),
        }
    }
}

/// Durable patient record as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: RecordId,
    pub gender: String,
    pub age: i64,
    pub hypertension: i64,
    pub heart_disease: i64,
    pub smoking_history: String,
    pub bmi: f64,
    pub hba1c_level: f64,
    pub blood_glucose_level: i64,
    pub result: String,
}

impl PatientRecord {
    pub fn with_id(id: RecordId, new: &NewPatientRecord) -> Self {
        Self {
            id,
            gender: new.gender.clone(),
            age: new.age,
            hypertension: new.hypertension,
            heart_disease: new.heart_disease,
            smoking_history: new.smoking_history.clone(),
            bmi: new.bmi,
            hba1c_level: new.hba1c_level,
            blood_glucose_level: new.blood_glucose_level,
            result: new.result.clone(),
        }
    }
}
