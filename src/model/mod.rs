//! Prediction invoker wrapping the frozen classifier artifact.
//!
//! The artifact is a JSON bundle produced by the training pipeline: an
//! artifact version, the per-column category vocabularies used at training
//! time, and the fitted random forest itself. It is deserialized once at
//! startup and held as immutable shared state; a load failure prevents the
//! service from starting.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{Error, Result};
use crate::models::{FeatureRecord, Outcome};

/// Serialized model bundle, frozen at training time.
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    /// Category vocabularies, column name to ordered category list. A
    /// category encodes to its position; the order must match training.
    pub categories: HashMap<String, Vec<String>>,
    pub forest: RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>,
}

pub struct Predictor {
    artifact: ModelArtifact,
}

impl Predictor {
    /// Deserialize the artifact from disk. Fatal at startup on failure.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open model artifact {}", path.display()))?;
        let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("cannot decode model artifact {}", path.display()))?;
        Ok(Self { artifact })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn version(&self) -> &str {
        &self.artifact.version
    }

    /// Classify one feature record. Deterministic for a fixed artifact.
    pub fn predict(&self, features: &FeatureRecord) -> Result<Outcome> {
        let row = self.encode(features);
        let x = DenseMatrix::from_2d_vec(&vec![row]);
        let classes = self
            .artifact
            .forest
            .predict(&x)
            .map_err(|e| Error::Model(e.to_string()))?;
        let class = classes
            .first()
            .copied()
            .ok_or_else(|| Error::Model("classifier returned no prediction".into()))?;
        Ok(Outcome::from_class(class))
    }

    /// Encode a feature record into the fixed column order the forest was
    /// trained on.
    fn encode(&self, features: &FeatureRecord) -> Vec<f64> {
        vec![
            self.category("gender", &features.gender),
            features.age as f64,
            self.category("hypertension", &features.hypertension),
            self.category("heart_disease", &features.heart_disease),
            self.category("smoking_history", &features.smoking_history),
            features.bmi,
            features.hba1c_level,
            features.blood_glucose_level as f64,
        ]
    }

    // A category outside the training vocabulary encodes to 0.0 without an
    // error, which silently yields a wrong prediction. That matches the
    // training pipeline's behavior; there is no vocabulary validation here.
    fn category(&self, column: &str, value: &str) -> f64 {
        self.artifact
            .categories
            .get(column)
            .and_then(|vocab| vocab.iter().position(|v| v == value))
            .map(|i| i as f64)
            .unwrap_or(0.0)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{fitted_artifact, fitted_predictor};
    use super::*;

    fn sample_features() -> FeatureRecord {
        FeatureRecord {
            gender: "Female".into(),
            age: 45,
            hypertension: "yes".into(),
            heart_disease: "no".into(),
            smoking_history: "never".into(),
            bmi: 27.5,
            hba1c_level: 6.1,
            blood_glucose_level: 140,
        }
    }

    #[test]
    fn prediction_is_deterministic() {
        let predictor = fitted_predictor();
        let first = predictor.predict(&sample_features()).unwrap();
        let second = predictor.predict(&sample_features()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn prediction_is_a_binary_label() {
        let predictor = fitted_predictor();
        let outcome = predictor.predict(&sample_features()).unwrap();
        assert!(matches!(outcome, Outcome::Diabetic | Outcome::NotDiabetic));
    }

    #[test]
    fn unknown_category_predicts_silently() {
        let predictor = fitted_predictor();
        let mut features = sample_features();
        features.smoking_history = "not in vocabulary".into();
        // Wrong encoding, but never an error.
        assert!(predictor.predict(&features).is_ok());
    }

    #[test]
    fn artifact_survives_a_serde_round_trip() {
        let artifact = fitted_artifact();
        let baseline = Predictor::from_artifact(fitted_artifact())
            .predict(&sample_features())
            .unwrap();

        let encoded = serde_json::to_string(&artifact).unwrap();
        let decoded: ModelArtifact = serde_json::from_str(&encoded).unwrap();
        let reloaded = Predictor::from_artifact(decoded);

        assert_eq!(reloaded.version(), "test-1");
        assert_eq!(reloaded.predict(&sample_features()).unwrap(), baseline);
    }
}
