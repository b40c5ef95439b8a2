//! Logistic regression scored from exported parameters

use crate::models::classifier::Classifier;
use crate::types::{FeatureVector, FEATURE_COUNT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Logistic regression parameters as exported from the training notebook
/// (`coef_[0]` and `intercept_[0]` of the fitted estimator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight per feature slot
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load parameters from a JSON artifact
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {:?}", path))?;
        let model: LogisticModel = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model parameters in {:?}", path))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.len() != FEATURE_COUNT {
            anyhow::bail!(
                "model has {} coefficients, expected {}",
                self.coefficients.len(),
                FEATURE_COUNT
            );
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            anyhow::bail!("model parameters must be finite");
        }
        Ok(())
    }

    /// Linear score `w·x + b`
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LogisticModel {
    fn backend(&self) -> &str {
        "logistic-json"
    }

    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        Ok(rows
            .iter()
            .map(|row| sigmoid(self.decision_function(row)))
            .collect())
    }
}

/// Numerically stable logistic function
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Label;

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_predictions_follow_decision_rule() {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = 0.01;
        let model = LogisticModel::new(coefficients, -5.0).unwrap();

        let mut low = FeatureVector::zeroed();
        low.set(0, 100.0);
        let mut high = FeatureVector::zeroed();
        high.set(0, 900.0);

        let probs = model.predict_proba(&[low.clone(), high.clone()]).unwrap();
        assert!(probs[0] < 0.5);
        assert!(probs[1] > 0.5);

        let labels = model.predict(&[low, high]).unwrap();
        assert_eq!(labels, vec![Label::Legitimate, Label::Fraudulent]);
    }

    #[test]
    fn test_wrong_width_rejected() {
        assert!(LogisticModel::new(vec![0.1; 13], 0.0).is_err());
        assert!(LogisticModel::new(vec![f64::NAN; FEATURE_COUNT], 0.0).is_err());
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = LogisticModel::new(vec![0.5; FEATURE_COUNT], -1.0).unwrap();
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

        let loaded = LogisticModel::from_json_file(&path).unwrap();
        assert_eq!(loaded.coefficients.len(), FEATURE_COUNT);
        assert_eq!(loaded.intercept, -1.0);

        std::fs::write(&path, "{not json").unwrap();
        assert!(LogisticModel::from_json_file(&path).is_err());
    }
}
