//! Classifier seam between the model handle and artifact backends

use crate::types::{FeatureVector, Label};
use anyhow::Result;

/// A trained binary classifier over 106-wide feature vectors.
///
/// Implementations score whole batches; single-vector calls go through a
/// batch of one.
pub trait Classifier: Send + Sync {
    /// Backend name for logs (e.g. "onnx", "logistic-json")
    fn backend(&self) -> &str;

    /// P(fraud) for each row, in row order
    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<f64>>;

    /// Predicted class for each row, in row order.
    ///
    /// Defaults to the logistic decision rule `p > 0.5`.
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<Label>> {
        Ok(self
            .predict_proba(rows)?
            .into_iter()
            .map(Label::from_probability)
            .collect())
    }
}
