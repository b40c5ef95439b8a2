//! ONNX Runtime backend for exported classifiers

use crate::models::classifier::Classifier;
use crate::types::{FeatureVector, Label, FEATURE_COUNT};
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier backed by an ONNX Runtime session.
///
/// Expects a scikit-learn style export: a float input of shape
/// `[N, 106]`, a label output and a `[N, 2]` probability tensor (export with
/// zipmap disabled).
pub struct OnnxClassifier {
    /// Session run needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    probability_output: String,
    label_output: Option<String>,
}

impl OnnxClassifier {
    /// Load an ONNX model from file
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "probabilities".to_string());

        info!(
            input = %input_name,
            probabilities = %probability_output,
            label = ?label_output,
            "ONNX model loaded successfully"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            probability_output,
            label_output,
        })
    }

    /// Run the session once over all rows and return (P(fraud), labels)
    fn run(&self, rows: &[FeatureVector]) -> Result<(Vec<f64>, Option<Vec<Label>>)> {
        let mut data = Vec::with_capacity(rows.len() * FEATURE_COUNT);
        for row in rows {
            data.extend(row.to_f32());
        }

        // Prepare input tensor - shape [rows, num_features]
        let shape = vec![rows.len() as i64, FEATURE_COUNT as i64];
        let input_tensor =
            Tensor::from_array((shape, data)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        let probabilities = self.extract_probabilities(&outputs, rows.len())?;
        let labels = match &self.label_output {
            Some(name) => Some(extract_labels(&outputs, name, rows.len())?),
            None => None,
        };

        debug!(rows = rows.len(), "ONNX inference complete");

        Ok((probabilities, labels))
    }

    /// Extract the fraud-class column from the probability output
    fn extract_probabilities(&self, outputs: &SessionOutputs, rows: usize) -> Result<Vec<f64>> {
        let output = outputs
            .get(&self.probability_output)
            .with_context(|| format!("Model has no output named {}", self.probability_output))?;

        let (shape, data) = output.try_extract_tensor::<f32>().context(
            "Probability output is not a float tensor; export the model with zipmap disabled",
        )?;

        let dims: Vec<i64> = shape.iter().copied().collect();
        fraud_probabilities(&dims, data, rows)
    }
}

/// Pick P(fraud) per row out of a flat probability tensor.
///
/// `[rows, classes]` holds one column per class and the fraud class is
/// index 1; `[rows, 1]` and `[rows]` already hold P(fraud).
fn fraud_probabilities(dims: &[i64], data: &[f32], rows: usize) -> Result<Vec<f64>> {
    let columns = match dims {
        [_, classes] => *classes as usize,
        [_] => 1,
        _ => anyhow::bail!("Unexpected probability output shape {:?}", dims),
    };

    if columns == 0 || data.len() != rows * columns {
        anyhow::bail!(
            "Probability output has {} values for {} rows",
            data.len(),
            rows
        );
    }

    let fraud_column = if columns >= 2 { 1 } else { 0 };
    Ok((0..rows)
        .map(|row| (data[row * columns + fraud_column] as f64).clamp(0.0, 1.0))
        .collect())
}

fn extract_labels(outputs: &SessionOutputs, name: &str, rows: usize) -> Result<Vec<Label>> {
    let output = outputs
        .get(name)
        .with_context(|| format!("Model has no output named {}", name))?;

    let (_, data) = output
        .try_extract_tensor::<i64>()
        .context("Label output is not an int64 tensor")?;

    if data.len() != rows {
        anyhow::bail!("Label output has {} values for {} rows", data.len(), rows);
    }

    Ok(data.iter().map(|&class| Label::from_class(class)).collect())
}

impl Classifier for OnnxClassifier {
    fn backend(&self) -> &str {
        "onnx"
    }

    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.run(rows)?.0)
    }

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<Label>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let (probabilities, labels) = self.run(rows)?;
        Ok(labels.unwrap_or_else(|| {
            probabilities
                .into_iter()
                .map(Label::from_probability)
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_class_output_uses_fraud_column() {
        let data = [0.9, 0.1, 0.25, 0.75, 0.5, 0.5];
        let probabilities = fraud_probabilities(&[3, 2], &data, 3).unwrap();
        assert_eq!(probabilities.len(), 3);
        assert!((probabilities[0] - 0.1).abs() < 1e-6);
        assert!((probabilities[1] - 0.75).abs() < 1e-6);
        assert!((probabilities[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_single_column_output_is_fraud_probability() {
        let probabilities = fraud_probabilities(&[2], &[0.2, 1.3], 2).unwrap();
        assert!((probabilities[0] - 0.2).abs() < 1e-6);
        assert_eq!(probabilities[1], 1.0);

        let probabilities = fraud_probabilities(&[2, 1], &[0.4, 0.6], 2).unwrap();
        assert!((probabilities[1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_shapes_are_errors() {
        assert!(fraud_probabilities(&[2, 2], &[0.5, 0.5], 2).is_err());
        assert!(fraud_probabilities(&[1, 0], &[], 1).is_err());
        assert!(fraud_probabilities(&[1, 2, 1], &[0.5, 0.5], 1).is_err());
    }
}
