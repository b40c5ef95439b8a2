//! Process-wide handle around the loaded classifier

use crate::config::ModelConfig;
use crate::models::classifier::Classifier;
use crate::models::loader::ModelLoader;
use crate::types::{FeatureVector, Label, FEATURE_COUNT};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read-only access to the trained classifier.
///
/// Created once at startup and shared (behind an `Arc`) for the life of the
/// process. Every call re-checks the 106-wide schema before reaching the
/// backend.
pub struct ModelHandle {
    classifier: Box<dyn Classifier>,
    source: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl ModelHandle {
    /// Load the artifact named in the configuration. Failure here is fatal
    /// for the whole session.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.onnx_threads);
        let classifier = loader
            .load(&config.path)
            .with_context(|| format!("Failed to load model artifact {}", config.path))?;

        let handle = Self::from_classifier(classifier, &config.path);
        info!(
            source = %handle.source.display(),
            backend = handle.backend(),
            features = FEATURE_COUNT,
            "Model handle ready"
        );
        Ok(handle)
    }

    /// Wrap an already constructed classifier
    pub fn from_classifier<P: AsRef<Path>>(classifier: Box<dyn Classifier>, source: P) -> Self {
        Self {
            classifier,
            source: source.as_ref().to_path_buf(),
            loaded_at: Utc::now(),
        }
    }

    pub fn backend(&self) -> &str {
        self.classifier.backend()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Predicted class of one vector
    pub fn predict(&self, features: &FeatureVector) -> Result<Label> {
        self.predict_batch(std::slice::from_ref(features))?
            .pop()
            .context("Model returned no prediction")
    }

    /// P(fraud) of one vector
    pub fn predict_probability(&self, features: &FeatureVector) -> Result<f64> {
        self.predict_probability_batch(std::slice::from_ref(features))?
            .pop()
            .context("Model returned no probability")
    }

    /// Predicted class of each row, in row order
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<Label>> {
        check_schema(rows)?;
        let labels = self.classifier.predict(rows)?;
        check_count("labels", labels.len(), rows.len())?;
        debug!(rows = rows.len(), "Classification complete");
        Ok(labels)
    }

    /// P(fraud) of each row, in row order
    pub fn predict_probability_batch(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        check_schema(rows)?;
        let probabilities = self.classifier.predict_proba(rows)?;
        check_count("probabilities", probabilities.len(), rows.len())?;

        if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            anyhow::bail!("Model returned probability outside [0, 1]: {}", p);
        }

        debug!(rows = rows.len(), "Probability estimation complete");
        Ok(probabilities)
    }
}

fn check_schema(rows: &[FeatureVector]) -> Result<()> {
    if let Some((index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != FEATURE_COUNT)
    {
        anyhow::bail!(
            "Row {} has {} features, model expects {}",
            index,
            row.len(),
            FEATURE_COUNT
        );
    }
    Ok(())
}

fn check_count(what: &str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        anyhow::bail!("Model returned {} {} for {} rows", got, what, expected);
    }
    Ok(())
}
