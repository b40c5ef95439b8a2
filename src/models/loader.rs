//! Model artifact loader

use crate::models::classifier::Classifier;
use crate::models::logistic::LogisticModel;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Supported artifact formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// ONNX export of the fitted estimator
    Onnx,
    /// JSON file with `coefficients` and `intercept`
    LogisticJson,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("onnx") => Ok(ArtifactFormat::Onnx),
            Some("json") => Ok(ArtifactFormat::LogisticJson),
            _ => anyhow::bail!(
                "Unsupported model artifact {:?} (expected .onnx or .json)",
                path
            ),
        }
    }
}

/// Loader for classifier artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of ONNX threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier stored at `path`
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn Classifier>> {
        let path = path.as_ref();

        if !path.exists() {
            anyhow::bail!("Model file not found: {}", path.display());
        }

        let format = ArtifactFormat::from_path(path)?;
        info!(path = %path.display(), format = ?format, "Loading model artifact");

        let classifier: Box<dyn Classifier> = match format {
            ArtifactFormat::Onnx => self.load_onnx(path)?,
            ArtifactFormat::LogisticJson => Box::new(
                LogisticModel::from_json_file(path)
                    .context("Failed to load logistic regression parameters")?,
            ),
        };

        info!(
            path = %path.display(),
            backend = classifier.backend(),
            "Model loaded successfully"
        );

        Ok(classifier)
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(&self, path: &Path) -> Result<Box<dyn Classifier>> {
        Ok(Box::new(crate::models::onnx::OnnxClassifier::load(
            path,
            self.onnx_threads,
        )?))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(&self, path: &Path) -> Result<Box<dyn Classifier>> {
        anyhow::bail!(
            "{} is an ONNX model but the `onnx` feature is disabled (onnx_threads = {})",
            path.display(),
            self.onnx_threads
        )
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FEATURE_COUNT;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ArtifactFormat::from_path(Path::new("model/model.onnx")).unwrap(),
            ArtifactFormat::Onnx
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("model.JSON")).unwrap(),
            ArtifactFormat::LogisticJson
        );
        assert!(ArtifactFormat::from_path(Path::new("model.pkl")).is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        let loader = ModelLoader::new();
        let err = loader.load("does/not/exist.json").err().unwrap();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_json_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = LogisticModel::new(vec![0.0; FEATURE_COUNT], 0.0).unwrap();
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

        let classifier = ModelLoader::default().load(&path).unwrap();
        assert_eq!(classifier.backend(), "logistic-json");
    }
}
