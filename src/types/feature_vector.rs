//! Fixed-width model input vectors

use crate::error::AdaptError;
use serde::Serialize;

/// Number of features the classifier was trained on.
pub const FEATURE_COUNT: usize = 106;

/// Ordered, positionally significant input to the classifier.
///
/// Always exactly [`FEATURE_COUNT`] values wide. Slot `i` is conceptually
/// named `F{i + 1}`; apart from the guided-mode slots the features are
/// anonymized and treated as opaque numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// All-zero vector.
    pub fn zeroed() -> Self {
        Self(vec![0.0; FEATURE_COUNT])
    }

    /// Build a vector from exactly `FEATURE_COUNT` values.
    pub fn try_from_values(values: Vec<f64>) -> Result<Self, AdaptError> {
        match values.len() {
            FEATURE_COUNT => Ok(Self(values)),
            n if n < FEATURE_COUNT => Err(AdaptError::IncompleteInput {
                expected: FEATURE_COUNT,
                supplied: n,
            }),
            n => Err(AdaptError::SchemaMismatch {
                expected: FEATURE_COUNT,
                found: n,
            }),
        }
    }

    /// Overwrite a single slot. Panics if `index >= FEATURE_COUNT`.
    pub fn set(&mut self, index: usize, value: f64) {
        self.0[index] = value;
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values narrowed to `f32` for tensor runtimes.
    pub fn to_f32(&self) -> Vec<f32> {
        self.0.iter().map(|&v| v as f32).collect()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Conventional column name for slot `index` (`F1`..`F106`).
pub fn feature_name(index: usize) -> String {
    format!("F{}", index + 1)
}

/// All conventional column names in slot order.
pub fn feature_names() -> Vec<String> {
    (0..FEATURE_COUNT).map(feature_name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_vector() {
        let v = FeatureVector::zeroed();
        assert_eq!(v.len(), FEATURE_COUNT);
        assert!(v.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_length_is_enforced() {
        assert!(FeatureVector::try_from_values(vec![1.0; FEATURE_COUNT]).is_ok());

        assert_eq!(
            FeatureVector::try_from_values(vec![1.0; 105]),
            Err(AdaptError::IncompleteInput {
                expected: FEATURE_COUNT,
                supplied: 105
            })
        );
        assert_eq!(
            FeatureVector::try_from_values(vec![1.0; 107]),
            Err(AdaptError::SchemaMismatch {
                expected: FEATURE_COUNT,
                found: 107
            })
        );
    }

    #[test]
    fn test_feature_names() {
        let names = feature_names();
        assert_eq!(names.len(), FEATURE_COUNT);
        assert_eq!(names[0], "F1");
        assert_eq!(names[105], "F106");
    }
}
