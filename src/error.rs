//! Error types for input adaptation and scoring

use thiserror::Error;

/// Reasons an input submission cannot be turned into feature vectors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdaptError {
    /// Wrong number of feature columns or values.
    #[error("expected exactly {expected} feature columns, found {found}")]
    SchemaMismatch { expected: usize, found: usize },

    /// Submission attempted before every feature slot was supplied.
    #[error("incomplete input: {supplied} of {expected} values supplied")]
    IncompleteInput { expected: usize, supplied: usize },

    /// Unreadable file or non-numeric cell.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Guided field outside the range the questionnaire allows.
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

impl AdaptError {
    /// Short machine-readable name, used for metrics labels and API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AdaptError::SchemaMismatch { .. } => "schema_mismatch",
            AdaptError::IncompleteInput { .. } => "incomplete_input",
            AdaptError::ParseError(_) => "parse_error",
            AdaptError::OutOfRange { .. } => "out_of_range",
        }
    }
}

/// Errors surfaced by a single scoring interaction.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Adapt(#[from] AdaptError),

    /// The model runtime failed while scoring.
    #[error("model inference failed: {0}")]
    Inference(#[from] anyhow::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AdaptError::SchemaMismatch {
            expected: 106,
            found: 104,
        };
        assert_eq!(
            err.to_string(),
            "expected exactly 106 feature columns, found 104"
        );
        assert_eq!(err.kind(), "schema_mismatch");

        let err = AdaptError::IncompleteInput {
            expected: 106,
            supplied: 3,
        };
        assert!(err.to_string().contains("3 of 106"));
    }

    #[test]
    fn test_adapt_error_converts() {
        let err: DashboardError = AdaptError::ParseError("bad cell".to_string()).into();
        assert!(matches!(err, DashboardError::Adapt(AdaptError::ParseError(_))));
        assert_eq!(err.to_string(), "parse error: bad cell");
    }
}
