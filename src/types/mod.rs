//! Type definitions for the scoring dashboard

pub mod feature_vector;
pub mod guided;
pub mod prediction;

pub use feature_vector::{FeatureVector, FEATURE_COUNT};
pub use guided::{Answer, ContractType, Gender, GuidedInput};
pub use prediction::{Label, PredictionResult};
