//! Fraud Scoring Dashboard Library
//!
//! Scores credit card transactions with a pre-trained logistic regression
//! model. Submissions arrive through a guided questionnaire, full manual
//! entry or CSV upload, are adapted into 106-wide feature vectors and run
//! through the model loaded once at startup.

pub mod batch;
pub mod config;
pub mod error;
pub mod input_adapter;
pub mod invoker;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use error::{AdaptError, DashboardError, DashboardResult};
pub use input_adapter::{adapt, Adapted, InputMode};
pub use invoker::{PredictionInvoker, Scored};
pub use models::{Classifier, ModelHandle};
pub use types::{FeatureVector, GuidedInput, Label, PredictionResult, FEATURE_COUNT};
