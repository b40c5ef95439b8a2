//! Prediction results and their presentation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary class predicted by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Legitimate,
    Fraudulent,
}

impl Label {
    /// Class index as used in training (0 = legitimate, 1 = fraud)
    pub fn as_class(self) -> u8 {
        match self {
            Label::Legitimate => 0,
            Label::Fraudulent => 1,
        }
    }

    /// Map a raw class index to a label; any non-zero class is fraud
    pub fn from_class(class: i64) -> Self {
        if class == 0 {
            Label::Legitimate
        } else {
            Label::Fraudulent
        }
    }

    /// Label implied by a fraud probability under the 0.5 decision rule
    pub fn from_probability(fraud_probability: f64) -> Self {
        if fraud_probability > 0.5 {
            Label::Fraudulent
        } else {
            Label::Legitimate
        }
    }

    pub fn is_fraud(self) -> bool {
        self == Label::Fraudulent
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Legitimate => write!(f, "legitimate"),
            Label::Fraudulent => write!(f, "fraudulent"),
        }
    }
}

/// Outcome of scoring one feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: Label,
    /// Probability of the fraudulent class (0.0 - 1.0), whatever the label
    pub fraud_probability: f64,
}

impl PredictionResult {
    pub fn new(label: Label, fraud_probability: f64) -> Self {
        Self {
            label,
            fraud_probability,
        }
    }

    /// Fraud probability as a percentage with two decimals, e.g. `73.21%`
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.fraud_probability * 100.0)
    }

    /// User-facing sentence. The probability shown is always P(fraud).
    pub fn verdict(&self) -> String {
        match self.label {
            Label::Fraudulent => format!(
                "FRAUD detected! (Probability: {})",
                self.probability_percent()
            ),
            Label::Legitimate => format!(
                "LEGITIMATE transaction. (Fraud Probability: {})",
                self.probability_percent()
            ),
        }
    }
}
