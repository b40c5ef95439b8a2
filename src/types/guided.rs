//! Guided questionnaire record

use serde::{Deserialize, Serialize};

/// Yes/No answer. Only the exact label "Yes" counts as presence of the
/// condition; every other label reads as "No".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn encode(self) -> f64 {
        match self {
            Answer::Yes => 1.0,
            Answer::No => 0.0,
        }
    }
}

impl From<String> for Answer {
    fn from(label: String) -> Self {
        Answer::from(label.as_str())
    }
}

impl From<&str> for Answer {
    fn from(label: &str) -> Self {
        if label == "Yes" {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

impl From<Answer> for String {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Yes => "Yes".to_string(),
            Answer::No => "No".to_string(),
        }
    }
}

/// Loan contract type. "Cash loans" is the base case, anything else is
/// treated as revolving credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContractType {
    CashLoans,
    Other(String),
}

impl ContractType {
    pub const CASH_LOANS: &'static str = "Cash loans";
    pub const REVOLVING_LOANS: &'static str = "Revolving loans";

    pub fn encode(&self) -> f64 {
        match self {
            ContractType::CashLoans => 0.0,
            ContractType::Other(_) => 1.0,
        }
    }
}

impl From<String> for ContractType {
    fn from(label: String) -> Self {
        if label == Self::CASH_LOANS {
            ContractType::CashLoans
        } else {
            ContractType::Other(label)
        }
    }
}

impl From<ContractType> for String {
    fn from(contract: ContractType) -> Self {
        match contract {
            ContractType::CashLoans => ContractType::CASH_LOANS.to_string(),
            ContractType::Other(label) => label,
        }
    }
}

/// Applicant gender as the training data encoded it: "Male" is 0, anything
/// else is 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Other(String),
}

impl Gender {
    pub fn encode(&self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Other(_) => 1.0,
        }
    }
}

impl From<String> for Gender {
    fn from(label: String) -> Self {
        if label == "Male" {
            Gender::Male
        } else {
            Gender::Other(label)
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => "Male".to_string(),
            Gender::Other(label) => label,
        }
    }
}

/// Answers to the short questionnaire.
///
/// Field aliases accept the labels the HTML form posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidedInput {
    /// Transaction amount
    pub amount: f64,

    /// Hour of transaction (0-23)
    pub hour: f64,

    /// Transaction in the usual region?
    pub region_match: Answer,

    /// High card usage today?
    pub frequent_today: Answer,

    /// Merchant well known?
    pub known_merchant: Answer,

    /// Contract type ("Cash loans" / "Revolving loans")
    #[serde(alias = "name_contract")]
    pub contract: ContractType,

    pub gender: Gender,

    pub own_car: Answer,

    pub own_realty: Answer,

    /// Number of children (0-10)
    pub children: f64,

    /// Annual income
    pub income: f64,

    /// Credit amount
    #[serde(alias = "credit_amount")]
    pub credit_amt: f64,

    /// Annuity amount
    pub annuity: f64,
}
