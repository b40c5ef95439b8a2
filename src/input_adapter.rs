//! Input adaptation for fraud model inference.
//!
//! Converts the three dashboard input modes into the fixed-width feature
//! vectors the trained logistic regression expects.
//!
//! Guided mode is a convenience approximation: it fills only the first 13 of
//! the 106 trained features and leaves the rest at zero, so its scores are
//! indicative rather than faithful. Manual and batch modes cover every slot.

use crate::batch::BatchRecordSet;
use crate::error::AdaptError;
use crate::types::{FeatureVector, GuidedInput, FEATURE_COUNT};
use serde::Deserialize;
use std::collections::HashMap;

/// Number of feature slots the questionnaire populates.
pub const GUIDED_FEATURE_COUNT: usize = 13;

/// Upper bound of the hour field.
pub const MAX_HOUR: f64 = 23.0;

/// Upper bound of the children field.
pub const MAX_CHILDREN: f64 = 10.0;

/// One submission from any of the prediction tab's input modes.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum InputMode {
    /// Short questionnaire covering 13 features
    Guided(GuidedInput),
    /// Every feature entered directly, in slot order
    Manual { values: Vec<f64> },
    /// Uploaded CSV table
    #[serde(skip)]
    Batch(Vec<u8>),
}

impl InputMode {
    pub fn name(&self) -> &'static str {
        match self {
            InputMode::Guided(_) => "guided",
            InputMode::Manual { .. } => "manual",
            InputMode::Batch(_) => "batch",
        }
    }
}

/// Canonical model input produced from a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Adapted {
    Single(FeatureVector),
    Batch(BatchRecordSet),
}

/// Adapt any input mode into feature vectors, or reject it.
pub fn adapt(input: InputMode) -> Result<Adapted, AdaptError> {
    match input {
        InputMode::Guided(guided) => adapt_guided(&guided).map(Adapted::Single),
        InputMode::Manual { values } => adapt_manual(values).map(Adapted::Single),
        InputMode::Batch(bytes) => adapt_batch(&bytes).map(Adapted::Batch),
    }
}

/// Parse an uploaded CSV table; the column count is validated before any
/// row is converted.
pub fn adapt_batch(bytes: &[u8]) -> Result<BatchRecordSet, AdaptError> {
    BatchRecordSet::from_bytes(bytes)
}

/// Map questionnaire answers into slots 0-12; slots 13-105 stay zero.
///
/// Layout: amount, hour, region match, high usage today, known merchant,
/// contract type, gender, own car, own realty, children, income, credit
/// amount, annuity.
pub fn adapt_guided(input: &GuidedInput) -> Result<FeatureVector, AdaptError> {
    let amount = non_negative("amount", input.amount)?;
    let hour = whole("hour", bounded("hour", input.hour, MAX_HOUR)?)?;
    let children = whole("children", bounded("children", input.children, MAX_CHILDREN)?)?;
    let income = non_negative("income", input.income)?;
    let credit_amt = non_negative("credit_amt", input.credit_amt)?;
    let annuity = non_negative("annuity", input.annuity)?;

    let mapped = [
        amount,
        hour,
        input.region_match.encode(),
        input.frequent_today.encode(),
        input.known_merchant.encode(),
        input.contract.encode(),
        input.gender.encode(),
        input.own_car.encode(),
        input.own_realty.encode(),
        children,
        income,
        credit_amt,
        annuity,
    ];

    let mut features = FeatureVector::zeroed();
    for (slot, value) in mapped.into_iter().enumerate() {
        features.set(slot, value);
    }

    Ok(features)
}

/// Pass manual entries through unchanged; every slot must be supplied.
pub fn adapt_manual(values: Vec<f64>) -> Result<FeatureVector, AdaptError> {
    if let Some((slot, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(AdaptError::ParseError(format!(
            "F{} is not a finite number: {}",
            slot + 1,
            value
        )));
    }

    FeatureVector::try_from_values(values)
}

/// Raw manual-entry form fields `f1`..`f106` in slot order.
///
/// Always yields one entry per slot so a re-rendered form keeps everything
/// the user typed. Missing and blank fields come back as empty strings.
pub fn manual_entries_from_fields(fields: &HashMap<String, String>) -> Vec<String> {
    (1..=FEATURE_COUNT)
        .map(|slot| {
            fields
                .get(&format!("f{}", slot))
                .or_else(|| fields.get(&format!("F{}", slot)))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// Parse manual entries. Every slot must hold a number: blank slots make the
/// submission incomplete, and are never filled in.
pub fn manual_values_from_entries(entries: &[String]) -> Result<Vec<f64>, AdaptError> {
    let mut values = Vec::with_capacity(entries.len());

    for (slot, raw) in entries.iter().enumerate() {
        if raw.is_empty() {
            continue;
        }
        let value = raw.parse::<f64>().map_err(|_| {
            AdaptError::ParseError(format!("F{}: '{}' is not a number", slot + 1, raw))
        })?;
        values.push(value);
    }

    if values.len() < FEATURE_COUNT {
        return Err(AdaptError::IncompleteInput {
            expected: FEATURE_COUNT,
            supplied: values.len(),
        });
    }

    Ok(values)
}

/// Names of the slots the questionnaire populates (matching slot order).
pub fn guided_feature_names() -> [&'static str; GUIDED_FEATURE_COUNT] {
    [
        "amount",
        "hour",
        "region_match",
        "frequent_today",
        "known_merchant",
        "contract",
        "gender",
        "own_car",
        "own_realty",
        "children",
        "income",
        "credit_amt",
        "annuity",
    ]
}

/// Alternative field names the questionnaire accepts
const GUIDED_ALIASES: [(&str, &str); 2] = [("contract", "name_contract"), ("credit_amt", "credit_amount")];

/// Count questionnaire fields for which `present` holds, under either name.
fn guided_fields_supplied(present: impl Fn(&str) -> bool) -> usize {
    guided_feature_names()
        .into_iter()
        .filter(|&name| {
            present(name)
                || GUIDED_ALIASES
                    .iter()
                    .any(|&(field, alias)| field == name && present(alias))
        })
        .count()
}

/// Build questionnaire answers from posted form fields.
///
/// Missing or blank fields make the submission incomplete; a non-numeric
/// amount, hour, children, income, credit or annuity is a parse error.
pub fn guided_from_fields(fields: &HashMap<String, String>) -> Result<GuidedInput, AdaptError> {
    let supplied = guided_fields_supplied(|name| guided_field(fields, name).is_some());
    if supplied < GUIDED_FEATURE_COUNT {
        return Err(AdaptError::IncompleteInput {
            expected: GUIDED_FEATURE_COUNT,
            supplied,
        });
    }

    let text = |name: &'static str| -> String {
        guided_field(fields, name).unwrap_or_default().to_string()
    };
    let number = |name: &'static str| -> Result<f64, AdaptError> {
        let raw = text(name);
        raw.parse::<f64>()
            .map_err(|_| AdaptError::ParseError(format!("{}: '{}' is not a number", name, raw)))
    };

    Ok(GuidedInput {
        amount: number("amount")?,
        hour: number("hour")?,
        region_match: text("region_match").into(),
        frequent_today: text("frequent_today").into(),
        known_merchant: text("known_merchant").into(),
        contract: text("contract").into(),
        gender: text("gender").into(),
        own_car: text("own_car").into(),
        own_realty: text("own_realty").into(),
        children: number("children")?,
        income: number("income")?,
        credit_amt: number("credit_amt")?,
        annuity: number("annuity")?,
    })
}

/// Non-blank value of a questionnaire field, under its name or its alias
fn guided_field<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    let alias = GUIDED_ALIASES
        .iter()
        .find(|&&(field, _)| field == name)
        .map(|&(_, alias)| alias);

    fields
        .get(name)
        .or_else(|| alias.and_then(|a| fields.get(a)))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Read an API submission from an already parsed JSON body.
///
/// Missing questionnaire fields or a missing `values` array are reported as
/// incomplete input; anything else serde cannot read is a parse error.
pub fn input_mode_from_json(body: serde_json::Value) -> Result<InputMode, AdaptError> {
    if let Some(object) = body.as_object() {
        let present = |name: &str| object.get(name).is_some_and(|v| !v.is_null());

        match object.get("mode").and_then(|m| m.as_str()) {
            Some("guided") => {
                let supplied = guided_fields_supplied(present);
                if supplied < GUIDED_FEATURE_COUNT {
                    return Err(AdaptError::IncompleteInput {
                        expected: GUIDED_FEATURE_COUNT,
                        supplied,
                    });
                }
            }
            Some("manual") if !present("values") => {
                return Err(AdaptError::IncompleteInput {
                    expected: FEATURE_COUNT,
                    supplied: 0,
                });
            }
            _ => {}
        }
    }

    serde_json::from_value(body).map_err(|e| AdaptError::ParseError(e.to_string()))
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, AdaptError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AdaptError::OutOfRange { field, value })
    }
}

fn bounded(field: &'static str, value: f64, max: f64) -> Result<f64, AdaptError> {
    let value = non_negative(field, value)?;
    if value <= max {
        Ok(value)
    } else {
        Err(AdaptError::OutOfRange { field, value })
    }
}

fn whole(field: &'static str, value: f64) -> Result<f64, AdaptError> {
    if value.fract() == 0.0 {
        Ok(value)
    } else {
        Err(AdaptError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::tests::csv_table;
    use crate::types::{Answer, ContractType, Gender};

    fn example_input() -> GuidedInput {
        GuidedInput {
            amount: 500.0,
            hour: 14.0,
            region_match: Answer::No,
            frequent_today: Answer::No,
            known_merchant: Answer::Yes,
            contract: ContractType::CashLoans,
            gender: Gender::Other("Female".to_string()),
            own_car: Answer::Yes,
            own_realty: Answer::No,
            children: 0.0,
            income: 50000.0,
            credit_amt: 20000.0,
            annuity: 1200.0,
        }
    }

    #[test]
    fn test_guided_example_vector() {
        let features = adapt_guided(&example_input()).unwrap();

        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(
            &features.as_slice()[..GUIDED_FEATURE_COUNT],
            &[500.0, 14.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 50000.0, 20000.0, 1200.0]
        );
        assert!(features.as_slice()[GUIDED_FEATURE_COUNT..]
            .iter()
            .all(|&v| v == 0.0));
    }

    #[test]
    fn test_flags_encode_consistently() {
        for (answer, expected) in [(Answer::Yes, 1.0), (Answer::No, 0.0)] {
            let mut input = example_input();
            input.region_match = answer;
            input.frequent_today = answer;
            input.known_merchant = answer;
            input.own_car = answer;
            input.own_realty = answer;

            let features = adapt_guided(&input).unwrap();
            for slot in [2, 3, 4, 7, 8] {
                assert_eq!(features.get(slot), Some(expected), "slot {}", slot);
            }
        }
    }

    #[test]
    fn test_contract_and_gender_are_two_valued() {
        let mut input = example_input();

        input.contract = ContractType::from(ContractType::REVOLVING_LOANS.to_string());
        input.gender = Gender::from("Male".to_string());
        let features = adapt_guided(&input).unwrap();
        assert_eq!(features.get(5), Some(1.0));
        assert_eq!(features.get(6), Some(0.0));

        input.contract = ContractType::from("anything".to_string());
        input.gender = Gender::from("unspecified".to_string());
        let features = adapt_guided(&input).unwrap();
        assert_eq!(features.get(5), Some(1.0));
        assert_eq!(features.get(6), Some(1.0));
    }

    #[test]
    fn test_guided_bounds() {
        let mut input = example_input();
        input.hour = 24.0;
        assert!(matches!(
            adapt_guided(&input),
            Err(AdaptError::OutOfRange { field: "hour", .. })
        ));

        let mut input = example_input();
        input.amount = -1.0;
        assert!(matches!(
            adapt_guided(&input),
            Err(AdaptError::OutOfRange { field: "amount", .. })
        ));

        let mut input = example_input();
        input.hour = 23.0;
        input.children = 10.0;
        assert!(adapt_guided(&input).is_ok());
    }

    #[test]
    fn test_guided_hour_and_children_are_whole() {
        let mut input = example_input();
        input.hour = 14.5;
        assert!(matches!(
            adapt_guided(&input),
            Err(AdaptError::OutOfRange { field: "hour", .. })
        ));

        let mut input = example_input();
        input.children = 2.7;
        assert!(matches!(
            adapt_guided(&input),
            Err(AdaptError::OutOfRange { field: "children", .. })
        ));
    }

    #[test]
    fn test_manual_requires_every_slot() {
        let values: Vec<f64> = (0..FEATURE_COUNT).map(|i| i as f64 * 0.01).collect();
        let features = adapt_manual(values.clone()).unwrap();
        assert_eq!(features.as_slice(), values.as_slice());

        assert!(matches!(
            adapt_manual(vec![0.0; 105]),
            Err(AdaptError::IncompleteInput { supplied: 105, .. })
        ));
        assert!(matches!(
            adapt_manual(Vec::new()),
            Err(AdaptError::IncompleteInput { supplied: 0, .. })
        ));
    }

    #[test]
    fn test_manual_rejects_non_finite() {
        let mut values = vec![0.0; FEATURE_COUNT];
        values[3] = f64::NAN;
        assert!(matches!(
            adapt_manual(values),
            Err(AdaptError::ParseError(_))
        ));
    }

    #[test]
    fn test_manual_entries_keep_every_slot() {
        let mut fields: HashMap<String, String> = (1..=FEATURE_COUNT)
            .map(|i| (format!("f{}", i), format!("{}", i)))
            .collect();
        let entries = manual_entries_from_fields(&fields);
        let values = manual_values_from_entries(&entries).unwrap();
        assert_eq!(values.len(), FEATURE_COUNT);
        assert_eq!(values[0], 1.0);
        assert_eq!(values[105], 106.0);

        fields.insert("f50".to_string(), "  ".to_string());
        let entries = manual_entries_from_fields(&fields);
        assert_eq!(entries.len(), FEATURE_COUNT);
        assert_eq!(entries[49], "");
        assert_eq!(entries[50], "51");
        assert_eq!(
            manual_values_from_entries(&entries),
            Err(AdaptError::IncompleteInput {
                expected: FEATURE_COUNT,
                supplied: FEATURE_COUNT - 1
            })
        );

        fields.insert("f50".to_string(), "x".to_string());
        let entries = manual_entries_from_fields(&fields);
        assert!(matches!(
            manual_values_from_entries(&entries),
            Err(AdaptError::ParseError(_))
        ));
    }

    fn guided_fields() -> HashMap<String, String> {
        [
            ("amount", "500"),
            ("hour", "14"),
            ("region_match", "No"),
            ("frequent_today", "No"),
            ("known_merchant", "Yes"),
            ("name_contract", "Cash loans"),
            ("gender", "Female"),
            ("own_car", "Yes"),
            ("own_realty", "No"),
            ("children", "0"),
            ("income", "50000"),
            ("credit_amount", "20000"),
            ("annuity", "1200"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_guided_from_fields() {
        let input = guided_from_fields(&guided_fields()).unwrap();
        assert_eq!(input, example_input());

        let mut fields = guided_fields();
        fields.remove("annuity");
        fields.insert("hour".to_string(), " ".to_string());
        assert_eq!(
            guided_from_fields(&fields),
            Err(AdaptError::IncompleteInput {
                expected: GUIDED_FEATURE_COUNT,
                supplied: 11
            })
        );

        let mut fields = guided_fields();
        fields.insert("income".to_string(), "lots".to_string());
        assert!(matches!(
            guided_from_fields(&fields),
            Err(AdaptError::ParseError(_))
        ));
    }

    #[test]
    fn test_input_mode_from_json_reports_missing_fields() {
        let partial = serde_json::json!({"mode": "guided", "amount": 500, "hour": 14});
        assert_eq!(
            input_mode_from_json(partial).err(),
            Some(AdaptError::IncompleteInput {
                expected: GUIDED_FEATURE_COUNT,
                supplied: 2
            })
        );

        let no_values = serde_json::json!({"mode": "manual"});
        assert!(matches!(
            input_mode_from_json(no_values),
            Err(AdaptError::IncompleteInput { supplied: 0, .. })
        ));

        let unknown = serde_json::json!({"mode": "telepathy"});
        assert!(matches!(
            input_mode_from_json(unknown),
            Err(AdaptError::ParseError(_))
        ));

        let wrong_type = serde_json::json!({"mode": "manual", "values": "all of them"});
        assert!(matches!(
            input_mode_from_json(wrong_type),
            Err(AdaptError::ParseError(_))
        ));
    }

    #[test]
    fn test_adapt_dispatches_modes() {
        let single = adapt(InputMode::Guided(example_input())).unwrap();
        assert!(matches!(single, Adapted::Single(_)));

        let csv = csv_table(FEATURE_COUNT, &[1.0, 2.0]);
        match adapt(InputMode::Batch(csv.into_bytes())).unwrap() {
            Adapted::Batch(batch) => assert_eq!(batch.len(), 2),
            other => panic!("expected batch, got {:?}", other),
        }

        let csv = csv_table(104, &[1.0]);
        assert!(matches!(
            adapt(InputMode::Batch(csv.into_bytes())),
            Err(AdaptError::SchemaMismatch { found: 104, .. })
        ));
    }

    #[test]
    fn test_input_mode_from_json() {
        let json = format!(
            r#"{{"mode":"manual","values":[{}]}}"#,
            vec!["0.5"; FEATURE_COUNT].join(",")
        );
        let input: InputMode = serde_json::from_str(&json).unwrap();
        assert_eq!(input.name(), "manual");
        assert!(matches!(adapt(input).unwrap(), Adapted::Single(_)));
    }

    #[test]
    fn test_guided_feature_names() {
        let names = guided_feature_names();
        assert_eq!(names.len(), GUIDED_FEATURE_COUNT);
        assert_eq!(names[0], "amount");
        assert_eq!(names[12], "annuity");
    }
}
