//! CSV batch record sets and their scored form

use crate::error::AdaptError;
use crate::types::{FeatureVector, Label, PredictionResult, FEATURE_COUNT};
use csv::ReaderBuilder;
use serde::Serialize;
use std::io::Read;

/// Column appended with the predicted class (0/1)
pub const PREDICTION_COLUMN: &str = "Prediction";
/// Column appended with P(fraud)
pub const PROBABILITY_COLUMN: &str = "Fraud Probability";

/// One uploaded CSV table, validated and converted row by row.
///
/// The original header and cell text are kept so results render against the
/// table exactly as uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecordSet {
    headers: Vec<String>,
    cells: Vec<Vec<String>>,
    vectors: Vec<FeatureVector>,
}

impl BatchRecordSet {
    /// Parse a CSV table with a header row.
    ///
    /// The header's column count is checked before any data row is read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AdaptError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| AdaptError::ParseError(format!("unreadable header: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if headers.is_empty() {
            return Err(AdaptError::ParseError("file is empty".to_string()));
        }

        if headers.len() != FEATURE_COUNT {
            return Err(AdaptError::SchemaMismatch {
                expected: FEATURE_COUNT,
                found: headers.len(),
            });
        }

        let mut cells = Vec::new();
        let mut vectors = Vec::new();

        for (index, record) in rdr.records().enumerate() {
            let row = index + 1;
            let record =
                record.map_err(|e| AdaptError::ParseError(format!("row {}: {}", row, e)))?;

            if record.len() != FEATURE_COUNT {
                return Err(AdaptError::ParseError(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    record.len(),
                    FEATURE_COUNT
                )));
            }

            let mut values = Vec::with_capacity(FEATURE_COUNT);
            for (column, cell) in record.iter().enumerate() {
                values.push(parse_cell(cell).ok_or_else(|| {
                    AdaptError::ParseError(format!(
                        "row {}, column {}: '{}' is not a number",
                        row, headers[column], cell
                    ))
                })?);
            }

            vectors.push(FeatureVector::try_from_values(values)?);
            cells.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self {
            headers,
            cells,
            vectors,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AdaptError> {
        Self::from_reader(bytes)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Attach one prediction per row. `predictions` must be in row order and
    /// have the same length as the record set.
    pub fn into_scored(self, predictions: Vec<PredictionResult>) -> ScoredBatch {
        debug_assert_eq!(predictions.len(), self.cells.len());

        let mut headers = self.headers;
        headers.push(PREDICTION_COLUMN.to_string());
        headers.push(PROBABILITY_COLUMN.to_string());

        let rows = self
            .cells
            .into_iter()
            .zip(predictions)
            .map(|(cells, result)| ScoredRow {
                cells,
                prediction: result.label.as_class(),
                fraud_probability: result.fraud_probability,
            })
            .collect();

        ScoredBatch { headers, rows }
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// An original row plus its two result columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    pub cells: Vec<String>,
    pub prediction: u8,
    pub fraud_probability: f64,
}

/// The uploaded table with `Prediction` and `Fraud Probability` appended
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredBatch {
    pub headers: Vec<String>,
    pub rows: Vec<ScoredRow>,
}

impl ScoredBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows predicted as fraud
    pub fn fraud_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.prediction == Label::Fraudulent.as_class())
            .count()
    }

    /// Render the scored table back to CSV text
    pub fn to_csv(&self) -> anyhow::Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            let mut record = row.cells.clone();
            record.push(row.prediction.to_string());
            record.push(row.fraud_probability.to_string());
            wtr.write_record(&record)?;
        }
        let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// CSV text with `columns` header names and one row per entry of `rows`,
    /// each row filled with its value.
    pub(crate) fn csv_table(columns: usize, rows: &[f64]) -> String {
        let header: Vec<String> = (1..=columns).map(|i| format!("F{}", i)).collect();
        let mut out = header.join(",");
        out.push('\n');
        for value in rows {
            let row: Vec<String> = (0..columns).map(|_| value.to_string()).collect();
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_parse_valid_table() {
        let csv = csv_table(FEATURE_COUNT, &[0.0, 1.5, -2.0]);
        let batch = BatchRecordSet::from_bytes(csv.as_bytes()).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.headers().len(), FEATURE_COUNT);
        assert_eq!(batch.vectors()[1].get(105), Some(1.5));
        assert_eq!(batch.vectors()[2].get(0), Some(-2.0));
    }

    #[test]
    fn test_wrong_column_count_is_schema_mismatch() {
        for columns in [104, 105, 107] {
            let csv = csv_table(columns, &[1.0]);
            assert_eq!(
                BatchRecordSet::from_bytes(csv.as_bytes()),
                Err(AdaptError::SchemaMismatch {
                    expected: FEATURE_COUNT,
                    found: columns
                })
            );
        }
    }

    #[test]
    fn test_schema_checked_before_rows() {
        // Garbage rows must not matter when the header is already wrong
        let mut csv = csv_table(3, &[]);
        csv.push_str("x,y,z\n");
        assert!(matches!(
            BatchRecordSet::from_bytes(csv.as_bytes()),
            Err(AdaptError::SchemaMismatch { found: 3, .. })
        ));
    }

    #[test]
    fn test_non_numeric_cell_is_parse_error() {
        let mut csv = csv_table(FEATURE_COUNT, &[1.0]);
        let bad_row: Vec<&str> = (0..FEATURE_COUNT)
            .map(|i| if i == 7 { "abc" } else { "0" })
            .collect();
        csv.push_str(&bad_row.join(","));
        csv.push('\n');

        match BatchRecordSet::from_bytes(csv.as_bytes()) {
            Err(AdaptError::ParseError(msg)) => {
                assert!(msg.contains("row 2"));
                assert!(msg.contains("F8"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let mut csv = csv_table(FEATURE_COUNT, &[]);
        csv.push_str("1,2,3\n");
        assert!(matches!(
            BatchRecordSet::from_bytes(csv.as_bytes()),
            Err(AdaptError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        assert!(matches!(
            BatchRecordSet::from_bytes(b""),
            Err(AdaptError::ParseError(_))
        ));
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        let csv = csv_table(FEATURE_COUNT, &[]);
        let batch = BatchRecordSet::from_bytes(csv.as_bytes()).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_scored_batch_appends_columns() {
        let csv = csv_table(FEATURE_COUNT, &[1.0, 2.0]);
        let batch = BatchRecordSet::from_bytes(csv.as_bytes()).unwrap();
        let scored = batch.into_scored(vec![
            PredictionResult::new(Label::Legitimate, 0.25),
            PredictionResult::new(Label::Fraudulent, 0.75),
        ]);

        assert_eq!(scored.headers.len(), FEATURE_COUNT + 2);
        assert_eq!(scored.headers[FEATURE_COUNT], PREDICTION_COLUMN);
        assert_eq!(scored.headers[FEATURE_COUNT + 1], PROBABILITY_COLUMN);
        assert_eq!(scored.rows[0].cells[0], "1");
        assert_eq!(scored.rows[1].prediction, 1);
        assert_eq!(scored.fraud_count(), 1);

        let text = scored.to_csv().unwrap();
        let mut lines = text.lines();
        assert!(lines
            .next()
            .unwrap()
            .ends_with("Prediction,Fraud Probability"));
        assert!(lines.next().unwrap().ends_with(",0,0.25"));
        assert!(lines.next().unwrap().ends_with(",1,0.75"));
    }
}
