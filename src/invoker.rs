//! Prediction invoker: runs adapted vectors through the model handle

use crate::batch::{BatchRecordSet, ScoredBatch};
use crate::error::DashboardResult;
use crate::input_adapter::Adapted;
use crate::metrics::ScoringMetrics;
use crate::models::ModelHandle;
use crate::types::{FeatureVector, PredictionResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of scoring whatever the adapter produced
#[derive(Debug, Clone)]
pub enum Scored {
    Single(PredictionResult),
    Batch(ScoredBatch),
}

/// Mode-agnostic scoring front for the model handle
#[derive(Clone)]
pub struct PredictionInvoker {
    model: Arc<ModelHandle>,
    metrics: Arc<ScoringMetrics>,
}

impl PredictionInvoker {
    pub fn new(model: Arc<ModelHandle>, metrics: Arc<ScoringMetrics>) -> Self {
        Self { model, metrics }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn metrics(&self) -> &ScoringMetrics {
        &self.metrics
    }

    /// Score a single vector: one classification call, one probability call
    pub fn score(&self, features: &FeatureVector) -> DashboardResult<PredictionResult> {
        let start_time = Instant::now();

        let label = self.model.predict(features)?;
        let fraud_probability = self.model.predict_probability(features)?;
        let result = PredictionResult::new(label, fraud_probability);

        let processing_time = start_time.elapsed();
        self.metrics
            .record_scoring(processing_time, std::slice::from_ref(&result));

        debug!(
            label = %result.label,
            fraud_probability = result.fraud_probability,
            processing_time_us = processing_time.as_micros(),
            "Vector scored"
        );

        Ok(result)
    }

    /// Score every row of a batch in one bulk call per operation and append
    /// the `Prediction` and `Fraud Probability` columns
    pub fn score_batch(&self, batch: BatchRecordSet) -> DashboardResult<ScoredBatch> {
        let start_time = Instant::now();

        let labels = self.model.predict_batch(batch.vectors())?;
        let probabilities = self.model.predict_probability_batch(batch.vectors())?;
        let results: Vec<PredictionResult> = labels
            .into_iter()
            .zip(probabilities)
            .map(|(label, p)| PredictionResult::new(label, p))
            .collect();

        let processing_time = start_time.elapsed();
        self.metrics.record_batch(processing_time, &results);

        let scored = batch.into_scored(results);
        info!(
            rows = scored.len(),
            fraud_flagged = scored.fraud_count(),
            processing_time_us = processing_time.as_micros(),
            "Batch scored"
        );

        Ok(scored)
    }

    /// Score whichever shape the adapter produced
    pub fn score_adapted(&self, adapted: Adapted) -> DashboardResult<Scored> {
        match adapted {
            Adapted::Single(features) => self.score(&features).map(Scored::Single),
            Adapted::Batch(batch) => self.score_batch(batch).map(Scored::Batch),
        }
    }
}
