//! JSON scoring API

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::batch::ScoredBatch;
use crate::error::{AdaptError, DashboardError};
use crate::input_adapter::{adapt, adapt_batch, input_mode_from_json};
use crate::invoker::Scored;
use crate::types::{Label, PredictionResult};

use super::error::ApiError;
use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/predict/batch", post(predict_batch))
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub mode: &'static str,
    pub label: Label,
    /// Class index (0 = legitimate, 1 = fraud)
    pub prediction: u8,
    pub fraud_probability: f64,
    pub verdict: String,
}

impl PredictionResponse {
    fn new(mode: &'static str, result: PredictionResult) -> Self {
        Self {
            mode,
            label: result.label,
            prediction: result.label.as_class(),
            fraud_probability: result.fraud_probability,
            verdict: result.verdict(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub row_count: usize,
    pub fraud_flagged: usize,
    #[serde(flatten)]
    pub table: ScoredBatch,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    #[serde(default)]
    pub format: OutputFormat,
}

fn reject(state: &AppState, err: DashboardError) -> ApiError {
    if let DashboardError::Adapt(adapt_err) = &err {
        state.invoker.metrics().record_rejection(adapt_err);
        tracing::info!(error = %adapt_err, "API submission rejected");
    }
    ApiError(err)
}

/// Score one guided or manual submission
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        reject(&state, AdaptError::ParseError(rejection.body_text()).into())
    })?;
    let input = input_mode_from_json(body).map_err(|e| reject(&state, e.into()))?;

    let mode = input.name();
    let adapted = adapt(input).map_err(|e| reject(&state, e.into()))?;

    match state
        .invoker
        .score_adapted(adapted)
        .map_err(|e| reject(&state, e))?
    {
        Scored::Single(result) => Ok(Json(PredictionResponse::new(mode, result))),
        Scored::Batch(_) => Err(ApiError(DashboardError::Inference(anyhow::anyhow!(
            "{} input produced a batch",
            mode
        )))),
    }
}

/// Score a CSV body; `?format=csv` returns the scored table as CSV text
pub async fn predict_batch(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let batch = adapt_batch(&body).map_err(|e| reject(&state, e.into()))?;
    let scored = state
        .invoker
        .score_batch(batch)
        .map_err(|e| reject(&state, e))?;

    let batch_id = Uuid::new_v4();
    tracing::info!(%batch_id, rows = scored.len(), "API batch scored");

    match query.format {
        OutputFormat::Csv => {
            let text = scored.to_csv().map_err(DashboardError::Inference)?;
            Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], text).into_response())
        }
        OutputFormat::Json => Ok(Json(BatchResponse {
            batch_id,
            row_count: scored.len(),
            fraud_flagged: scored.fraud_count(),
            table: scored,
        })
        .into_response()),
    }
}
