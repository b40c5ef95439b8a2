//! HTTP surface: the tabbed HTML dashboard plus a small JSON API.

pub mod api;
pub mod content;
pub mod error;
pub mod handlers;
pub mod pages;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::ContentConfig;
use crate::invoker::PredictionInvoker;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub invoker: PredictionInvoker,
    pub content: Arc<ContentConfig>,
}

impl AppState {
    pub fn new(invoker: PredictionInvoker, content: ContentConfig) -> Self {
        Self {
            invoker,
            content: Arc::new(content),
        }
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/eda", get(handlers::eda))
        .route("/eda/image", get(handlers::eda_image))
        .route("/predict", get(handlers::predict_page))
        .route("/predict/guided", post(handlers::predict_guided))
        .route("/predict/manual", post(handlers::predict_manual))
        .route("/predict/batch", post(handlers::predict_batch))
        .route("/chatbot", get(handlers::chatbot))
        .route("/faq", get(handlers::faq))
        .route("/about", get(handlers::about))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(api::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.invoker.model();
    Json(json!({
        "status": "ok",
        "model": {
            "backend": model.backend(),
            "source": model.source().display().to_string(),
            "loaded_at": model.loaded_at().to_rfc3339(),
        },
        "uptime_secs": state.invoker.metrics().uptime().as_secs(),
    }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.invoker.metrics().render_prometheus(),
    )
}
