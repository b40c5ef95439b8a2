//! HTML handlers for the dashboard tabs

use std::collections::HashMap;
use std::path::Path;

use axum::extract::rejection::FormRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AdaptError, DashboardError};
use crate::input_adapter::{
    adapt_batch, adapt_guided, adapt_manual, guided_from_fields, manual_entries_from_fields,
    manual_values_from_entries,
};
use crate::types::FEATURE_COUNT;

use super::error::status_for;
use super::pages::{self, FormMode};
use super::AppState;

pub async fn home() -> Html<String> {
    Html(pages::home_page())
}

pub async fn eda(State(state): State<AppState>) -> Html<String> {
    let has_image = state
        .content
        .eda_image
        .as_deref()
        .is_some_and(|p| Path::new(p).exists());
    Html(pages::eda_page(&state.content.notebook_url, has_image))
}

pub async fn eda_image(State(state): State<AppState>) -> Response {
    let Some(path) = state.content.eda_image.as_deref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, image_content_type(path))], bytes).into_response(),
        Err(e) => {
            warn!(path = %path, error = %e, "EDA image unavailable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn image_content_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    #[serde(default)]
    pub mode: FormMode,
}

pub async fn predict_page(Query(query): Query<PredictQuery>) -> Html<String> {
    let form = form_for(query.mode);
    Html(pages::predict_page(query.mode, &form, None))
}

fn form_for(mode: FormMode) -> String {
    match mode {
        FormMode::Guided => pages::guided_form(),
        FormMode::Manual => pages::manual_form(&[]),
        FormMode::Batch => pages::batch_form(),
    }
}

/// Render a failed interaction on the prediction tab below `form`
fn failure_page(state: &AppState, mode: FormMode, form: &str, err: DashboardError) -> Response {
    if let DashboardError::Adapt(adapt_err) = &err {
        state.invoker.metrics().record_rejection(adapt_err);
    }
    info!(mode = ?mode, error = %err, "Submission rejected");

    let message = match &err {
        DashboardError::Adapt(AdaptError::SchemaMismatch { .. }) => format!(
            "CSV must have exactly {} columns named F1 to F{}. ({})",
            FEATURE_COUNT, FEATURE_COUNT, err
        ),
        other => other.to_string(),
    };

    let page = pages::predict_page(mode, form, Some(&pages::error_block(&message)));
    (status_for(&err), Html(page)).into_response()
}

/// Prediction stays gated until every field is filled; the form comes back
/// without a result
fn incomplete_page(state: &AppState, mode: FormMode, form: &str, err: &AdaptError) -> Response {
    state.invoker.metrics().record_rejection(err);
    info!(mode = ?mode, error = %err, "Submission incomplete, prediction suppressed");
    Html(pages::predict_page(mode, form, None)).into_response()
}

fn unreadable_form(rejection: FormRejection) -> DashboardError {
    AdaptError::ParseError(rejection.body_text()).into()
}

pub async fn predict_guided(
    State(state): State<AppState>,
    fields: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let form = pages::guided_form();
    let fields = match fields {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            return failure_page(&state, FormMode::Guided, &form, unreadable_form(rejection))
        }
    };

    let features = match guided_from_fields(&fields).and_then(|input| adapt_guided(&input)) {
        Ok(features) => features,
        Err(err @ AdaptError::IncompleteInput { .. }) => {
            return incomplete_page(&state, FormMode::Guided, &form, &err)
        }
        Err(err) => return failure_page(&state, FormMode::Guided, &form, err.into()),
    };

    match state.invoker.score(&features) {
        Ok(result) => {
            let page = pages::predict_page(
                FormMode::Guided,
                &form,
                Some(&pages::result_block(&result)),
            );
            Html(page).into_response()
        }
        Err(err) => failure_page(&state, FormMode::Guided, &form, err),
    }
}

pub async fn predict_manual(
    State(state): State<AppState>,
    fields: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let fields = match fields {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            let form = pages::manual_form(&[]);
            return failure_page(&state, FormMode::Manual, &form, unreadable_form(rejection));
        }
    };

    // Re-rendered forms show exactly what was submitted, blanks included
    let entries = manual_entries_from_fields(&fields);
    let form = pages::manual_form(&entries);

    let features = match manual_values_from_entries(&entries).and_then(adapt_manual) {
        Ok(features) => features,
        Err(err @ AdaptError::IncompleteInput { .. }) => {
            return incomplete_page(&state, FormMode::Manual, &form, &err)
        }
        Err(err) => return failure_page(&state, FormMode::Manual, &form, err.into()),
    };

    match state.invoker.score(&features) {
        Ok(result) => {
            let page = pages::predict_page(
                FormMode::Manual,
                &form,
                Some(&pages::result_block(&result)),
            );
            Html(page).into_response()
        }
        Err(err) => failure_page(&state, FormMode::Manual, &form, err),
    }
}

pub async fn predict_batch(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(bytes) => bytes,
        Err(err) => return failure_page(&state, FormMode::Batch, &pages::batch_form(), err.into()),
    };

    let outcome = adapt_batch(&upload)
        .map_err(DashboardError::from)
        .and_then(|batch| state.invoker.score_batch(batch));

    match outcome {
        Ok(scored) => {
            let page = pages::predict_page(
                FormMode::Batch,
                &pages::batch_form(),
                Some(&pages::scored_table(&scored)),
            );
            Html(page).into_response()
        }
        Err(err) => failure_page(&state, FormMode::Batch, &pages::batch_form(), err),
    }
}

/// Bytes of the `file` field of a multipart upload
async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, AdaptError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdaptError::ParseError(format!("unreadable upload: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AdaptError::ParseError(format!("unreadable upload: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(AdaptError::ParseError("no file uploaded".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub q: Option<String>,
}

pub async fn chatbot(Query(query): Query<ChatQuery>) -> Html<String> {
    Html(pages::chatbot_page(query.q.as_deref()))
}

pub async fn faq() -> Html<String> {
    Html(pages::faq_page())
}

pub async fn about() -> Html<String> {
    Html(pages::about_page())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_content_type() {
        assert_eq!(image_content_type("eda/overview.PNG"), "image/png");
        assert_eq!(image_content_type("shot.jpeg"), "image/jpeg");
        assert_eq!(image_content_type("shot"), "application/octet-stream");
    }
}
