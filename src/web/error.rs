//! JSON error responses for the web layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{AdaptError, DashboardError};

/// JSON error response for the API routes
pub struct ApiError(pub DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl From<AdaptError> for ApiError {
    fn from(err: AdaptError) -> Self {
        Self(DashboardError::Adapt(err))
    }
}

/// HTTP status for a failed interaction
pub fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::Adapt(AdaptError::ParseError(_)) => StatusCode::BAD_REQUEST,
        DashboardError::Adapt(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DashboardError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Short machine-readable error kind
pub fn kind_of(err: &DashboardError) -> &'static str {
    match err {
        DashboardError::Adapt(e) => e.kind(),
        DashboardError::Inference(_) => "inference_failed",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Scoring failed");
        }

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "kind": kind_of(&self.0),
        });
        (status, Json(body)).into_response()
    }
}
