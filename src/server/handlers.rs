//! HTTP handlers for the analysis service

use crate::analyzer::transport_error_kind;
use crate::server::AppState;
use crate::url::validate_url;
use crate::AnalysisError;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Form body of `POST /analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub url: Option<String>,
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            code: None,
            status_code: None,
            description: None,
            url: None,
        }
    }

    fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Maps an analysis failure to its HTTP response
///
/// | Error | Status | Body |
/// |-------|--------|------|
/// | `InvalidUrl` | 400 | reason |
/// | `UnsuccessfulStatus` | 400 | upstream status code and description |
/// | `Network`, `Parse` | 400 | description |
/// | `RequestBuild` | 500 | generic message only |
pub fn analysis_error_response(error: &AnalysisError, url: &str) -> Response {
    if error.is_internal() {
        return ErrorResponse::new("Failed to analyze URL")
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut body = ErrorResponse::new("Failed to analyze URL").with_url(url);
    body.code = Some(error.code().to_string());

    let body = match error {
        AnalysisError::InvalidUrl(e) => {
            let mut body = body.with_description(e.to_string());
            body.error = "Invalid URL format".to_string();
            body
        }
        AnalysisError::UnsuccessfulStatus {
            status_code,
            description,
        } => {
            let mut body = body.with_description(description.as_str());
            body.status_code = Some(*status_code);
            body
        }
        AnalysisError::Network { source, .. } => body.with_description(format!(
            "Failed to fetch URL ({}): {}",
            transport_error_kind(source),
            source
        )),
        AnalysisError::Parse { message, .. } => {
            body.with_description(format!("Failed to parse HTML: {}", message))
        }
        AnalysisError::RequestBuild { .. } => body,
    };

    body.into_response_with(StatusCode::BAD_REQUEST)
}

/// `POST /analyze`
pub async fn analyze_handler(
    State(state): State<AppState>,
    form: Result<Form<AnalyzeForm>, FormRejection>,
) -> Response {
    state.metrics.record_analysis();

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            tracing::error!(error = %rejection, "Failed to parse form");
            state.metrics.record_error();
            return ErrorResponse::new("Bad Request").into_response_with(StatusCode::BAD_REQUEST);
        }
    };

    let raw = form.url.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        state.metrics.record_error();
        return ErrorResponse::new("URL is required").into_response_with(StatusCode::BAD_REQUEST);
    }

    let url = match validate_url(raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(url = raw, error = %e, "Rejected invalid URL");
            state.metrics.record_error();
            return analysis_error_response(&AnalysisError::InvalidUrl(e), raw);
        }
    };

    let start = Instant::now();
    let result = state.analyzer.analyze(&url).await;
    state.metrics.observe_duration(start.elapsed());

    match result {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::error!(
                url = url.as_str(),
                code = e.code(),
                error = %e,
                "Failed to analyze URL"
            );
            state.metrics.record_error();
            analysis_error_response(&e, url.as_str())
        }
    }
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
        .into_response()
}

/// `GET /health`
pub async fn health_handler() -> Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

/// `GET /`
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("index.html"))
}
