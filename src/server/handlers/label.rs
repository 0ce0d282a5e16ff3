//! Label preview and print handlers.
//!
//! Both routes accept the label fields from the query string, a
//! form-encoded body, or both. Body fields win when a field appears twice.

use axum::{
    Form, Json,
    extract::{
        Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::LabelError,
    orchestrator::{PrintResult, ReturnFormat},
    request::LabelForm,
};

use super::super::state::AppState;

/// Query parameters for the preview endpoint.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub return_format: Option<String>,
}

/// Handle GET|POST /api/preview/text - render the label as PNG or base64.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    options: Result<Query<PreviewQuery>, QueryRejection>,
    query: Result<Query<LabelForm>, QueryRejection>,
    body: Result<Form<LabelForm>, FormRejection>,
) -> Response {
    let format = options
        .map_err(|e| LabelError::invalid("query", e.body_text()))
        .and_then(|Query(options)| {
            ReturnFormat::parse(options.return_format.as_deref().unwrap_or("png"))
        });
    let format = match format {
        Ok(format) => format,
        Err(e) => return error_response(&e),
    };
    let form = match merge_fields(query, body) {
        Ok(form) => form,
        Err(e) => return error_response(&e),
    };

    let orchestrator = state.orchestrator.clone();
    let result = tokio::task::spawn_blocking(move || orchestrator.preview(&form, format)).await;

    match result {
        Ok(Ok(image)) => ([(header::CONTENT_TYPE, image.content_type)], image.body).into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => error_response(&LabelError::RenderFailure(format!("Task error: {}", e))),
    }
}

/// Handle GET|POST /api/print/text - print the label.
///
/// Always answers 200 with a JSON [`PrintResult`]; failures are reported in
/// the body.
pub async fn print(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LabelForm>, QueryRejection>,
    body: Result<Form<LabelForm>, FormRejection>,
) -> Json<PrintResult> {
    let form = match merge_fields(query, body) {
        Ok(form) => form,
        Err(e) => return Json(PrintResult::failure(&e)),
    };

    let orchestrator = state.orchestrator.clone();
    let result = tokio::task::spawn_blocking(move || orchestrator.print(&form)).await;

    match result {
        Ok(result) => Json(result),
        Err(e) => Json(PrintResult::failure(&LabelError::RenderFailure(format!(
            "Task error: {}",
            e
        )))),
    }
}

/// Merge query-string and body fields.
///
/// A body that is not form-encoded (or absent) is ignored; a malformed one
/// is an [`LabelError::InvalidParameter`].
fn merge_fields(
    query: Result<Query<LabelForm>, QueryRejection>,
    body: Result<Form<LabelForm>, FormRejection>,
) -> Result<LabelForm, LabelError> {
    let Query(fields) = query.map_err(|e| LabelError::invalid("query", e.body_text()))?;

    match body {
        Ok(Form(body)) => Ok(fields.overlay(body)),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(fields),
        Err(e) => Err(LabelError::invalid("form", e.body_text())),
    }
}

/// Generate an error response with a JSON body.
fn error_response(error: &LabelError) -> Response {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(PrintResult::failure(error))).into_response()
}
