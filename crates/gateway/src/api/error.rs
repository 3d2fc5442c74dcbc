//! Uniform mapping from handler failures to HTTP responses.
//!
//! Every error body is `{ "error": "<message>" }`, plus `details` for
//! validation failures and `state` for agent failures.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use sw_domain::{Error, FieldError};
use sw_scripting::{AgentError, AgentErrorKind};

pub const INVALID_DATA: &str = "Dados inválidos";
pub const SCRIPT_NOT_FOUND: &str = "Roteiro não encontrado";
pub const INTERNAL: &str = "Erro interno do servidor";

#[derive(Debug)]
pub enum ApiError {
    /// 400 with field details.
    Validation(Vec<FieldError>),
    /// 400 with a message only (e.g. no live session).
    BadRequest(String),
    NotFound(String),
    /// Agent failure; the status depends on the kind.
    Agent(AgentError),
    /// 500. The cause is logged, never returned.
    Internal(String),
}

impl ApiError {
    pub fn invalid_id(raw: &str) -> Self {
        ApiError::Validation(vec![FieldError::new(
            "id",
            format!("'{raw}' is not a valid numeric id"),
        )])
    }

    pub fn script_not_found() -> Self {
        ApiError::NotFound(SCRIPT_NOT_FOUND.into())
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation { details, .. } => ApiError::Validation(details),
            Error::NotFound(_) => ApiError::script_not_found(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(e: AgentError) -> Self {
        ApiError::Agent(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": INVALID_DATA, "details": details })),
            )
                .into_response(),
            ApiError::BadRequest(message) => api_error(StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => api_error(StatusCode::NOT_FOUND, message),
            ApiError::Agent(e) => {
                let status = match e.kind {
                    AgentErrorKind::Generation => StatusCode::INTERNAL_SERVER_ERROR,
                    AgentErrorKind::MissingPrerequisite => StatusCode::BAD_REQUEST,
                };
                (status, Json(json!({ "error": e.message, "state": e.state }))).into_response()
            }
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "request failed");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Parse a path id; anything but an integer is a validation error.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| ApiError::invalid_id(raw))
}
