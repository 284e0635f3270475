//! Request-boundary error type and its HTTP mapping.
//!
//! Every error a handler can produce maps to exactly one HTTP status and a
//! JSON body with a human-readable `error` field. Validation and evaluation
//! failures are 400s with fixed messages; store failures are 500s with the
//! underlying message passed through.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::calc::EvalError;
use crate::history::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid operation")]
    InvalidOperation,

    #[error("Division by zero is not allowed")]
    DivisionByZero,

    #[error("Invalid number format")]
    InvalidNumberFormat,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<EvalError> for ApiError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::UnsupportedOperation(_) => ApiError::InvalidOperation,
            EvalError::DivisionByZero => ApiError::DivisionByZero,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidOperation
            | ApiError::DivisionByZero
            | ApiError::InvalidNumberFormat => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
