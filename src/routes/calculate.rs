//! Calculation endpoint handler.
//!
//! Validates the request into typed operands and a typed operation before
//! anything is evaluated, evaluates, and appends the result to the history
//! store. A rejected calculation never reaches the store.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::calc::{self, Operation};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/calculate.
///
/// All fields are optional at the serde level so that missing or mistyped
/// values surface as this API's own validation errors instead of a generic
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub num1: Option<Value>,
    #[serde(default)]
    pub num2: Option<Value>,
}

/// Response body for a successful calculation.
#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub result: f64,
}

/// Coerce a JSON value to a finite f64.
///
/// Numbers are taken as-is; numeric strings are accepted for compatibility
/// with clients that quote their operands. Anything else, including a
/// missing field, is an invalid number.
fn parse_operand(value: Option<&Value>) -> Result<f64, ApiError> {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().ok_or(ApiError::InvalidNumberFormat)?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::InvalidNumberFormat)?,
        _ => return Err(ApiError::InvalidNumberFormat),
    };

    if n.is_finite() {
        Ok(n)
    } else {
        Err(ApiError::InvalidNumberFormat)
    }
}

/// Handler for POST /api/calculate.
#[instrument(name = "calculate::submit", skip(state, request))]
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, ApiError> {
    // Operands are validated before the operation, matching the original
    // API's error precedence.
    let num1 = parse_operand(request.num1.as_ref())?;
    let num2 = parse_operand(request.num2.as_ref())?;

    let operation: Operation = request
        .operation
        .as_deref()
        .ok_or(ApiError::InvalidOperation)?
        .parse()?;

    let result = calc::evaluate(operation, num1, num2)?;

    let record = state.history.append(num1, num2, operation, result).await?;
    tracing::debug!(id = record.id, %operation, result, "Calculation stored");

    Ok(Json(CalculateResponse { result }))
}
