//! Arithmetic evaluator.
//!
//! A single-shot pure evaluation over the four supported operations.
//! Division by zero is rejected before the floating-point division happens,
//! so no infinity or NaN result ever leaves this module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four supported arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Wire name of the operation, as accepted in requests and stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Display symbol used when rendering a calculation as an expression string.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            "divide" => Ok(Operation::Divide),
            other => Err(EvalError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// Evaluation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("division by zero")]
    DivisionByZero,
}

/// Apply `operation` to the two operands.
///
/// Deterministic and side-effect free. The only failure a valid `Operation`
/// can produce is [`EvalError::DivisionByZero`].
pub fn evaluate(operation: Operation, a: f64, b: f64) -> Result<f64, EvalError> {
    match operation {
        Operation::Add => Ok(a + b),
        Operation::Subtract => Ok(a - b),
        Operation::Multiply => Ok(a * b),
        Operation::Divide => {
            if b == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }
    }
}
