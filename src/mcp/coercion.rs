// ABOUTME: Loosely typed tool argument coercion driven by the tool's input schema
// ABOUTME: Single numeric conversion policy applied before arguments reach the registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Argument Coercion
//!
//! Clients sometimes send numbers as strings (`{"a": "5"}`). Every numeric argument
//! goes through [`coerce_number`], which tries, in order:
//!
//! 1. a native JSON number
//! 2. a string that parses as a 64-bit integer
//! 3. a string that parses as a 64-bit float
//!
//! and rejects anything else. NaN and infinities are rejected at every step.
//! Failures map to `invalid params` without distinguishing the cause.

use calculator_mcp_core::protocol::InputSchema;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Why an argument could not be coerced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Required argument absent
    #[error("missing required argument '{parameter}'")]
    Missing {
        /// Argument name
        parameter: String,
    },
    /// Value cannot be read as the declared type
    #[error("invalid argument '{parameter}': expected {expected}")]
    WrongType {
        /// Argument name
        parameter: String,
        /// Declared type
        expected: String,
    },
    /// Numeric value is NaN
    #[error("invalid argument '{parameter}': input contains NaN")]
    NotANumber {
        /// Argument name
        parameter: String,
    },
    /// Numeric value is infinite
    #[error("invalid argument '{parameter}': input contains infinity")]
    Infinite {
        /// Argument name
        parameter: String,
    },
}


/// Result of the numeric policy before an argument name is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberRejection {
    NotNumeric,
    NotANumber,
    Infinite,
}

fn finite_number(value: f64) -> Result<Number, NumberRejection> {
    if value.is_nan() {
        Err(NumberRejection::NotANumber)
    } else if value.is_infinite() {
        Err(NumberRejection::Infinite)
    } else {
        Number::from_f64(value).ok_or(NumberRejection::NotNumeric)
    }
}

fn number_from(value: &Value) -> Result<Number, NumberRejection> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::String(raw) => {
            let text = raw.trim();
            if let Ok(integer) = text.parse::<i64>() {
                return Ok(integer.into());
            }
            text.parse::<f64>()
                .map_err(|_| NumberRejection::NotNumeric)
                .and_then(finite_number)
        }
        _ => Err(NumberRejection::NotNumeric),
    }
}

/// Coerce a loosely typed value into a finite JSON number
///
/// # Errors
///
/// Returns a [`CoercionError`] naming `parameter` when the value is not numeric,
/// is NaN, or is infinite.
pub fn coerce_number(parameter: &str, value: &Value) -> Result<Number, CoercionError> {
    number_from(value).map_err(|rejection| match rejection {
        NumberRejection::NotNumeric => CoercionError::WrongType {
            parameter: parameter.to_owned(),
            expected: "number".to_owned(),
        },
        NumberRejection::NotANumber => CoercionError::NotANumber {
            parameter: parameter.to_owned(),
        },
        NumberRejection::Infinite => CoercionError::Infinite {
            parameter: parameter.to_owned(),
        },
    })
}

fn coerce_integer(parameter: &str, value: &Value) -> Result<Number, CoercionError> {
    let number = coerce_number(parameter, value)?;
    if number.is_i64() || number.is_u64() {
        return Ok(number);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok((f as i64).into()),
        _ => Err(CoercionError::WrongType {
            parameter: parameter.to_owned(),
            expected: "integer".to_owned(),
        }),
    }
}

fn coerce_boolean(parameter: &str, value: &Value) -> Result<bool, CoercionError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(raw) => match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CoercionError::WrongType {
                parameter: parameter.to_owned(),
                expected: "boolean".to_owned(),
            }),
        },
        _ => Err(CoercionError::WrongType {
            parameter: parameter.to_owned(),
            expected: "boolean".to_owned(),
        }),
    }
}

/// Coerce `arguments` against `schema`
///
/// Declared properties are converted to their declared type; undeclared arguments
/// pass through untouched. Required properties must be present and non-null.
///
/// # Errors
///
/// Returns the first [`CoercionError`] encountered, in property-name order.
pub fn coerce_arguments(
    schema: &InputSchema,
    arguments: &Map<String, Value>,
) -> Result<Map<String, Value>, CoercionError> {
    let mut coerced = arguments.clone();

    for (name, property) in &schema.properties {
        let value = match arguments.get(name) {
            Some(Value::Null) | None => {
                if schema.is_required(name) {
                    return Err(CoercionError::Missing {
                        parameter: name.clone(),
                    });
                }
                continue;
            }
            Some(value) => value,
        };

        let converted = match property.property_type.as_str() {
            "number" => Value::Number(coerce_number(name, value)?),
            "integer" => Value::Number(coerce_integer(name, value)?),
            "boolean" => Value::Bool(coerce_boolean(name, value)?),
            "string" => match value {
                Value::String(_) => value.clone(),
                Value::Number(n) => Value::String(n.to_string()),
                _ => {
                    return Err(CoercionError::WrongType {
                        parameter: name.clone(),
                        expected: "string".to_owned(),
                    })
                }
            },
            _ => value.clone(),
        };
        coerced.insert(name.clone(), converted);
    }

    Ok(coerced)
}
