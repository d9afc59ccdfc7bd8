// ABOUTME: Calculator tool registry exposing add, subtract, multiply, and divide
// ABOUTME: Stateless arithmetic over two numeric arguments with domain error reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::registry::ToolRegistry;
use async_trait::async_trait;
use calculator_mcp_core::errors::ToolError;
use calculator_mcp_core::protocol::{InputSchema, PropertySchema, ToolDescriptor};
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Largest magnitude at which every integer is exactly representable in an f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Binary arithmetic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// a + b
    Add,
    /// a - b
    Subtract,
    /// a * b
    Multiply,
    /// a / b
    Divide,
}

impl Operation {
    /// Every operation, in listing order
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Tool name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    /// Look up an operation by tool name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    fn descriptor(self) -> ToolDescriptor {
        let (description, a, b) = match self {
            Self::Add => (
                "Add two numbers together",
                "The first number",
                "The second number",
            ),
            Self::Subtract => (
                "Subtract the second number from the first",
                "The number to subtract from",
                "The number to subtract",
            ),
            Self::Multiply => (
                "Multiply two numbers together",
                "The first number",
                "The second number",
            ),
            Self::Divide => (
                "Divide the first number by the second",
                "The dividend (number to be divided)",
                "The divisor (number to divide by)",
            ),
        };

        ToolDescriptor {
            name: self.name().to_owned(),
            description: description.to_owned(),
            input_schema: InputSchema::object()
                .property("a", PropertySchema::number(a), true)
                .property("b", PropertySchema::number(b), true),
        }
    }

    /// Apply the operation
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DivisionByZero`] for a zero divisor and
    /// [`ToolError::NonFiniteResult`] when the result overflows to infinity.
    pub fn apply(self, a: f64, b: f64) -> Result<f64, ToolError> {
        let result = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b == 0.0 {
                    return Err(ToolError::DivisionByZero);
                }
                a / b
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(ToolError::NonFiniteResult)
        }
    }
}

/// JSON number for `value`, integral when the value is an exact integer
#[must_use]
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

fn operand(arguments: &Map<String, Value>, name: &str) -> Result<f64, ToolError> {
    arguments
        .get(name)
        .ok_or_else(|| ToolError::missing_argument(name))?
        .as_f64()
        .ok_or_else(|| ToolError::invalid_argument(name, "expected a number"))
}

/// Arithmetic tool registry
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorRegistry;

impl CalculatorRegistry {
    /// Create the registry
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRegistry for CalculatorRegistry {
    fn list_tools(&self) -> Vec<ToolDescriptor> {
        Operation::ALL.into_iter().map(Operation::descriptor).collect()
    }

    fn describe(&self, name: &str) -> Option<ToolDescriptor> {
        Operation::from_name(name).map(Operation::descriptor)
    }

    async fn invoke(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ToolError> {
        let operation = Operation::from_name(name).ok_or_else(|| ToolError::unknown_tool(name))?;
        let a = operand(arguments, "a")?;
        let b = operand(arguments, "b")?;

        let result = operation.apply(a, b)?;
        debug!(tool = name, a, b, result, "calculator operation applied");
        Ok(number_value(result))
    }
}
