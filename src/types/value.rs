//! Scalar attribute values carried over from shapefile records
//!
//! Shapefile attribute tables (dBase) hold a handful of scalar kinds. They are
//! folded into [`AttributeValue`] so the rest of the pipeline never touches the
//! dBase types directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest magnitude at which an `f64` still represents every integer exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Missing or empty value
    Null,
    /// Logical value
    Bool(bool),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Free text
    Text(String),
}

impl AttributeValue {
    /// Check whether the value is missing
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Render the value as text, `None` for missing values
    ///
    /// Floats with no fractional part render as integers, so a numeric room
    /// number stored as `101.0` reads back as `"101"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            AttributeValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Interpret the value as an integer when it unambiguously is one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(value) => Some(*value),
            AttributeValue::Float(value) => integral_float(*value),
            AttributeValue::Text(text) => {
                let trimmed = text.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_float))
            }
            AttributeValue::Null | AttributeValue::Bool(_) => None,
        }
    }

    /// Build a numeric value, collapsing integral floats into integers
    pub fn from_number(value: f64) -> Self {
        match integral_float(value) {
            Some(integer) => AttributeValue::Integer(integer),
            None => AttributeValue::Float(value),
        }
    }
}

fn integral_float(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        Some(value as i64)
    } else {
        None
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Bool(value) => write!(f, "{}", value),
            AttributeValue::Integer(value) => write!(f, "{}", value),
            AttributeValue::Float(value) => match integral_float(*value) {
                Some(integer) => write!(f, "{}", integer),
                None => write!(f, "{}", value),
            },
            AttributeValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}
