//! Raw style values

use crate::error::{MotionError, Result};
use crate::property::PropertyName;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Leading number of a CSS value, e.g. `-12.5` in `-12.5px`
fn leading_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("Invalid regex pattern")
    })
}

/// A property value as given by the caller or reported by the style surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// A bare number; gets the property's unit when rendered
    Number(f64),
    /// Any CSS value (`"10px"`, `"red"`, `"50%"`)
    Text(String),
}

impl StyleValue {
    /// The numeric component at the start of the value
    ///
    /// Fails with [`MotionError::ValueParse`] when the value does not start
    /// with a number (`"auto"`, `""`).
    pub fn leading_number(&self) -> Result<f64> {
        match self {
            StyleValue::Number(n) => Ok(*n),
            StyleValue::Text(text) => leading_number_pattern()
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .ok_or_else(|| MotionError::ValueParse(text.clone())),
        }
    }

    /// The text following the leading number (`"px"` for `"10px"`)
    ///
    /// Numbers have no suffix; text without a leading number is returned
    /// unchanged.
    pub fn unit_suffix(&self) -> &str {
        match self {
            StyleValue::Number(_) => "",
            StyleValue::Text(text) => match leading_number_pattern().find(text) {
                Some(m) => text[m.end()..].trim(),
                None => text.as_str(),
            },
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(_) => None,
        }
    }

    /// Render as a CSS value for `property`
    ///
    /// Bare numbers get the property's unit (`10` -> `10px` for `width`);
    /// text passes through unchanged.
    pub fn to_css(&self, property: &PropertyName) -> String {
        match self {
            StyleValue::Number(n) => format!("{}{}", n, property.unit()),
            StyleValue::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{}", n),
            StyleValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}
