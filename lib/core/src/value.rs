//! Feature values
//!
//! A feature vector mixes quantitative, ordinal, nominal and binary data at
//! different positions. [`FeatureValue`] tags each value with its shape so a
//! distance strategy can check what it receives instead of coercing.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single feature value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Binary data (e.g. "has in-flight entertainment")
    Bool(bool),
    /// Quantitative data
    Number(f64),
    /// Nominal data compared character by character
    Text(String),
    /// Multi-valued or ordinal data (rank vectors, one-hot sets, nested lists)
    List(Vec<FeatureValue>),
}

impl FeatureValue {
    /// Shape name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureValue::Bool(_) => "bool",
            FeatureValue::Number(_) => "number",
            FeatureValue::Text(_) => "text",
            FeatureValue::List(_) => "list",
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeatureValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[FeatureValue]> {
        match self {
            FeatureValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Number or a shape error
    pub fn expect_number(&self) -> Result<f64> {
        self.as_number()
            .ok_or_else(|| Error::shape("number", self.kind()))
    }

    /// List or a shape error
    pub fn expect_list(&self) -> Result<&[FeatureValue]> {
        self.as_list()
            .ok_or_else(|| Error::shape("list", self.kind()))
    }

    /// Read a flat list of numbers, as used by Manhattan and Canberra
    pub fn numbers(&self) -> Result<Vec<f64>> {
        self.expect_list()?
            .iter()
            .map(|v| {
                v.as_number()
                    .ok_or_else(|| Error::shape("list of numbers", format!("list containing {}", v.kind())))
            })
            .collect()
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FeatureValue {
                fn from(n: $t) -> Self {
                    FeatureValue::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Text(s)
    }
}

impl<T: Into<FeatureValue>> From<Vec<T>> for FeatureValue {
    fn from(values: Vec<T>) -> Self {
        FeatureValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<&Value> for FeatureValue {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(FeatureValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(FeatureValue::Number)
                .ok_or_else(|| Error::InvalidFeature(format!("number {} is not representable as f64", n))),
            Value::String(s) => Ok(FeatureValue::Text(s.clone())),
            Value::Array(values) => values
                .iter()
                .map(FeatureValue::try_from)
                .collect::<Result<Vec<_>>>()
                .map(FeatureValue::List),
            Value::Null => Err(Error::InvalidFeature("null is not a feature value".to_string())),
            Value::Object(_) => Err(Error::InvalidFeature(
                "nested objects are not feature values".to_string(),
            )),
        }
    }
}

impl TryFrom<Value> for FeatureValue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        FeatureValue::try_from(&value)
    }
}
