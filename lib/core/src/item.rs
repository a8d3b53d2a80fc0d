use crate::{Error, FeatureValue, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Item identifier carried through to the ranked results
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    String(String),
    Integer(u64),
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::String(s) => write!(f, "{}", s),
            Label::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::String(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::String(s.to_string())
    }
}

impl From<u64> for Label {
    fn from(i: u64) -> Self {
        Label::Integer(i)
    }
}

/// A labeled item with named features.
///
/// Features keep insertion order. Only that order matters when items are
/// compared, so the target and every candidate must list their features in
/// the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub label: Label,
    pub features: Vec<(String, FeatureValue)>,
}

impl Item {
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<Label>) -> Self {
        Self {
            label: label.into(),
            features: Vec::new(),
        }
    }

    /// Add a feature, replacing the value in place if the name already exists
    #[must_use]
    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.features.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.features.push((name, value)),
        }
        self
    }

    /// Build an item from a JSON object, taking features in document order
    pub fn from_json(label: impl Into<Label>, features: &Value) -> Result<Self> {
        let object = features.as_object().ok_or_else(|| {
            Error::InvalidFeature("item features must be a JSON object".to_string())
        })?;

        let mut item = Item::new(label);
        for (name, value) in object {
            let value = FeatureValue::try_from(value)
                .map_err(|e| Error::InvalidFeature(format!("feature '{}': {}", name, e)))?;
            item.features.push((name.clone(), value));
        }
        Ok(item)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Flatten the features into a positional vector
    pub fn extract(&self) -> FeatureVector {
        FeatureVector {
            label: self.label.clone(),
            values: self.features.iter().map(|(_, v)| v.clone()).collect(),
        }
    }
}

/// Positional feature values of one item
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub label: Label,
    pub values: Vec<FeatureValue>,
}

impl FeatureVector {
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[FeatureValue] {
        &self.values
    }
}
