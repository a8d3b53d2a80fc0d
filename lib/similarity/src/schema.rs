//! Recommendation schema definitions
//!
//! A schema is parallel to the feature vector: entry `i` says which distance
//! strategy compares feature `i`, how much it weighs in the final score, and
//! whether its raw distances need min-max rescaling across the candidates.

use crate::distance::{Distance, DistanceKind};
use std::sync::Arc;
use tico_core::{FeatureValue, Result};

/// Distance strategy held by a schema entry: a built-in or a caller-provided one
#[derive(Debug, Clone)]
pub enum Metric {
    Builtin(DistanceKind),
    Custom(Arc<dyn Distance>),
}

impl Metric {
    /// Wrap a caller-provided strategy
    pub fn custom(distance: impl Distance + 'static) -> Self {
        Metric::Custom(Arc::new(distance))
    }

    pub fn name(&self) -> &str {
        match self {
            Metric::Builtin(kind) => kind.name(),
            Metric::Custom(distance) => distance.name(),
        }
    }

    #[inline]
    pub fn distance(&self, a: &FeatureValue, b: &FeatureValue) -> Result<f64> {
        match self {
            Metric::Builtin(kind) => kind.distance(a, b),
            Metric::Custom(distance) => distance.distance(a, b),
        }
    }
}

impl From<DistanceKind> for Metric {
    fn from(kind: DistanceKind) -> Self {
        Metric::Builtin(kind)
    }
}

impl From<Arc<dyn Distance>> for Metric {
    fn from(distance: Arc<dyn Distance>) -> Self {
        Metric::Custom(distance)
    }
}

/// Configuration for one feature position
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    pub metric: Metric,

    /// `true` if the metric already yields values on a common scale (e.g. [0, 1])
    /// and must be used as-is; `false` to min-max rescale over the candidates
    pub normalized: bool,

    /// Contribution of this feature to the weighted average
    pub weight: f64,
}

impl SchemaEntry {
    /// Entry with weight 1 whose distances are used as-is
    pub fn new(metric: impl Into<Metric>) -> Self {
        Self {
            metric: metric.into(),
            normalized: true,
            weight: 1.0,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Rescale this feature's distances over the candidate pool
    #[must_use]
    pub fn unnormalized(self) -> Self {
        self.with_normalized(false)
    }
}

/// Ordered schema, one entry per feature position
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub entries: Vec<SchemaEntry>,
}

impl Schema {
    pub fn new(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }

    /// Validate the schema
    /// - at least one entry
    /// - weights are finite and non-negative
    /// - weights sum to a finite, non-zero total
    pub fn validate(&self) -> std::result::Result<(), SchemaError> {
        if self.entries.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        for (position, entry) in self.entries.iter().enumerate() {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(SchemaError::InvalidWeight {
                    position,
                    weight: entry.weight,
                });
            }
        }

        let total = self.total_weight();
        if !total.is_finite() {
            return Err(SchemaError::WeightOverflow);
        }
        if total <= 0.0 {
            return Err(SchemaError::ZeroTotalWeight);
        }

        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Whether any position asks for min-max rescaling
    pub fn needs_normalization(&self) -> bool {
        self.entries.iter().any(|e| !e.normalized)
    }

    pub fn get(&self, position: usize) -> Option<&SchemaEntry> {
        self.entries.get(position)
    }
}

impl FromIterator<SchemaEntry> for Schema {
    fn from_iter<I: IntoIterator<Item = SchemaEntry>>(iter: I) -> Self {
        Schema::new(iter.into_iter().collect())
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Schema entry {position} has invalid weight {weight}")]
    InvalidWeight { position: usize, weight: f64 },

    #[error("Total weight cannot be zero")]
    ZeroTotalWeight,

    #[error("Total weight overflows")]
    WeightOverflow,
}
