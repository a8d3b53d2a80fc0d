//! Scoring engine
//!
//! Ranks candidate items against a target by the weighted average of their
//! per-feature distances. Scoring runs in two passes: the first computes every
//! candidate's raw distance vector and the per-feature min/max of the positions
//! that need rescaling, the second rescales and combines. Lower scores rank first.

use crate::schema::{Schema, SchemaError};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tico_core::{FeatureVector, Item, Label};
use tracing::{debug, trace};

/// A candidate with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub label: Label,
    /// Weighted average distance to the target, 0 for an exact match
    pub score: f64,
    /// Raw per-feature distances, before rescaling
    pub distances: Vec<f64>,
    /// Per-feature share of `score`; sums to `score`
    pub contributions: Vec<f64>,
}

/// Errors returned by [`Recommender`]
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Item '{label}' has {actual} features, schema expects {expected}")]
    FeatureCountMismatch {
        label: Label,
        expected: usize,
        actual: usize,
    },

    #[error("Distance '{metric}' at position {position} returned {value}, expected a finite non-negative number")]
    InvalidDistance {
        metric: String,
        position: usize,
        value: f64,
    },

    #[error("Item '{label}' scored {score}, expected a finite number")]
    NonFiniteScore { label: Label, score: f64 },

    #[error(transparent)]
    Distance(#[from] tico_core::Error),
}

/// Observed range of one feature's raw distances over the candidate pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    #[inline]
    fn new(value: f64) -> Self {
        Self { min: value, max: value }
    }

    #[inline]
    fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Min-max rescale into [0, 1]. A zero-width range maps to 0: every
    /// candidate is equally close on this feature.
    #[inline]
    pub fn rescale(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span
        }
    }
}

/// Content-based recommender over a validated schema
#[derive(Debug, Clone)]
pub struct Recommender {
    schema: Schema,
    total_weight: f64,
}

impl Recommender {
    /// Create a recommender, validating the schema once up front
    pub fn new(schema: Schema) -> Result<Self, RecommendError> {
        schema.validate()?;
        let total_weight = schema.total_weight();
        Ok(Self {
            schema,
            total_weight,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rank `items` by similarity to `target`, most similar first.
    ///
    /// Every item is checked against the schema before any distance is
    /// computed. Candidates with equal scores keep their input order.
    /// A single candidate can be passed as `[&item]`.
    pub fn recommend<'a, I>(&self, target: &Item, items: I) -> Result<Vec<RankedResult>, RecommendError>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let target = self.extract(target)?;
        let space = items
            .into_iter()
            .map(|item| self.extract(item))
            .collect::<Result<Vec<_>, _>>()?;

        if space.is_empty() {
            debug!(label = %target.label, "no candidates to rank");
            return Ok(Vec::new());
        }

        let normalize = self.schema.needs_normalization();
        debug!(
            label = %target.label,
            candidates = space.len(),
            features = self.schema.len(),
            normalize,
            "scoring candidates"
        );

        let distances = space
            .iter()
            .map(|candidate| self.distance_vector(&target, candidate))
            .collect::<Result<Vec<_>, _>>()?;

        let ranges = if normalize {
            self.feature_ranges(&distances)
        } else {
            vec![None; self.schema.len()]
        };

        let mut results: Vec<RankedResult> = space
            .into_iter()
            .zip(distances)
            .map(|(candidate, distances)| self.score(candidate.label, distances, &ranges))
            .collect::<Result<_, _>>()?;

        results.sort_by_key(|r| OrderedFloat(r.score));

        if let Some(best) = results.first() {
            debug!(best = %best.label, score = best.score, "ranking complete");
        }

        Ok(results)
    }

    /// Deferred form of [`Recommender::recommend`]. Resolves to the same
    /// result; failures come back as the `Err` outcome.
    pub async fn recommend_async<'a, I>(
        &self,
        target: &Item,
        items: I,
    ) -> Result<Vec<RankedResult>, RecommendError>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        self.recommend(target, items)
    }

    /// Create a new recommender with per-position weight overrides
    ///
    /// Negative weights are clamped to 0 and positions outside the schema are
    /// ignored. The resulting schema is validated again.
    pub fn with_weights(&self, weight_overrides: &HashMap<usize, f64>) -> Result<Recommender, RecommendError> {
        let mut schema = self.schema.clone();

        for (&position, &weight) in weight_overrides {
            if let Some(entry) = schema.entries.get_mut(position) {
                entry.weight = weight.max(0.0);
            }
        }

        Recommender::new(schema)
    }

    fn extract(&self, item: &Item) -> Result<FeatureVector, RecommendError> {
        let vector = item.extract();
        let actual = vector.len();
        if actual != self.schema.len() {
            return Err(RecommendError::FeatureCountMismatch {
                label: vector.label,
                expected: self.schema.len(),
                actual,
            });
        }
        Ok(vector)
    }

    fn distance_vector(&self, target: &FeatureVector, candidate: &FeatureVector) -> Result<Vec<f64>, RecommendError> {
        let mut distances = Vec::with_capacity(self.schema.len());

        for (position, ((entry, a), b)) in self
            .schema
            .entries
            .iter()
            .zip(&target.values)
            .zip(&candidate.values)
            .enumerate()
        {
            let value = entry.metric.distance(a, b)?;
            if !value.is_finite() || value < 0.0 {
                return Err(RecommendError::InvalidDistance {
                    metric: entry.metric.name().to_string(),
                    position,
                    value,
                });
            }
            distances.push(value);
        }

        trace!(candidate = %candidate.label, ?distances, "distance vector");
        Ok(distances)
    }

    /// Min/max per position for entries that need rescaling, `None` elsewhere
    fn feature_ranges(&self, distances: &[Vec<f64>]) -> Vec<Option<FeatureRange>> {
        let mut ranges: Vec<Option<FeatureRange>> = vec![None; self.schema.len()];

        for dvec in distances {
            for (position, (entry, &value)) in self.schema.entries.iter().zip(dvec).enumerate() {
                if entry.normalized {
                    continue;
                }
                ranges[position]
                    .get_or_insert_with(|| FeatureRange::new(value))
                    .include(value);
            }
        }

        ranges
    }

    fn score(
        &self,
        label: Label,
        distances: Vec<f64>,
        ranges: &[Option<FeatureRange>],
    ) -> Result<RankedResult, RecommendError> {
        let contributions: Vec<f64> = self
            .schema
            .entries
            .iter()
            .zip(&distances)
            .zip(ranges)
            .map(|((entry, &raw), range)| {
                let value = match range {
                    Some(range) => range.rescale(raw),
                    None => raw,
                };
                entry.weight / self.total_weight * value
            })
            .collect();

        // Shares of the validated total sum to 1, so the score is bounded by the
        // largest distance up to rounding
        let score: f64 = contributions.iter().sum();
        if !score.is_finite() {
            return Err(RecommendError::NonFiniteScore { label, score });
        }

        Ok(RankedResult {
            label,
            score,
            distances,
            contributions,
        })
    }
}

/// Rank `items` against `target` with a one-off schema.
///
/// Validates `schema` on every call; build a [`Recommender`] to reuse one.
pub fn recommend<'a, I>(target: &Item, items: I, schema: &Schema) -> Result<Vec<RankedResult>, RecommendError>
where
    I: IntoIterator<Item = &'a Item>,
{
    Recommender::new(schema.clone())?.recommend(target, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{Distance, DistanceKind, FnDistance};
    use crate::schema::{Metric, SchemaEntry};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tico_core::FeatureValue;

    fn trip(label: &str, expensiveness: f64, trip: f64) -> Item {
        Item::new(label)
            .with_feature("expensiveness", expensiveness)
            .with_feature("trip", trip)
    }

    fn abs_schema() -> Schema {
        Schema::new(vec![
            SchemaEntry::new(DistanceKind::AbsDiff),
            SchemaEntry::new(DistanceKind::AbsDiff),
        ])
    }

    fn timed(label: &str, time: f64) -> Item {
        Item::new(label).with_feature("time", time)
    }

    #[test]
    fn test_identical_candidate_scores_zero() {
        let target = trip("target", 0.0, 1.0);
        let candidate = trip("same", 0.0, 1.0);

        let results = recommend(&target, [&candidate], &abs_schema()).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, Label::from("same"));
        assert_eq!(results[0].score, 0.0);
        assert_eq!(results[0].distances, vec![0.0, 0.0]);
    }

    #[test]
    fn test_self_match_ranks_first() {
        let target = trip("target", 0.4, 0.6);
        let items = vec![
            trip("far", 1.0, 0.0),
            trip("near", 0.5, 0.5),
            target.clone(),
        ];

        let recommender = Recommender::new(abs_schema()).unwrap();
        let results = recommender.recommend(&target, &items).unwrap();

        assert_eq!(results[0].label, Label::from("target"));
        assert_eq!(results[0].score, 0.0);
        assert_eq!(results[1].label, Label::from("near"));
        assert_eq!(results[2].label, Label::from("far"));
    }

    #[test]
    fn test_empty_candidates() {
        let recommender = Recommender::new(abs_schema()).unwrap();
        let results = recommender.recommend(&trip("t", 0.0, 0.0), &Vec::<Item>::new()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_weighted_average() {
        let schema = Schema::new(vec![
            SchemaEntry::new(DistanceKind::AbsDiff).with_weight(3.0),
            SchemaEntry::new(DistanceKind::AbsDiff),
        ]);
        let target = trip("t", 0.0, 0.0);
        let candidate = trip("c", 0.5, 1.0);

        let results = recommend(&target, [&candidate], &schema).unwrap();

        // (3 * 0.5 + 1 * 1.0) / 4
        assert!((results[0].score - 0.625).abs() < 1e-12);
        let sum: f64 = results[0].contributions.iter().sum();
        assert!((sum - results[0].score).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_normalization() {
        let schema = Schema::new(vec![SchemaEntry::new(DistanceKind::AbsDiff).unnormalized()]);
        let target = timed("t", 0.0);
        let items = vec![timed("slow", 10.0), timed("mid", 2.0), timed("fast", 1.75)];

        let results = recommend(&target, &items, &schema).unwrap();

        assert_eq!(results[0].label, Label::from("fast"));
        assert_eq!(results[0].score, 0.0);
        assert_eq!(results[2].label, Label::from("slow"));
        assert_eq!(results[2].score, 1.0);
        assert!((results[1].score - 0.25 / 8.25).abs() < 1e-12);
        // Raw distances are reported before rescaling
        assert_eq!(results[2].distances, vec![10.0]);
    }

    #[test]
    fn test_mixed_normalization() {
        let schema = Schema::new(vec![
            SchemaEntry::new(DistanceKind::AbsDiff),
            SchemaEntry::new(DistanceKind::AbsDiff).unnormalized(),
        ]);
        let target = Item::new("t").with_feature("price", 0.0).with_feature("time", 0.0);
        let items = vec![
            Item::new("a").with_feature("price", 0.2).with_feature("time", 10.0),
            Item::new("b").with_feature("price", 0.6).with_feature("time", 2.0),
        ];

        let results = recommend(&target, &items, &schema).unwrap();

        // a: (0.2 + 1.0) / 2, b: (0.6 + 0.0) / 2
        assert_eq!(results[0].label, Label::from("b"));
        assert!((results[0].score - 0.3).abs() < 1e-12);
        assert!((results[1].score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_range_maps_to_zero() {
        let schema = Schema::new(vec![SchemaEntry::new(DistanceKind::AbsDiff).unnormalized()]);
        let target = timed("t", 0.0);
        let items = vec![timed("a", 5.0), timed("b", 5.0)];

        let results = recommend(&target, &items, &schema).unwrap();

        assert!(results.iter().all(|r| r.score == 0.0));
        assert_eq!(results[0].label, Label::from("a"));

        // A single candidate is a zero-width range too
        let results = recommend(&target, [&items[0]], &schema).unwrap();
        assert_eq!(results[0].score, 0.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let target = trip("t", 0.0, 0.0);
        let items = vec![
            trip("first", 0.5, 0.0),
            trip("closest", 0.0, 0.0),
            trip("second", 0.0, 0.5),
        ];

        let results = recommend(&target, &items, &abs_schema()).unwrap();
        let labels: Vec<String> = results.iter().map(|r| r.label.to_string()).collect();
        assert_eq!(labels, vec!["closest", "first", "second"]);
    }

    #[test]
    fn test_candidate_order_does_not_change_scores() {
        let schema = Schema::new(vec![
            SchemaEntry::new(DistanceKind::AbsDiff).unnormalized(),
            SchemaEntry::new(DistanceKind::AbsDiff),
        ]);
        let target = trip("t", 0.0, 0.0);
        let items = vec![trip("a", 3.0, 0.1), trip("b", 7.0, 0.9), trip("c", 1.0, 0.4)];
        let reversed: Vec<Item> = items.iter().rev().cloned().collect();

        let forward = recommend(&target, &items, &schema).unwrap();
        let backward = recommend(&target, &reversed, &schema).unwrap();

        for result in &forward {
            let other = backward.iter().find(|r| r.label == result.label).unwrap();
            assert_eq!(result.score, other.score);
        }
    }

    #[test]
    fn test_feature_count_mismatch_fails_before_scoring() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let counting = FnDistance::new("counting", move |a: &FeatureValue, b: &FeatureValue| {
            counter.fetch_add(1, Ordering::SeqCst);
            DistanceKind::AbsDiff.distance(a, b)
        });
        let schema = Schema::new(vec![
            SchemaEntry::new(Metric::custom(counting)),
            SchemaEntry::new(DistanceKind::AbsDiff),
        ]);

        let target = trip("t", 0.0, 0.0);
        let items = vec![trip("ok", 1.0, 1.0), Item::new("short").with_feature("x", 1.0)];

        let err = recommend(&target, &items, &schema).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::FeatureCountMismatch { expected: 2, actual: 1, .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_target_mismatch() {
        let target = Item::new("t").with_feature("only", 1.0);
        let err = recommend(&target, [&trip("c", 0.0, 0.0)], &abs_schema()).unwrap_err();
        assert!(matches!(err, RecommendError::FeatureCountMismatch { .. }));
    }

    #[test]
    fn test_distance_error_propagates() {
        let target = Item::new("t").with_feature("x", "abc");
        let candidate = Item::new("c").with_feature("x", "abc");
        let schema = Schema::new(vec![SchemaEntry::new(DistanceKind::AbsDiff)]);

        let err = recommend(&target, [&candidate], &schema).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::Distance(tico_core::Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_negative_distance_rejected() {
        let broken = FnDistance::new("broken", |_: &FeatureValue, _: &FeatureValue| Ok(-1.0));
        let schema = Schema::new(vec![SchemaEntry::new(Metric::custom(broken))]);
        let target = timed("t", 0.0);

        let err = recommend(&target, [&timed("c", 1.0)], &schema).unwrap_err();
        match err {
            RecommendError::InvalidDistance { metric, position, value } => {
                assert_eq!(metric, "broken");
                assert_eq!(position, 0);
                assert_eq!(value, -1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overflowing_weights_rejected() {
        let schema = Schema::new(vec![
            SchemaEntry::new(DistanceKind::AbsDiff).with_weight(f64::MAX),
            SchemaEntry::new(DistanceKind::AbsDiff).with_weight(f64::MAX),
        ]);
        let target = trip("t", 0.0, 0.0);
        let candidate = trip("c", 2.0, 0.0);

        let err = recommend(&target, [&candidate], &schema).unwrap_err();
        assert!(matches!(err, RecommendError::Schema(SchemaError::WeightOverflow)));
    }

    #[test]
    fn test_huge_weights_with_finite_total() {
        let schema = Schema::new(vec![
            SchemaEntry::new(DistanceKind::AbsDiff).with_weight(f64::MAX / 4.0),
            SchemaEntry::new(DistanceKind::AbsDiff).with_weight(f64::MAX / 4.0),
        ]);
        let target = trip("t", 0.0, 0.0);
        let candidate = trip("c", 2.0, 0.0);

        let results = recommend(&target, [&candidate], &schema).unwrap();
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_extreme_distances_score_finite() {
        let schema = Schema::new(vec![
            SchemaEntry::new(DistanceKind::AbsDiff),
            SchemaEntry::new(DistanceKind::AbsDiff),
        ]);
        let target = trip("t", 0.0, 0.0);
        let candidate = trip("c", f64::MAX, f64::MAX);

        let results = recommend(&target, [&candidate], &schema).unwrap();
        assert_eq!(results[0].score, f64::MAX);
        assert_eq!(results[0].contributions, vec![f64::MAX / 2.0, f64::MAX / 2.0]);
    }

    #[test]
    fn test_invalid_schema_rejected() {
        assert!(matches!(
            Recommender::new(Schema::default()),
            Err(RecommendError::Schema(SchemaError::EmptySchema))
        ));
    }

    #[test]
    fn test_with_weights_override() {
        let recommender = Recommender::new(abs_schema()).unwrap();
        let target = trip("t", 0.0, 0.0);
        let items = vec![trip("cheap", 0.1, 0.9), trip("fast", 0.9, 0.1)];

        // Equal weights tie, so input order wins
        let results = recommender.recommend(&target, &items).unwrap();
        assert_eq!(results[0].label, Label::from("cheap"));

        let trip_focused = recommender
            .with_weights(&HashMap::from([(1, 5.0), (7, 3.0)]))
            .unwrap();
        assert_eq!(trip_focused.schema().total_weight(), 6.0);
        let results = trip_focused.recommend(&target, &items).unwrap();
        assert_eq!(results[0].label, Label::from("fast"));
    }

    #[test]
    fn test_with_weights_all_zero_is_error() {
        let recommender = Recommender::new(abs_schema()).unwrap();
        let err = recommender
            .with_weights(&HashMap::from([(0, -1.0), (1, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, RecommendError::Schema(SchemaError::ZeroTotalWeight)));
    }

    #[tokio::test]
    async fn test_recommend_async_matches_sync() {
        let recommender = Recommender::new(abs_schema()).unwrap();
        let target = trip("t", 0.0, 0.0);
        let items = vec![trip("a", 0.3, 0.3), trip("b", 0.1, 0.0)];

        let sync = recommender.recommend(&target, &items).unwrap();
        let deferred = recommender.recommend_async(&target, &items).await.unwrap();
        assert_eq!(sync, deferred);
    }

    #[tokio::test]
    async fn test_recommend_async_reports_failure() {
        let recommender = Recommender::new(abs_schema()).unwrap();
        let target = trip("t", 0.0, 0.0);
        let short = Item::new("short").with_feature("x", 0.0);

        let outcome = recommender.recommend_async(&target, [&short]).await;
        assert!(outcome.is_err());
    }

    #[test]
    fn test_feature_range_rescale() {
        let mut range = FeatureRange::new(2.0);
        range.include(10.0);
        range.include(4.0);
        assert_eq!(range.min, 2.0);
        assert_eq!(range.max, 10.0);
        assert_eq!(range.rescale(6.0), 0.5);
        assert_eq!(FeatureRange::new(3.0).rescale(3.0), 0.0);
    }
}
