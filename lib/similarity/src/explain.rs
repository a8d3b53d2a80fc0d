//! Explainability for ranked results
//!
//! Attaches feature names to the per-position distances and contributions of
//! a [`RankedResult`], so callers can see why a candidate ranked where it did.

use crate::recommend::RankedResult;
use serde::Serialize;
use tico_core::{Item, Label};

/// One feature's part in a candidate's score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub feature: String,
    /// Raw distance to the target on this feature
    pub distance: f64,
    /// Weighted, possibly rescaled share of the score
    pub contribution: f64,
}

/// A ranked result with a per-feature breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainedResult {
    pub label: Label,
    pub score: f64,
    pub explain: Vec<FeatureContribution>,
}

impl ExplainedResult {
    /// Name the positions of `ranked` with `feature_names`, usually the target's
    pub fn from_ranked(ranked: RankedResult, feature_names: &[&str]) -> Self {
        let explain = ranked
            .distances
            .iter()
            .zip(&ranked.contributions)
            .enumerate()
            .map(|(position, (&distance, &contribution))| FeatureContribution {
                feature: feature_names
                    .get(position)
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| format!("#{}", position)),
                distance,
                contribution,
            })
            .collect();

        Self {
            label: ranked.label,
            score: ranked.score,
            explain,
        }
    }

    pub fn from_ranked_list(ranked_list: Vec<RankedResult>, feature_names: &[&str]) -> Vec<Self> {
        ranked_list
            .into_iter()
            .map(|r| Self::from_ranked(r, feature_names))
            .collect()
    }

    /// Feature with the largest contribution
    pub fn top_feature(&self) -> Option<&FeatureContribution> {
        self.explain
            .iter()
            .max_by(|a, b| a.contribution.partial_cmp(&b.contribution).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Serializable response wrapping explained results
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub result: Vec<ExplainedResult>,
}

impl RecommendResponse {
    pub fn new(results: Vec<ExplainedResult>) -> Self {
        Self { result: results }
    }

    /// Explain `ranked` using the target's feature names
    pub fn from_ranked(ranked_list: Vec<RankedResult>, target: &Item) -> Self {
        let names = target.feature_names();
        Self {
            result: ExplainedResult::from_ranked_list(ranked_list, &names),
        }
    }
}

/// Summary statistics for one ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendStats {
    pub candidates_count: usize,
    /// Mean score over all candidates
    pub avg_score: f64,
    /// Lowest score, i.e. the best match
    pub best_score: f64,
    /// Position of the feature that added most to the best match's score
    pub top_contributing_feature: Option<usize>,
}

impl RecommendStats {
    /// Compute stats from results sorted by [`crate::Recommender::recommend`]
    pub fn compute(results: &[RankedResult]) -> Self {
        let Some(best) = results.first() else {
            return Self {
                candidates_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_contributing_feature: None,
            };
        };

        let avg_score = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;

        let top_contributing_feature = best
            .contributions
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0.0)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(position, _)| position);

        Self {
            candidates_count: results.len(),
            avg_score,
            best_score: best.score,
            top_contributing_feature,
        }
    }
}
