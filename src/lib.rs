//! # tico
//!
//! A tiny content-based recommender.
//!
//! tico ranks candidate items against a target item by combining per-feature
//! distances into one weighted score. Items carry mixed data types
//! (quantitative, ordinal, nominal, binary) and every feature position gets its
//! own distance strategy, weight and normalization policy.
//!
//! ## Quick Start
//!
//! ```rust
//! use tico::prelude::*;
//!
//! let schema = Schema::new(vec![
//!     SchemaEntry::new(DistanceKind::AbsDiff),
//!     SchemaEntry::new(DistanceKind::AbsDiff),
//! ]);
//!
//! let target = Item::new("me")
//!     .with_feature("expensiveness", 0)
//!     .with_feature("trip", 1);
//! let offer = target.clone();
//!
//! let results = recommend(&target, [&offer], &schema).unwrap();
//! assert_eq!(results[0].score, 0.0);
//! ```
//!
//! ## Crate Structure
//!
//! - [`tico-core`](https://docs.rs/tico-core) - Data model (FeatureValue, Item, FeatureVector)
//! - [`tico-similarity`](https://docs.rs/tico-similarity) - Distance library, schema and scoring engine
//!
//! ## Features
//!
//! - **Multivariate feature vectors**: numbers, booleans, strings and nested lists
//! - **Custom distance functions**: plug in any [`Distance`] strategy
//! - **Selective min-max normalization**: rescale chosen features over the candidate pool
//! - **Weight factors**: per-feature weights in a weighted average

// Re-export core types
pub use tico_core::{Error, FeatureValue, FeatureVector, Item, Label, Result};

// Re-export the engine
pub use tico_similarity::{
    recommend,
    Distance,
    DistanceKind,
    ExplainedResult,
    FeatureContribution,
    FeatureRange,
    FnDistance,
    Metric,
    RankedResult,
    RecommendError,
    RecommendResponse,
    RecommendStats,
    Recommender,
    Schema,
    SchemaEntry,
    SchemaError,
};

/// Distance functions
pub mod distance {
    pub use tico_similarity::distance::*;
}

/// Commonly used types
pub mod prelude {
    pub use crate::{
        recommend,
        Distance,
        DistanceKind,
        FeatureValue,
        FnDistance,
        Item,
        Label,
        Metric,
        RankedResult,
        RecommendError,
        Recommender,
        Schema,
        SchemaEntry,
    };
}
