//! # tico Similarity
//!
//! Distance library and scoring engine for content-based recommendation.
//!
//! ## Features
//!
//! - **Distance library**: absolute difference, Manhattan, Canberra, Hamming and
//!   simple matching over tagged feature values
//! - **Custom strategies**: any [`Distance`] implementation can compare a feature
//! - **Selective normalization**: min-max rescaling of chosen features over the candidate pool
//! - **Weighted scoring**: one weighted average per candidate, lowest first
//! - **Explainability**: per-feature contribution breakdown
//!
//! ## Example
//!
//! ```rust
//! use tico_similarity::{DistanceKind, Recommender, Schema, SchemaEntry};
//! use tico_core::Item;
//!
//! let schema = Schema::new(vec![
//!     SchemaEntry::new(DistanceKind::AbsDiff),
//!     SchemaEntry::new(DistanceKind::SimpleMatching).with_weight(2.0),
//!     SchemaEntry::new(DistanceKind::AbsDiff).unnormalized(),
//! ]);
//! let recommender = Recommender::new(schema).unwrap();
//!
//! let traveler = Item::new("traveler")
//!     .with_feature("expensiveness", 0.2)
//!     .with_feature("seat", vec![1, 1, 0])
//!     .with_feature("time", 2.0);
//! let offers = vec![
//!     Item::new("Flight 1")
//!         .with_feature("expensiveness", 0.2)
//!         .with_feature("seat", vec![0, 0, 0])
//!         .with_feature("time", 10.0),
//!     Item::new("Flight 2")
//!         .with_feature("expensiveness", 0.3)
//!         .with_feature("seat", vec![1, 1, 0])
//!         .with_feature("time", 2.5),
//! ];
//!
//! let results = recommender.recommend(&traveler, &offers).unwrap();
//! assert_eq!(results[0].label.to_string(), "Flight 2");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Items     │────>│  Extract    │────>│  Distance   │
//! │  (target,   │     │ (features → │     │  vectors    │
//! │ candidates) │     │  positions) │     │  (pass 1)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                                        │
//!       │              ┌─────────────┐           │
//!       └─────────────>│   Schema    │<──────────┘
//!                      │ (min/max,   │
//!                      │  weights)   │
//!                      └─────────────┘
//!                             │
//!                      ┌─────────────┐
//!                      │   Ranked    │
//!                      │  (pass 2)   │
//!                      └─────────────┘
//! ```

pub mod distance;
pub mod explain;
pub mod recommend;
pub mod schema;

// Re-export main types for convenience
pub use distance::{
    abs_diff,
    canberra,
    hamming,
    manhattan,
    simple_matching,
    Distance,
    DistanceKind,
    FnDistance,
};
pub use explain::{ExplainedResult, FeatureContribution, RecommendResponse, RecommendStats};
pub use recommend::{recommend, FeatureRange, RankedResult, RecommendError, Recommender};
pub use schema::{Metric, Schema, SchemaEntry, SchemaError};
