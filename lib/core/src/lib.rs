//! # tico Core
//!
//! Data model for the tico recommender.
//!
//! - [`FeatureValue`] - a tagged feature value (bool, number, text, list)
//! - [`Item`] - a label plus named features in a fixed order
//! - [`FeatureVector`] - the positional values extracted from an item
//!
//! ## Example
//!
//! ```rust
//! use tico_core::{Item, FeatureValue};
//!
//! let offer = Item::new("Flight 1")
//!     .with_feature("expensiveness", 0.2)
//!     .with_feature("seat", vec![0, 0, 1])
//!     .with_feature("ife", false);
//!
//! let vector = offer.extract();
//! assert_eq!(vector.len(), 3);
//! assert_eq!(vector.values[2], FeatureValue::Bool(false));
//! ```

pub mod error;
pub mod item;
pub mod value;

pub use error::{Error, Result};
pub use item::{FeatureVector, Item, Label};
pub use value::FeatureValue;
