//! Distance functions for feature comparison
//!
//! Pure functions mapping two same-shaped feature values to a non-negative
//! number, where 0 means identical. They back the built-in [`DistanceKind`]
//! strategies; callers plug in their own through the [`Distance`] trait.

use serde::{Deserialize, Serialize};
use tico_core::{Error, FeatureValue, Result};

/// Absolute difference, for quantitative data
#[inline]
pub fn abs_diff(a: f64, b: f64) -> f64 {
    (a - b).abs()
}

/// City block (Manhattan) distance, for quantitative vectors
pub fn manhattan(a: &[f64], b: &[f64]) -> Result<f64> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| abs_diff(*x, *y)).sum())
}

/// Canberra distance, for ranked lists.
///
/// A position where both values are zero contributes 0.
pub fn canberra(a: &[f64], b: &[f64]) -> Result<f64> {
    check_len(a.len(), b.len())?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| {
            let denom = x.abs() + y.abs();
            if denom == 0.0 {
                0.0
            } else {
                abs_diff(*x, *y) / denom
            }
        })
        .sum())
}

/// Hamming distance, for binary data, strings and nested lists
///
/// - two lists: sum of elementwise distances (lengths must match)
/// - two strings: number of differing characters (lengths must match)
/// - two scalars: 0 if equal, 1 otherwise; scalars of different kinds never match
///
/// Strings are compared as Unicode scalar values (`char`s), not UTF-16 code
/// units, so a character outside the Basic Multilingual Plane counts once.
pub fn hamming(a: &FeatureValue, b: &FeatureValue) -> Result<f64> {
    use FeatureValue::*;

    match (a, b) {
        (List(xs), List(ys)) => {
            check_len(xs.len(), ys.len())?;
            xs.iter()
                .zip(ys)
                .try_fold(0.0, |acc, (x, y)| Ok::<_, Error>(acc + hamming(x, y)?))
        }
        (Text(x), Text(y)) => {
            let xs: Vec<char> = x.chars().collect();
            let ys: Vec<char> = y.chars().collect();
            check_len(xs.len(), ys.len())?;
            Ok(xs.iter().zip(&ys).filter(|(c, d)| c != d).count() as f64)
        }
        (List(_), other) | (other, List(_)) => Err(Error::shape("list", other.kind())),
        (Text(_), other) | (other, Text(_)) => Err(Error::shape("text", other.kind())),
        (Number(x), Number(y)) => Ok(if x == y { 0.0 } else { 1.0 }),
        (Bool(x), Bool(y)) => Ok(if x == y { 0.0 } else { 1.0 }),
        _ => Ok(1.0),
    }
}

/// Simple matching distance: the fraction of mismatched positions.
///
/// Suited to symmetric binary vectors where a shared 0 carries as much
/// information as a shared 1. Two empty sequences are at distance 0.
pub fn simple_matching(a: &[FeatureValue], b: &[FeatureValue]) -> Result<f64> {
    check_len(a.len(), b.len())?;
    if a.is_empty() {
        return Ok(0.0);
    }
    let mismatches = a
        .iter()
        .zip(b)
        .try_fold(0.0, |acc, (x, y)| Ok::<_, Error>(acc + hamming(x, y)?))?;
    Ok(mismatches / a.len() as f64)
}

#[inline]
fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// A distance strategy over two feature values.
///
/// Implementations must be pure and return a non-negative, finite number;
/// the scoring engine rejects anything else.
pub trait Distance: Send + Sync + std::fmt::Debug {
    /// Name shown in errors and explanations
    fn name(&self) -> &str;

    fn distance(&self, a: &FeatureValue, b: &FeatureValue) -> Result<f64>;
}

/// Built-in distance strategies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DistanceKind {
    /// `|a - b|` over two numbers
    AbsDiff,
    /// Sum of elementwise absolute differences over two number lists
    Manhattan,
    /// Canberra distance over two number lists
    Canberra,
    /// Hamming distance over scalars, strings or lists
    Hamming,
    /// Mean elementwise Hamming distance over two lists, in [0, 1] for flat lists
    #[serde(alias = "smd")]
    SimpleMatching,
}

impl Distance for DistanceKind {
    fn name(&self) -> &str {
        match self {
            DistanceKind::AbsDiff => "abs_diff",
            DistanceKind::Manhattan => "manhattan",
            DistanceKind::Canberra => "canberra",
            DistanceKind::Hamming => "hamming",
            DistanceKind::SimpleMatching => "simple_matching",
        }
    }

    fn distance(&self, a: &FeatureValue, b: &FeatureValue) -> Result<f64> {
        match self {
            DistanceKind::AbsDiff => Ok(abs_diff(a.expect_number()?, b.expect_number()?)),
            DistanceKind::Manhattan => manhattan(&a.numbers()?, &b.numbers()?),
            DistanceKind::Canberra => canberra(&a.numbers()?, &b.numbers()?),
            DistanceKind::Hamming => hamming(a, b),
            DistanceKind::SimpleMatching => simple_matching(a.expect_list()?, b.expect_list()?),
        }
    }
}

impl std::fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Adapts a closure into a named [`Distance`] strategy
pub struct FnDistance<F> {
    name: String,
    f: F,
}

impl<F> FnDistance<F>
where
    F: Fn(&FeatureValue, &FeatureValue) -> Result<f64> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> std::fmt::Debug for FnDistance<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnDistance").field("name", &self.name).finish()
    }
}

impl<F> Distance for FnDistance<F>
where
    F: Fn(&FeatureValue, &FeatureValue) -> Result<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, a: &FeatureValue, b: &FeatureValue) -> Result<f64> {
        (self.f)(a, b)
    }
}
