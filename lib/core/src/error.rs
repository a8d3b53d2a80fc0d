use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid feature value: {0}")]
    InvalidFeature(String),

    /// Failure reported by a caller-provided distance strategy
    #[error("Distance error: {0}")]
    Distance(String),
}

impl Error {
    /// Shape mismatch where `expected` names the shape a strategy accepts
    pub fn shape(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
