//! Error taxonomy
//!
//! Two tiers: [`TangleError`] aborts a run; [`DetectorError`] only degrades
//! a single coordination signal or misinformation indicator to an empty
//! result.

use thiserror::Error;

/// Errors that abort an analysis run
#[derive(Debug, Error)]
pub enum TangleError {
    #[error("No layers available. Build layers first.")]
    NoLayers,

    #[error("Unknown combination method: {0}")]
    UnknownCombineMethod(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fallible tangle operations
pub type TangleResult<T> = Result<T, TangleError>;

/// Reasons a single detector produced no output.
///
/// Never fatal: the owning engine logs the reason and continues with an
/// empty result for that detector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectorError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("insufficient data: need {needed} usable records, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error("vectorization failed: {0}")]
    VectorizationFailure(String),
}
