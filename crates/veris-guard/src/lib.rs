//! # veris-guard
//!
//! Per-action price gating and time-series diagnostics.
//!
//! Sits between a published consensus and the action it protects: the
//! validator decides whether one proposed price may proceed, the
//! multi-source combiner folds redundant feeds into a single price with a
//! consistency score, and the manipulation detector flags suspicious
//! volatility in a rolling price history.
//!
//! ## Modules
//!
//! - [`validation`] — the per-action gate against a consensus snapshot
//! - [`multi_source`] — weighted combination of redundant price sources
//! - [`manipulation`] — volatility analysis over a price/time series

pub mod manipulation;
pub mod multi_source;
pub mod validation;

/// Error types for guard operations.
///
/// All variants are hard input errors (a precondition the caller controls
/// was violated). Business denials are [`ValidationResult`]
/// (veris_types::validation::ValidationResult) values, never errors.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// Price and timestamp series differ in length.
    #[error("length mismatch: {prices} prices, {timestamps} timestamps")]
    LengthMismatch {
        /// Number of price points.
        prices: usize,
        /// Number of timestamps.
        timestamps: usize,
    },

    /// Too few data points for a meaningful analysis.
    #[error("insufficient data points: need {required}, have {available}")]
    InsufficientDataPoints {
        /// Minimum points required.
        required: usize,
        /// Points supplied.
        available: usize,
    },

    /// A price in the series is zero.
    #[error("zero price at index {0}")]
    ZeroPrice(usize),

    /// Source and weight arrays are empty or differ in length.
    #[error("invalid sources: {sources} prices, {weights} weights")]
    InvalidSources {
        /// Number of source prices.
        sources: usize,
        /// Number of weights.
        weights: usize,
    },
}

/// Convenience result type for guard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
