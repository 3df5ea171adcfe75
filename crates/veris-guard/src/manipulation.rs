//! Volatility analysis over a price/time series.
//!
//! Runs independently of any single consensus round: the host keeps a
//! rolling window of published prices per pool and asks this module whether
//! the pattern looks like manipulation. The signal feeds host policy; the
//! consensus engine never consumes it.

use veris_types::bps::deviation_bps;

use crate::{GuardError, Result};

/// Minimum number of points for a meaningful analysis.
pub const MIN_DATA_POINTS: usize = 3;

/// Average step volatility above which a series is flagged (20%).
pub const VOLATILITY_THRESHOLD_BPS: u64 = 2_000;

/// Single-step deviation above which a series is flagged (50%).
pub const STEP_DEVIATION_THRESHOLD_BPS: u64 = 5_000;

/// The detector's verdict with its component measurements.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManipulationReport {
    /// Whether the series trips either threshold.
    pub is_manipulation: bool,
    /// `(avg_volatility + max_deviation) / 2`, in basis points.
    pub suspicion_level: u64,
    /// Mean deviation between consecutive prices, in basis points.
    pub avg_volatility_bps: u64,
    /// Largest deviation between consecutive prices, in basis points.
    pub max_step_deviation_bps: u64,
}

/// Analyze a price series for suspicious volatility patterns.
///
/// Each step deviation is `|p[i+1] - p[i]| * 10000 / p[i]`. The series is
/// flagged when the mean step deviation exceeds
/// [`VOLATILITY_THRESHOLD_BPS`] or any single step exceeds
/// [`STEP_DEVIATION_THRESHOLD_BPS`].
///
/// # Errors
///
/// - [`GuardError::LengthMismatch`] if the series differ in length
/// - [`GuardError::InsufficientDataPoints`] if fewer than
///   [`MIN_DATA_POINTS`] points are supplied
/// - [`GuardError::ZeroPrice`] if any price in the series is zero
pub fn detect_manipulation(prices: &[u128], timestamps: &[u64]) -> Result<ManipulationReport> {
    if prices.len() != timestamps.len() {
        return Err(GuardError::LengthMismatch {
            prices: prices.len(),
            timestamps: timestamps.len(),
        });
    }
    if prices.len() < MIN_DATA_POINTS {
        return Err(GuardError::InsufficientDataPoints {
            required: MIN_DATA_POINTS,
            available: prices.len(),
        });
    }
    if let Some(idx) = prices.iter().position(|p| *p == 0) {
        return Err(GuardError::ZeroPrice(idx));
    }

    let mut deviation_sum: u128 = 0;
    let mut max_step_deviation: u64 = 0;
    let steps = prices.len() - 1;
    for window in prices.windows(2) {
        let dev = deviation_bps(window[1], window[0]);
        deviation_sum = deviation_sum.saturating_add(dev as u128);
        max_step_deviation = max_step_deviation.max(dev);
    }

    let avg_volatility = u64::try_from(deviation_sum / steps as u128).unwrap_or(u64::MAX);
    let suspicion_level = avg_volatility / 2 + max_step_deviation / 2
        + (avg_volatility % 2 + max_step_deviation % 2) / 2;
    let is_manipulation = avg_volatility > VOLATILITY_THRESHOLD_BPS
        || max_step_deviation > STEP_DEVIATION_THRESHOLD_BPS;

    if is_manipulation {
        tracing::warn!(
            avg_volatility,
            max_step_deviation,
            suspicion_level,
            "price series flagged as manipulation"
        );
    }

    Ok(ManipulationReport {
        is_manipulation,
        suspicion_level,
        avg_volatility_bps: avg_volatility,
        max_step_deviation_bps: max_step_deviation,
    })
}
