//! Weighted combination of redundant price sources.
//!
//! Folds several independent feeds (e.g. an on-chain TWAP, an off-chain
//! aggregate, a fallback oracle) into one price plus a consistency score:
//!
//! ```text
//! weighted_price = sum(price_i * weight_i) / sum(weight_i)
//! consistency    = 10000 - weighted_avg_deviation_bps
//! ```
//!
//! where each source's deviation from the combined price is weighted by the
//! source's own weight before averaging.

use primitive_types::U256;

use veris_types::bps::deviation_bps;
use veris_types::BPS_SCALE;

use crate::{GuardError, Result};

/// A combined price with its cross-source consistency score.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceCombination {
    /// Weight-averaged price.
    pub weighted_price: u128,
    /// Agreement between sources in basis points (10000 = identical).
    pub consistency: u64,
}

/// Combine several price sources into one weighted price.
///
/// A zero weight sum is an expected state (all sources currently
/// disqualified) and short-circuits to a zero result.
///
/// # Errors
///
/// [`GuardError::InvalidSources`] if the arrays are empty or differ in
/// length.
pub fn combine_sources(prices: &[u128], weights: &[u128]) -> Result<SourceCombination> {
    if prices.is_empty() || prices.len() != weights.len() {
        return Err(GuardError::InvalidSources {
            sources: prices.len(),
            weights: weights.len(),
        });
    }

    let mut weighted_sum = U256::zero();
    let mut weight_sum = U256::zero();
    for (price, weight) in prices.iter().zip(weights) {
        weighted_sum =
            weighted_sum.saturating_add(U256::from(*price).saturating_mul(U256::from(*weight)));
        weight_sum = weight_sum.saturating_add(U256::from(*weight));
    }
    if weight_sum.is_zero() {
        return Ok(SourceCombination {
            weighted_price: 0,
            consistency: 0,
        });
    }

    let weighted_price = u128::try_from(weighted_sum / weight_sum).unwrap_or(u128::MAX);
    if weighted_price == 0 {
        return Ok(SourceCombination {
            weighted_price: 0,
            consistency: 0,
        });
    }

    // Weighted average deviation of each source from the combined price.
    let mut deviation_sum = U256::zero();
    for (price, weight) in prices.iter().zip(weights) {
        let dev = deviation_bps(*price, weighted_price);
        deviation_sum =
            deviation_sum.saturating_add(U256::from(dev).saturating_mul(U256::from(*weight)));
    }
    let avg_deviation = u64::try_from(deviation_sum / weight_sum).unwrap_or(u64::MAX);

    Ok(SourceCombination {
        weighted_price,
        consistency: BPS_SCALE.saturating_sub(avg_deviation),
    })
}
