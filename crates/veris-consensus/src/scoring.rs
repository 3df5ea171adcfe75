//! Confidence component scorers.
//!
//! The composite confidence level is a weighted sum of four components:
//!
//! ```text
//! confidence = convergence * 0.40
//!            + stake_distribution * 0.30
//!            + operator_count * 0.20
//!            + avg_reliability * 0.10
//! ```
//!
//! All components and weights are basis points; the weights sum to 10000.

use primitive_types::U256;

use veris_types::bps::deviation_bps;
use veris_types::oracle::Attestation;
use veris_types::BPS_SCALE;

/// Weight of the convergence component.
pub const W_CONVERGENCE: u64 = 4_000;

/// Weight of the stake distribution component.
pub const W_STAKE_DISTRIBUTION: u64 = 3_000;

/// Weight of the operator count component.
pub const W_OPERATOR_COUNT: u64 = 2_000;

/// Weight of the average reliability component.
pub const W_RELIABILITY: u64 = 1_000;

/// Single-attestation deviation beyond which the convergence score takes an
/// outlier penalty.
pub const OUTLIER_PENALTY_THRESHOLD_BPS: u64 = 2_000;

/// Score how tightly attestation prices cluster around the consensus price.
///
/// `base = max(10000 - avg_deviation, 0)`, then an outlier penalty of
/// `(max_deviation - 2000) / 2` is subtracted when any single attestation
/// deviates by more than [`OUTLIER_PENALTY_THRESHOLD_BPS`]. The penalty
/// punishes one extreme reporter even when the average still looks tight.
pub fn convergence_score(attestations: &[Attestation], consensus_price: u128) -> u64 {
    if attestations.is_empty() || consensus_price == 0 {
        return 0;
    }

    let mut deviation_sum: u128 = 0;
    let mut max_deviation: u64 = 0;
    for att in attestations {
        let dev = deviation_bps(att.price, consensus_price);
        deviation_sum = deviation_sum.saturating_add(dev as u128);
        max_deviation = max_deviation.max(dev);
    }

    let avg_deviation =
        u64::try_from(deviation_sum / attestations.len() as u128).unwrap_or(u64::MAX);

    let base = BPS_SCALE.saturating_sub(avg_deviation);
    let outlier_penalty = if max_deviation > OUTLIER_PENALTY_THRESHOLD_BPS {
        (max_deviation - OUTLIER_PENALTY_THRESHOLD_BPS) / 2
    } else {
        0
    };

    base.saturating_sub(outlier_penalty)
}

/// Score how evenly stake is spread across participants.
///
/// Computes a Gini-coefficient proxy: the sum of absolute stake differences
/// over each unordered pair, normalized by `n^2 * (total_stake / n)`, which
/// yields the classical Gini value in basis points. The score is
/// `10000 - gini`, so broad participation scores high and a round dominated
/// by one or two large stakers scores low.
///
/// Quadratic in the participant count; acceptable at the tens of operators
/// this runs at. A sorted-array linear-time Gini would be numerically
/// equivalent but not bit-identical at all rounding boundaries, so the
/// pairwise form is kept.
pub fn stake_distribution_score(attestations: &[Attestation], total_stake: u128) -> u64 {
    if attestations.len() < 2 || total_stake == 0 {
        return 0;
    }

    let n = attestations.len() as u128;
    let average_stake = total_stake / n;
    if average_stake == 0 {
        return 0;
    }

    let mut diff_sum = U256::zero();
    for (i, a) in attestations.iter().enumerate() {
        for b in &attestations[i + 1..] {
            diff_sum = diff_sum.saturating_add(U256::from(a.stake.abs_diff(b.stake)));
        }
    }

    let denominator = U256::from(n) * U256::from(n) * U256::from(average_stake);
    let gini_bps = diff_sum.saturating_mul(U256::from(BPS_SCALE)) / denominator;
    let gini_bps = u64::try_from(gini_bps).unwrap_or(u64::MAX);

    BPS_SCALE.saturating_sub(gini_bps)
}

/// Map a participant count to a saturating confidence contribution.
///
/// Fixed stepwise curve, not a formula; reproduced exactly for
/// compatibility with redundant evaluators.
pub fn operator_count_score(count: usize) -> u64 {
    match count {
        0 => 0,
        1 => 2_000,
        2 => 4_000,
        3 => 6_000,
        4 => 7_500,
        _ => 10_000,
    }
}

/// Arithmetic mean of operator reliability across all attestations.
pub fn average_reliability(attestations: &[Attestation]) -> u64 {
    if attestations.is_empty() {
        return 0;
    }
    let sum: u128 = attestations.iter().map(|a| a.reliability as u128).sum();
    u64::try_from(sum / attestations.len() as u128).unwrap_or(u64::MAX)
}
