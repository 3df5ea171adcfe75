//! Weighted aggregation and confidence composition.
//!
//! The consensus price is a reliability-refined stake-weighted average:
//!
//! ```text
//! weight_i = stake_i * reliability_i / 10000
//! price    = sum(price_i * weight_i) / sum(weight_i)
//! ```
//!
//! falling back to pure stake weighting when the summed reliability weight
//! is zero, so reliability is a tie-breaking refinement rather than a hard
//! requirement. Accumulation runs in 256-bit integers: an 18-decimal price
//! multiplied by an 18-decimal stake does not fit in `u128`.

use primitive_types::U256;

use veris_types::oracle::{Attestation, ConsensusResult};
use veris_types::{BPS_SCALE, MIN_CONSENSUS_THRESHOLD_BPS};

use crate::scoring::{
    average_reliability, convergence_score, operator_count_score, stake_distribution_score,
    W_CONVERGENCE, W_OPERATOR_COUNT, W_RELIABILITY, W_STAKE_DISTRIBUTION,
};
use crate::{ConsensusError, Result};

/// Compute a consensus price and confidence level from a set of attestations.
///
/// Pure function of its inputs: identical attestation lists yield
/// bit-identical results, enabling deterministic replay across redundant
/// evaluators.
///
/// A round with zero total stake is an expected state (nobody has attested
/// with stake yet) and returns an all-zero result with
/// `has_consensus = false` rather than an error.
///
/// # Errors
///
/// - [`ConsensusError::EmptyAttestations`] if `attestations` is empty
/// - [`ConsensusError::ThresholdBelowMajority`] if `threshold_bps < 5100`
pub fn compute_consensus(
    attestations: &[Attestation],
    threshold_bps: u64,
) -> Result<ConsensusResult> {
    if attestations.is_empty() {
        return Err(ConsensusError::EmptyAttestations);
    }
    if threshold_bps < MIN_CONSENSUS_THRESHOLD_BPS {
        return Err(ConsensusError::ThresholdBelowMajority(threshold_bps));
    }

    let mut total_stake: u128 = 0;
    for att in attestations {
        total_stake = total_stake.saturating_add(att.stake);
    }
    if total_stake == 0 {
        return Ok(ConsensusResult::default());
    }

    let consensus_price = weighted_price(attestations, total_stake);

    let convergence = convergence_score(attestations, consensus_price);
    let distribution = stake_distribution_score(attestations, total_stake);
    let count = operator_count_score(attestations.len());
    let reliability = average_reliability(attestations);
    let confidence_level = composite_confidence(convergence, distribution, count, reliability);

    let has_consensus = confidence_level >= threshold_bps;

    tracing::debug!(
        attestations = attestations.len(),
        confidence = confidence_level,
        convergence,
        has_consensus,
        "consensus computed"
    );

    Ok(ConsensusResult {
        consensus_price,
        total_stake,
        participating_stake: total_stake,
        confidence_level,
        convergence_score: convergence,
        has_consensus,
    })
}

/// Reliability-weighted price with pure stake-weighted fallback.
fn weighted_price(attestations: &[Attestation], total_stake: u128) -> u128 {
    let mut weighted_sum = U256::zero();
    let mut weight_sum = U256::zero();
    for att in attestations {
        let weight = U256::from(att.stake) * U256::from(att.reliability) / U256::from(BPS_SCALE);
        weighted_sum = weighted_sum.saturating_add(U256::from(att.price).saturating_mul(weight));
        weight_sum = weight_sum.saturating_add(weight);
    }

    if !weight_sum.is_zero() {
        return clamp_u128(weighted_sum / weight_sum);
    }

    // No reliability data anywhere: weight by stake alone.
    let mut stake_weighted = U256::zero();
    for att in attestations {
        stake_weighted =
            stake_weighted.saturating_add(U256::from(att.price).saturating_mul(U256::from(att.stake)));
    }
    clamp_u128(stake_weighted / U256::from(total_stake))
}

/// Saturating sum of the four components, each pre-scaled to its share of
/// 10000, clamped to 10000.
fn composite_confidence(convergence: u64, distribution: u64, count: u64, reliability: u64) -> u64 {
    let share = |score: u64, weight: u64| score.saturating_mul(weight) / BPS_SCALE;
    let sum = share(convergence, W_CONVERGENCE)
        .saturating_add(share(distribution, W_STAKE_DISTRIBUTION))
        .saturating_add(share(count, W_OPERATOR_COUNT))
        .saturating_add(share(reliability, W_RELIABILITY));
    sum.min(BPS_SCALE)
}

fn clamp_u128(value: U256) -> u128 {
    u128::try_from(value).unwrap_or(u128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veris_types::PRICE_SCALE;

    fn att(price: u128, stake: u128, reliability: u64) -> Attestation {
        Attestation {
            operator_id: [0u8; 32],
            price,
            stake,
            timestamp: 1_700_000_000,
            reliability,
        }
    }

    /// Three well-clustered reporters with equal stake and high reliability.
    fn clustered_round() -> Vec<Attestation> {
        vec![
            att(2100 * PRICE_SCALE, 10 * PRICE_SCALE, 9000),
            att(2105 * PRICE_SCALE, 10 * PRICE_SCALE, 9000),
            att(2110 * PRICE_SCALE, 10 * PRICE_SCALE, 9000),
        ]
    }

    #[test]
    fn test_empty_attestations_rejected() {
        let err = compute_consensus(&[], 6600).unwrap_err();
        assert!(matches!(err, ConsensusError::EmptyAttestations));
    }

    #[test]
    fn test_threshold_below_majority_rejected() {
        let atts = clustered_round();
        let err = compute_consensus(&atts, 5099).unwrap_err();
        assert!(matches!(err, ConsensusError::ThresholdBelowMajority(5099)));
    }

    #[test]
    fn test_threshold_at_majority_accepted() {
        let atts = clustered_round();
        compute_consensus(&atts, 5100).expect("5100 is the minimum threshold");
    }

    #[test]
    fn test_zero_total_stake_short_circuits() {
        let atts = vec![att(2100 * PRICE_SCALE, 0, 9000)];
        let result = compute_consensus(&atts, 6600).expect("zero stake is not an error");
        assert_eq!(result, ConsensusResult::default());
        assert!(!result.has_consensus);
    }

    #[test]
    fn test_clustered_round_reaches_consensus() {
        let atts = clustered_round();
        let result = compute_consensus(&atts, 6600).expect("compute");

        // Equal stake and reliability: the weighted average is exact.
        assert_eq!(result.consensus_price, 2105 * PRICE_SCALE);
        assert_eq!(result.total_stake, 30 * PRICE_SCALE);
        assert_eq!(result.participating_stake, 30 * PRICE_SCALE);
        // Deviations of 23, 0, 23 bps -> avg 15, convergence 9985.
        assert_eq!(result.convergence_score, 9_985);
        // 9985*0.4 + 10000*0.3 + 6000*0.2 + 9000*0.1 = 9094.
        assert_eq!(result.confidence_level, 9_094);
        assert!(result.has_consensus);
    }

    #[test]
    fn test_reliability_fallback_to_stake_weighting() {
        // All reliability zero: weights collapse and the engine falls back
        // to pure stake weighting.
        let atts = vec![
            att(2000 * PRICE_SCALE, 30 * PRICE_SCALE, 0),
            att(2100 * PRICE_SCALE, 10 * PRICE_SCALE, 0),
        ];
        let result = compute_consensus(&atts, 5100).expect("compute");
        // (2000*30 + 2100*10) / 40 = 2025.
        assert_eq!(result.consensus_price, 2025 * PRICE_SCALE);
    }

    #[test]
    fn test_reliability_skews_weighting() {
        // Equal stakes; the more reliable reporter pulls the price toward
        // its quote.
        let atts = vec![
            att(2000 * PRICE_SCALE, 10 * PRICE_SCALE, 10_000),
            att(2100 * PRICE_SCALE, 10 * PRICE_SCALE, 5_000),
        ];
        let result = compute_consensus(&atts, 5100).expect("compute");
        let midpoint = 2050 * PRICE_SCALE;
        assert!(result.consensus_price < midpoint);
        assert!(result.consensus_price >= 2000 * PRICE_SCALE);
    }

    #[test]
    fn test_price_within_attested_bounds() {
        let cases: Vec<Vec<Attestation>> = vec![
            clustered_round(),
            vec![
                att(PRICE_SCALE, 3, 100),
                att(9999 * PRICE_SCALE, 80, 9000),
                att(5000 * PRICE_SCALE, 17, 4500),
            ],
            vec![
                att(7 * PRICE_SCALE, 1_000_000, 0),
                att(11 * PRICE_SCALE, 1, 0),
            ],
        ];
        for atts in cases {
            let result = compute_consensus(&atts, 5100).expect("compute");
            let min = atts.iter().map(|a| a.price).min().expect("min");
            let max = atts.iter().map(|a| a.price).max().expect("max");
            assert!(
                result.consensus_price >= min && result.consensus_price <= max,
                "price {} outside [{min}, {max}]",
                result.consensus_price
            );
        }
    }

    #[test]
    fn test_idempotent_over_identical_input() {
        let atts = clustered_round();
        let first = compute_consensus(&atts, 6600).expect("first");
        let second = compute_consensus(&atts, 6600).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn test_tightening_prices_never_lowers_convergence() {
        let loose = vec![
            att(2000 * PRICE_SCALE, 10, 9000),
            att(2200 * PRICE_SCALE, 10, 9000),
            att(1800 * PRICE_SCALE, 10, 9000),
        ];
        let loose_result = compute_consensus(&loose, 5100).expect("loose");

        // Pull every price strictly toward the loose consensus.
        let consensus = loose_result.consensus_price;
        let tight: Vec<Attestation> = loose
            .iter()
            .map(|a| {
                let mut t = a.clone();
                t.price = (a.price + consensus) / 2;
                t
            })
            .collect();
        let tight_result = compute_consensus(&tight, 5100).expect("tight");

        assert!(tight_result.convergence_score >= loose_result.convergence_score);
    }

    #[test]
    fn test_confidence_clamped_to_bps_scale() {
        let atts = vec![
            att(2000 * PRICE_SCALE, 10 * PRICE_SCALE, 10_000),
            att(2000 * PRICE_SCALE, 10 * PRICE_SCALE, 10_000),
            att(2000 * PRICE_SCALE, 10 * PRICE_SCALE, 10_000),
            att(2000 * PRICE_SCALE, 10 * PRICE_SCALE, 10_000),
            att(2000 * PRICE_SCALE, 10 * PRICE_SCALE, 10_000),
        ];
        let result = compute_consensus(&atts, 5100).expect("compute");
        // Perfect round: every component maxed, sum exactly 10000.
        assert_eq!(result.confidence_level, 10_000);
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let atts = vec![
            att(u128::MAX / 2, u128::MAX / 2, 10_000),
            att(u128::MAX / 2, u128::MAX / 2, 10_000),
        ];
        let result = compute_consensus(&atts, 5100).expect("compute");
        assert_eq!(result.consensus_price, u128::MAX / 2);
    }
}
