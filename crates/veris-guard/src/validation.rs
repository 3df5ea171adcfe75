//! The per-action gate.
//!
//! Compares one proposed price against the pool's cached consensus snapshot
//! plus its confidence, staleness, deviation, and stake thresholds. Checks
//! run in a fixed order and the first failure wins; callers get a verdict
//! value, never an error.

use veris_types::bps::deviation_bps;
use veris_types::oracle::{ConsensusSnapshot, OracleConfig};
use veris_types::validation::{ValidationReason, ValidationResult};

/// Validate a proposed price against a published consensus snapshot.
///
/// Check order (first failure wins):
///
/// 1. confidence below the pool's consensus threshold
/// 2. snapshot older than `max_staleness_secs`
/// 3. deviation from consensus above `max_price_deviation_bps`
/// 4. participating stake below `min_stake_required`
///
/// `deviation_bps` is populated once the checks get far enough to measure
/// it (from check 3 onward).
pub fn validate_price(
    current_price: u128,
    snapshot: &ConsensusSnapshot,
    now: u64,
    config: &OracleConfig,
) -> ValidationResult {
    if snapshot.result.confidence_level < config.consensus_threshold_bps {
        return ValidationResult::invalid(ValidationReason::LowConfidence, 0);
    }

    if now.saturating_sub(snapshot.computed_at) > config.max_staleness_secs {
        return ValidationResult::invalid(ValidationReason::StalePrice, 0);
    }

    let deviation = deviation_bps(current_price, snapshot.result.consensus_price);
    if deviation > config.max_price_deviation_bps {
        return ValidationResult::invalid(ValidationReason::ExcessiveDeviation, deviation);
    }

    if snapshot.result.participating_stake < config.min_stake_required {
        return ValidationResult::invalid(ValidationReason::InsufficientStake, deviation);
    }

    ValidationResult::valid(deviation)
}
