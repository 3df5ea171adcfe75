//! Action-gating verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a proposed action was denied (or `Valid` if it was not).
///
/// The display strings are part of the observability contract: hosts emit
/// them verbatim in `SwapBlocked` events and must not be reworded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationReason {
    /// The action passed every check.
    #[serde(rename = "")]
    Valid,
    /// Consensus confidence below the pool's threshold.
    #[serde(rename = "Low confidence")]
    LowConfidence,
    /// The consensus snapshot is older than the pool allows.
    #[serde(rename = "Stale price data")]
    StalePrice,
    /// The action's price deviates too far from consensus.
    #[serde(rename = "Price deviation too high")]
    ExcessiveDeviation,
    /// Participating stake below the pool's minimum.
    #[serde(rename = "Insufficient stake")]
    InsufficientStake,
}

impl ValidationReason {
    /// The canonical reason string (empty for `Valid`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::Valid => "",
            ValidationReason::LowConfidence => "Low confidence",
            ValidationReason::StalePrice => "Stale price data",
            ValidationReason::ExcessiveDeviation => "Price deviation too high",
            ValidationReason::InsufficientStake => "Insufficient stake",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verdict of gating one proposed action against a consensus snapshot.
///
/// A denial is a routine outcome, not an error; hard errors are reserved
/// for malformed calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the action may proceed.
    pub is_valid: bool,
    /// Measured deviation from consensus in basis points, where the checks
    /// got far enough to measure it (zero otherwise).
    pub deviation_bps: u64,
    /// Denial reason, or `Valid`.
    pub reason: ValidationReason,
}

impl ValidationResult {
    /// A passing verdict with its measured deviation.
    pub fn valid(deviation_bps: u64) -> Self {
        Self {
            is_valid: true,
            deviation_bps,
            reason: ValidationReason::Valid,
        }
    }

    /// A denial with the given reason and measured deviation.
    pub fn invalid(reason: ValidationReason, deviation_bps: u64) -> Self {
        Self {
            is_valid: false,
            deviation_bps,
            reason,
        }
    }
}
