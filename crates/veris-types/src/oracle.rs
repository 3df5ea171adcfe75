//! Consensus round structures.

use serde::{Deserialize, Serialize};

use crate::OperatorId;

/// A single operator's authenticated price report.
///
/// Signature verification and operator-registration checks happen upstream;
/// by the time an attestation reaches this workspace it is trusted to have
/// been produced by the named operator. Immutable once submitted to a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// The reporting operator.
    pub operator_id: OperatorId,
    /// Reported price, 18-decimal fixed point. Must be positive.
    pub price: u128,
    /// The operator's stake backing this report, 18-decimal fixed point.
    pub stake: u128,
    /// Unix timestamp of the report.
    pub timestamp: u64,
    /// Historical reliability of the operator in basis points `[0, 10000]`.
    pub reliability: u64,
}

/// The outcome of one consensus computation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Aggregated consensus price, 18-decimal fixed point.
    pub consensus_price: u128,
    /// Total stake known to the round.
    pub total_stake: u128,
    /// Stake behind the attestations that participated.
    pub participating_stake: u128,
    /// Composite confidence in basis points `[0, 10000]`.
    pub confidence_level: u64,
    /// Price clustering score in basis points `[0, 10000]`.
    pub convergence_score: u64,
    /// Whether `confidence_level` met the round's threshold.
    pub has_consensus: bool,
}

/// A published consensus with its computation time.
///
/// The host caches one snapshot per pool; the price validator consults it
/// when gating a dependent action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusSnapshot {
    /// The consensus result.
    pub result: ConsensusResult,
    /// Unix timestamp at which the result was published.
    pub computed_at: u64,
}

/// Per-pool oracle configuration.
///
/// Owned and mutated by governance outside this workspace; the core treats
/// it as read-only input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Whether the oracle gates actions for this pool.
    pub enabled: bool,
    /// Maximum tolerated deviation of an action's price from consensus.
    pub max_price_deviation_bps: u64,
    /// Minimum participating stake for a consensus to gate actions.
    pub min_stake_required: u128,
    /// Confidence threshold for consensus, >= 5100 (simple majority).
    pub consensus_threshold_bps: u64,
    /// Maximum age of a snapshot before it is considered stale, in seconds.
    pub max_staleness_secs: u64,
}
