//! Per-operator reliability ledger.
//!
//! Reliability is how consistently an operator's reports land near the
//! published consensus. The ledger feeds the engine's reliability-weighted
//! aggregation: the feed stamps every incoming attestation with the
//! operator's current score, so an operator cannot inflate its own weight.
//!
//! Scores move by a 9:1 exponential moving average per settled round:
//!
//! ```text
//! round_score = 10000 - min(deviation_bps, 10000)
//! new         = (old * 9 + round_score) / 10
//! ```

use std::collections::HashMap;

use veris_types::{OperatorId, BPS_SCALE};

/// Score assigned to an operator with no settled rounds.
pub const INITIAL_RELIABILITY: u64 = 5_000;

/// Tracks a reliability score per operator across all pools.
#[derive(Clone, Debug, Default)]
pub struct ReliabilityLedger {
    scores: HashMap<OperatorId, u64>,
}

impl ReliabilityLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The operator's current score, [`INITIAL_RELIABILITY`] if unseen.
    pub fn score(&self, operator: &OperatorId) -> u64 {
        self.scores
            .get(operator)
            .copied()
            .unwrap_or(INITIAL_RELIABILITY)
    }

    /// Fold one settled round into the operator's score.
    ///
    /// `deviation_bps` is the distance of the operator's report from the
    /// round's published consensus price.
    pub fn settle(&mut self, operator: &OperatorId, deviation_bps: u64) {
        let round_score = BPS_SCALE - deviation_bps.min(BPS_SCALE);
        let old = self.score(operator);
        let new = (old * 9 + round_score) / 10;
        self.scores.insert(*operator, new);

        tracing::trace!(
            operator = %hex::encode(operator),
            deviation_bps,
            score = new,
            "reliability settled"
        );
    }

    /// Number of operators with a settled score.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no operator has settled a round yet.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
