//! # veris-consensus
//!
//! Stake-weighted price consensus from operator attestations.
//!
//! A set of authenticated [`Attestation`](veris_types::oracle::Attestation)s
//! is aggregated into a single consensus price and a composite confidence
//! level. Every computation is a pure function over its arguments: no I/O,
//! no locking, integer arithmetic only, so independent evaluators converge
//! on bit-identical results.
//!
//! ## Modules
//!
//! - [`engine`] — weighted aggregation and confidence composition
//! - [`scoring`] — the four confidence component scorers
//! - [`outlier`] — median-based pre-filtering of attestations

pub mod engine;
pub mod outlier;
pub mod scoring;

/// Error types for consensus computation.
///
/// These are hard input errors: the caller violated a precondition it
/// controls. Expected degenerate states (zero stake, zero weight) are not
/// errors; they short-circuit to explicit zero-valued results.
#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    /// The attestation list is empty.
    #[error("no attestations submitted")]
    EmptyAttestations,

    /// The requested threshold does not reach a simple majority.
    #[error("consensus threshold {0} bps below simple majority (5100)")]
    ThresholdBelowMajority(u64),
}

/// Convenience result type for consensus operations.
pub type Result<T> = std::result::Result<T, ConsensusError>;
