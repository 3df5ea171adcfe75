//! # veris-feed
//!
//! Host-side oracle feed service.
//!
//! The computation crates are pure; this crate owns the per-pool lifecycle
//! around them: collecting attestations into rounds, filtering and
//! recomputing consensus, caching the published snapshot, gating swaps
//! against it, tracking operator reliability, and emitting observability
//! events. All mutable state lives in explicit per-pool stores with
//! per-pool write serialization; two concurrent recomputations can never
//! publish a stale result over a fresher one.
//!
//! ## Modules
//!
//! - [`store`] — the per-pool state store and round lifecycle
//! - [`reliability`] — per-operator reliability ledger
//! - [`history`] — bounded per-pool price history
//! - [`events`] — broadcast event bus
//! - [`config`] — TOML configuration

pub mod config;
pub mod events;
pub mod history;
pub mod reliability;
pub mod store;

use veris_consensus::ConsensusError;
use veris_guard::GuardError;

/// Error types for feed operations.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The pool has not been registered with the feed.
    #[error("unknown pool: {0}")]
    UnknownPool(String),

    /// The oracle is disabled for this pool.
    #[error("oracle disabled for pool: {0}")]
    PoolDisabled(String),

    /// The attestation violates a boundary invariant.
    #[error("invalid attestation: {0}")]
    InvalidAttestation(&'static str),

    /// A recomputation was attempted with a timestamp older than the
    /// published snapshot.
    #[error("stale recompute: published at {published}, recompute at {now}")]
    StaleRecompute {
        /// Publish time of the current snapshot.
        published: u64,
        /// The recompute's timestamp.
        now: u64,
    },

    /// A consensus computation rejected its input.
    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    /// A guard computation rejected its input.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Configuration file could not be read.
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("config parse: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience result type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
