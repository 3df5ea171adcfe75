//! # veris-types
//!
//! Shared domain types used across the Veris workspace.
//!
//! All prices and stake amounts are fixed-point integers with 18 fractional
//! decimal digits ([`PRICE_SCALE`]). All percentage-like quantities (scores,
//! deviations, reliability) are basis points in `[0, BPS_SCALE]`.

pub mod bps;
pub mod events;
pub mod oracle;
pub mod validation;

/// Operator identifier (32-byte public key hash).
pub type OperatorId = [u8; 32];

/// Pool identifier: the subject a consensus is formed for.
pub type PoolId = [u8; 32];

/// Actor identifier: the initiator of a gated action.
pub type ActorId = [u8; 32];

/// Fixed-point scale for prices and stake amounts (18 decimal digits).
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Basis-point denominator. All scores and deviations live in `[0, BPS_SCALE]`.
pub const BPS_SCALE: u64 = 10_000;

/// Minimum accepted consensus threshold: simple majority (51%).
pub const MIN_CONSENSUS_THRESHOLD_BPS: u64 = 5_100;
