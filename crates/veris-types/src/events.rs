//! Observability event types emitted by the hosting service.
//!
//! The payload shapes are part of the external contract; consumers key on
//! them for monitoring and alerting.

use serde::{Deserialize, Serialize};

use crate::{ActorId, OperatorId, PoolId};

/// Envelope for all feed events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub timestamp: u64,
    pub payload: serde_json::Value,
}

/// All event types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ConsensusReached,
    SwapBlocked,
    ManipulationDetected,
}

/// A consensus was published for a pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusReached {
    pub pool: PoolId,
    pub price: u128,
    pub total_stake: u128,
    pub attestation_count: u64,
    pub confidence: u64,
}

/// A proposed action was denied by the price gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapBlocked {
    pub pool: PoolId,
    pub actor: ActorId,
    pub requested_price: u128,
    pub consensus_price: u128,
    pub reason: String,
}

/// An operator's report deviated suspiciously from consensus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManipulationDetected {
    pub pool: PoolId,
    pub suspicious_operator: OperatorId,
    pub reported_price: u128,
    pub consensus_price: u128,
    pub deviation_bps: u64,
}
