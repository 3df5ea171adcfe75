//! Per-pool state store and round lifecycle.
//!
//! One [`OracleFeed`] owns every per-pool mutable mapping: the oracle
//! config, the open attestation round, the published consensus snapshot,
//! and the price history. The pool map is read-locked only to fetch a
//! pool's entry; every read-modify-write of one pool happens under that
//! pool's own mutex, so the collect -> filter -> compute -> publish
//! sequence is serialized per pool while distinct pools proceed in
//! parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{info, warn};

use veris_consensus::engine::compute_consensus;
use veris_consensus::outlier::filter_outliers;
use veris_guard::manipulation::{detect_manipulation, ManipulationReport};
use veris_guard::validation::validate_price;
use veris_types::bps::deviation_bps;
use veris_types::events::{
    ConsensusReached, Event, EventType, ManipulationDetected, SwapBlocked,
};
use veris_types::oracle::{Attestation, ConsensusResult, ConsensusSnapshot, OracleConfig};
use veris_types::validation::{ValidationReason, ValidationResult};
use veris_types::{ActorId, OperatorId, PoolId, MIN_CONSENSUS_THRESHOLD_BPS};

use crate::config::FeedConfig;
use crate::events::EventBus;
use crate::history::PriceHistory;
use crate::reliability::ReliabilityLedger;
use crate::{FeedError, Result};

/// Mutable state of one pool. All access goes through the pool's mutex.
#[derive(Debug)]
struct PoolState {
    config: OracleConfig,
    /// The open round: latest attestation per operator, in first-submission
    /// order.
    pending: Vec<Attestation>,
    snapshot: Option<ConsensusSnapshot>,
    history: PriceHistory,
}

/// The oracle feed service.
pub struct OracleFeed {
    pools: RwLock<HashMap<PoolId, Arc<Mutex<PoolState>>>>,
    reliability: Mutex<ReliabilityLedger>,
    events: EventBus,
    filter_max_deviation_bps: u64,
    history_capacity: usize,
}

impl OracleFeed {
    /// Create a feed from its configuration.
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
            reliability: Mutex::new(ReliabilityLedger::new()),
            events: EventBus::new(config.events.buffer),
            filter_max_deviation_bps: config.filter.max_deviation_bps,
            history_capacity: config.history.capacity,
        }
    }

    /// Register a pool, or update the config of an already-registered pool
    /// (open round, snapshot, and history are preserved).
    ///
    /// # Errors
    ///
    /// [`ConsensusError::ThresholdBelowMajority`]
    /// (veris_consensus::ConsensusError::ThresholdBelowMajority) if the
    /// config's threshold does not reach a simple majority.
    pub async fn register_pool(&self, pool: PoolId, config: OracleConfig) -> Result<()> {
        if config.consensus_threshold_bps < MIN_CONSENSUS_THRESHOLD_BPS {
            return Err(veris_consensus::ConsensusError::ThresholdBelowMajority(
                config.consensus_threshold_bps,
            )
            .into());
        }

        let mut pools = self.pools.write().await;
        if let Some(entry) = pools.get(&pool) {
            entry.lock().await.config = config;
        } else {
            pools.insert(
                pool,
                Arc::new(Mutex::new(PoolState {
                    config,
                    pending: Vec::new(),
                    snapshot: None,
                    history: PriceHistory::new(self.history_capacity),
                })),
            );
        }
        Ok(())
    }

    /// Accept an authenticated attestation into the pool's open round.
    ///
    /// The attestation's reliability field is stamped from the feed's
    /// ledger (an operator cannot inflate its own weight). A resubmission
    /// by the same operator replaces its previous pending attestation in
    /// place. A report deviating from the published consensus by more than
    /// the pool's deviation budget is still accepted (the outlier filter
    /// judges it at recompute time) but raises `ManipulationDetected`.
    ///
    /// # Errors
    ///
    /// [`FeedError::UnknownPool`], [`FeedError::PoolDisabled`], or
    /// [`FeedError::InvalidAttestation`] for a non-positive price.
    pub async fn submit_attestation(&self, pool: PoolId, attestation: Attestation) -> Result<()> {
        let entry = self.pool(&pool).await?;
        let mut state = entry.lock().await;

        if !state.config.enabled {
            return Err(FeedError::PoolDisabled(hex::encode(pool)));
        }
        if attestation.price == 0 {
            return Err(FeedError::InvalidAttestation("zero price"));
        }

        let mut attestation = attestation;
        attestation.reliability = self
            .reliability
            .lock()
            .await
            .score(&attestation.operator_id);

        if let Some(snapshot) = &state.snapshot {
            let consensus_price = snapshot.result.consensus_price;
            if consensus_price > 0 {
                let deviation = deviation_bps(attestation.price, consensus_price);
                if deviation > state.config.max_price_deviation_bps {
                    warn!(
                        pool = %hex::encode(pool),
                        operator = %hex::encode(attestation.operator_id),
                        deviation,
                        "attestation far from published consensus"
                    );
                    self.events.emit(
                        EventType::ManipulationDetected,
                        attestation.timestamp,
                        &ManipulationDetected {
                            pool,
                            suspicious_operator: attestation.operator_id,
                            reported_price: attestation.price,
                            consensus_price,
                            deviation_bps: deviation,
                        },
                    );
                }
            }
        }

        match state
            .pending
            .iter_mut()
            .find(|a| a.operator_id == attestation.operator_id)
        {
            Some(existing) => *existing = attestation,
            None => state.pending.push(attestation),
        }
        Ok(())
    }

    /// Close the pool's open round: filter outliers, compute consensus,
    /// publish the snapshot, settle operator reliability, and record the
    /// price in the pool's history.
    ///
    /// The published snapshot carries `now` as its computation time; a
    /// recompute whose `now` is older than the published snapshot is
    /// rejected so a slow round can never overwrite a fresher one.
    ///
    /// # Errors
    ///
    /// [`FeedError::UnknownPool`], [`FeedError::StaleRecompute`], or the
    /// engine's input errors (empty round, threshold below majority).
    pub async fn recompute(&self, pool: PoolId, now: u64) -> Result<ConsensusResult> {
        let entry = self.pool(&pool).await?;
        let mut state = entry.lock().await;

        if let Some(snapshot) = &state.snapshot {
            if snapshot.computed_at > now {
                return Err(FeedError::StaleRecompute {
                    published: snapshot.computed_at,
                    now,
                });
            }
        }

        let filtered = filter_outliers(&state.pending, self.filter_max_deviation_bps);
        let result = compute_consensus(&filtered, state.config.consensus_threshold_bps)?;

        if result.consensus_price > 0 {
            let mut ledger = self.reliability.lock().await;
            // Every submitter settles, including filtered-out outliers.
            for att in &state.pending {
                ledger.settle(
                    &att.operator_id,
                    deviation_bps(att.price, result.consensus_price),
                );
            }
            state.history.record(now, result.consensus_price);
        }

        state.snapshot = Some(ConsensusSnapshot {
            result: result.clone(),
            computed_at: now,
        });
        state.pending.clear();

        if result.has_consensus {
            info!(
                pool = %hex::encode(pool),
                confidence = result.confidence_level,
                attestations = filtered.len(),
                "consensus published"
            );
            self.events.emit(
                EventType::ConsensusReached,
                now,
                &ConsensusReached {
                    pool,
                    price: result.consensus_price,
                    total_stake: result.total_stake,
                    attestation_count: filtered.len() as u64,
                    confidence: result.confidence_level,
                },
            );
        }

        Ok(result)
    }

    /// Gate a proposed action price against the pool's published snapshot.
    ///
    /// A disabled pool passes through unvalidated. A pool with no snapshot
    /// yet denies with low confidence. Denials raise `SwapBlocked`.
    ///
    /// # Errors
    ///
    /// [`FeedError::UnknownPool`]. Denials are verdict values, not errors.
    pub async fn check_swap(
        &self,
        pool: PoolId,
        actor: ActorId,
        requested_price: u128,
        now: u64,
    ) -> Result<ValidationResult> {
        let entry = self.pool(&pool).await?;
        let state = entry.lock().await;

        if !state.config.enabled {
            return Ok(ValidationResult::valid(0));
        }

        let (verdict, consensus_price) = match &state.snapshot {
            None => (
                ValidationResult::invalid(ValidationReason::LowConfidence, 0),
                0,
            ),
            Some(snapshot) => (
                validate_price(requested_price, snapshot, now, &state.config),
                snapshot.result.consensus_price,
            ),
        };

        if !verdict.is_valid {
            warn!(
                pool = %hex::encode(pool),
                actor = %hex::encode(actor),
                reason = verdict.reason.as_str(),
                deviation = verdict.deviation_bps,
                "swap blocked"
            );
            self.events.emit(
                EventType::SwapBlocked,
                now,
                &SwapBlocked {
                    pool,
                    actor,
                    requested_price,
                    consensus_price,
                    reason: verdict.reason.as_str().to_string(),
                },
            );
        }

        Ok(verdict)
    }

    /// Run the manipulation detector over the pool's price history.
    ///
    /// # Errors
    ///
    /// [`FeedError::UnknownPool`], or the detector's input errors when the
    /// history holds fewer than three points.
    pub async fn scan_history(&self, pool: PoolId) -> Result<ManipulationReport> {
        let entry = self.pool(&pool).await?;
        let (prices, timestamps) = {
            let state = entry.lock().await;
            (state.history.prices(), state.history.timestamps())
        };
        Ok(detect_manipulation(&prices, &timestamps)?)
    }

    /// The pool's published snapshot, if any.
    pub async fn snapshot(&self, pool: PoolId) -> Result<Option<ConsensusSnapshot>> {
        let entry = self.pool(&pool).await?;
        let state = entry.lock().await;
        Ok(state.snapshot.clone())
    }

    /// The pool's current oracle config.
    pub async fn config(&self, pool: PoolId) -> Result<OracleConfig> {
        let entry = self.pool(&pool).await?;
        let state = entry.lock().await;
        Ok(state.config.clone())
    }

    /// The operator's current reliability score.
    pub async fn reliability_of(&self, operator: &OperatorId) -> u64 {
        self.reliability.lock().await.score(operator)
    }

    /// Subscribe to feed events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    async fn pool(&self, pool: &PoolId) -> Result<Arc<Mutex<PoolState>>> {
        self.pools
            .read()
            .await
            .get(pool)
            .cloned()
            .ok_or_else(|| FeedError::UnknownPool(hex::encode(pool)))
    }
}
