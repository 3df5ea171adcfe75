//! Integration test: full oracle lifecycle.
//!
//! Exercises the complete attestation -> consensus -> gate pipeline:
//! 1. Register a pool and run rounds from a mixed operator set
//! 2. Reliability settles up for accurate reporters and down for the liar
//! 3. The liar's falling reliability shrinks its weight in later rounds
//! 4. Concurrent submissions from many tasks land in one serialized round
//! 5. A stale recomputation can never overwrite a fresher snapshot

use std::sync::Arc;

use veris_feed::config::FeedConfig;
use veris_feed::store::OracleFeed;
use veris_feed::FeedError;
use veris_types::oracle::{Attestation, OracleConfig};
use veris_types::{OperatorId, PoolId, PRICE_SCALE};

const BASE_TIME: u64 = 1_700_000_000;
const POOL: PoolId = [7u8; 32];

const HONEST_A: OperatorId = [1u8; 32];
const HONEST_B: OperatorId = [2u8; 32];
const LIAR: OperatorId = [3u8; 32];

fn oracle_config() -> OracleConfig {
    OracleConfig {
        enabled: true,
        max_price_deviation_bps: 500,
        min_stake_required: PRICE_SCALE,
        consensus_threshold_bps: 6_600,
        max_staleness_secs: 3_600,
    }
}

fn attestation(operator_id: OperatorId, price: u128, timestamp: u64) -> Attestation {
    Attestation {
        operator_id,
        price,
        stake: 10 * PRICE_SCALE,
        timestamp,
        reliability: 0,
    }
}

#[tokio::test]
async fn reliability_settles_across_rounds() {
    let feed = OracleFeed::new(&FeedConfig::default());
    feed.register_pool(POOL, oracle_config()).await.expect("register");

    // Ten rounds: two honest reporters at the market price, one reporter
    // always double the market (stripped by the outlier filter every round).
    for round in 0..10u64 {
        let now = BASE_TIME + round * 300;
        let market = 2000 * PRICE_SCALE;
        feed.submit_attestation(POOL, attestation(HONEST_A, market, now))
            .await
            .expect("submit");
        feed.submit_attestation(POOL, attestation(HONEST_B, market, now))
            .await
            .expect("submit");
        feed.submit_attestation(POOL, attestation(LIAR, market * 2, now))
            .await
            .expect("submit");

        let result = feed.recompute(POOL, now).await.expect("recompute");
        assert_eq!(result.consensus_price, market, "round {round}");
        assert!(result.has_consensus);
    }

    let honest = feed.reliability_of(&HONEST_A).await;
    let liar = feed.reliability_of(&LIAR).await;
    assert!(honest > 8_000, "honest reliability {honest}");
    assert!(liar < 4_000, "liar reliability {liar}");
}

/// One round with two honest quotes at 2000 and one 8% high (inside the
/// default 10% filter bound, so only reliability weighting acts on it).
async fn skewed_round(feed: &OracleFeed, now: u64) -> veris_types::oracle::ConsensusResult {
    feed.submit_attestation(POOL, attestation(HONEST_A, 2000 * PRICE_SCALE, now))
        .await
        .expect("submit");
    feed.submit_attestation(POOL, attestation(HONEST_B, 2000 * PRICE_SCALE, now))
        .await
        .expect("submit");
    feed.submit_attestation(POOL, attestation(LIAR, 2160 * PRICE_SCALE, now))
        .await
        .expect("submit");
    feed.recompute(POOL, now).await.expect("recompute")
}

#[tokio::test]
async fn falling_reliability_shrinks_weight() {
    let feed = OracleFeed::new(&FeedConfig::default());
    let mut config = oracle_config();
    // A wide deviation budget keeps the skewed quote from raising
    // manipulation events every round.
    config.max_price_deviation_bps = 10_000;
    feed.register_pool(POOL, config).await.expect("register");

    let first = skewed_round(&feed, BASE_TIME).await;
    let mut last = first.clone();
    for round in 1..10u64 {
        last = skewed_round(&feed, BASE_TIME + round * 300).await;
    }

    // As the liar's reliability decays, its pull on the weighted average
    // weakens and the consensus drifts toward the honest quote.
    assert!(last.consensus_price < first.consensus_price);
    assert!(last.consensus_price > 2000 * PRICE_SCALE);
}

#[tokio::test]
async fn concurrent_submissions_land_in_one_round() {
    let feed = Arc::new(OracleFeed::new(&FeedConfig::default()));
    feed.register_pool(POOL, oracle_config()).await.expect("register");

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let feed = Arc::clone(&feed);
        handles.push(tokio::spawn(async move {
            let operator = [i + 10; 32];
            feed.submit_attestation(
                POOL,
                attestation(operator, (2000 + i as u128) * PRICE_SCALE, BASE_TIME),
            )
            .await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("submit");
    }

    let result = feed.recompute(POOL, BASE_TIME).await.expect("recompute");
    assert_eq!(result.total_stake, 80 * PRICE_SCALE);
    assert!(result.has_consensus);
    assert!(result.consensus_price >= 2000 * PRICE_SCALE);
    assert!(result.consensus_price <= 2007 * PRICE_SCALE);
}

#[tokio::test]
async fn stale_publish_guard_holds() {
    let feed = OracleFeed::new(&FeedConfig::default());
    feed.register_pool(POOL, oracle_config()).await.expect("register");

    feed.submit_attestation(POOL, attestation(HONEST_A, 2000 * PRICE_SCALE, BASE_TIME))
        .await
        .expect("submit");
    feed.recompute(POOL, BASE_TIME + 600).await.expect("fresh");

    feed.submit_attestation(POOL, attestation(HONEST_A, 2100 * PRICE_SCALE, BASE_TIME))
        .await
        .expect("submit");
    let err = feed.recompute(POOL, BASE_TIME + 300).await.unwrap_err();
    assert!(matches!(err, FeedError::StaleRecompute { .. }));

    let snapshot = feed.snapshot(POOL).await.expect("pool").expect("published");
    assert_eq!(snapshot.computed_at, BASE_TIME + 600);
    assert_eq!(snapshot.result.consensus_price, 2000 * PRICE_SCALE);
}
