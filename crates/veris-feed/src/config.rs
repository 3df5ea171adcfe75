//! Feed configuration.
//!
//! Loaded from a TOML file; every field has a default so a missing or
//! partial file is usable. Per-pool `OracleConfig`s are governance data,
//! not file configuration — the file only supplies the template applied to
//! newly registered pools.

use std::path::Path;

use serde::{Deserialize, Serialize};

use veris_types::oracle::OracleConfig;
use veris_types::PRICE_SCALE;

use crate::Result;

/// Complete feed configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Template for newly registered pools.
    #[serde(default)]
    pub oracle: OracleDefaults,
    /// Pre-consensus outlier filtering.
    #[serde(default)]
    pub filter: FilterConfig,
    /// Price history retention.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Event bus sizing.
    #[serde(default)]
    pub events: EventsConfig,
}

/// Default per-pool oracle parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleDefaults {
    /// Gate actions for new pools from the start.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum action-price deviation from consensus (5%).
    #[serde(default = "default_max_deviation")]
    pub max_price_deviation_bps: u64,
    /// Minimum participating stake, 18-decimal fixed point.
    #[serde(default = "default_min_stake")]
    pub min_stake_required: u128,
    /// Consensus confidence threshold (66%).
    #[serde(default = "default_threshold")]
    pub consensus_threshold_bps: u64,
    /// Snapshot staleness bound in seconds (1 hour).
    #[serde(default = "default_staleness")]
    pub max_staleness_secs: u64,
}

/// Outlier filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Maximum deviation from the round median before an attestation is
    /// dropped (10%).
    #[serde(default = "default_filter_deviation")]
    pub max_deviation_bps: u64,
}

/// Price history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Points retained per pool.
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

/// Event bus settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Broadcast buffer capacity per subscriber.
    #[serde(default = "default_event_buffer")]
    pub buffer: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_deviation() -> u64 {
    500
}

fn default_min_stake() -> u128 {
    PRICE_SCALE
}

fn default_threshold() -> u64 {
    6_600
}

fn default_staleness() -> u64 {
    3_600
}

fn default_filter_deviation() -> u64 {
    1_000
}

fn default_history_capacity() -> usize {
    256
}

fn default_event_buffer() -> usize {
    1_024
}

impl Default for OracleDefaults {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_price_deviation_bps: default_max_deviation(),
            min_stake_required: default_min_stake(),
            consensus_threshold_bps: default_threshold(),
            max_staleness_secs: default_staleness(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_deviation_bps: default_filter_deviation(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            buffer: default_event_buffer(),
        }
    }
}

impl FeedConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// [`FeedError::Io`](crate::FeedError::Io) if the file cannot be read,
    /// [`FeedError::ConfigParse`](crate::FeedError::ConfigParse) if it is
    /// not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// The `OracleConfig` applied to a newly registered pool.
    pub fn default_oracle_config(&self) -> OracleConfig {
        OracleConfig {
            enabled: self.oracle.enabled,
            max_price_deviation_bps: self.oracle.max_price_deviation_bps,
            min_stake_required: self.oracle.min_stake_required,
            consensus_threshold_bps: self.oracle.consensus_threshold_bps,
            max_staleness_secs: self.oracle.max_staleness_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert!(config.oracle.enabled);
        assert_eq!(config.oracle.consensus_threshold_bps, 6_600);
        assert_eq!(config.filter.max_deviation_bps, 1_000);
        assert_eq!(config.history.capacity, 256);
        assert_eq!(config.events.buffer, 1_024);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FeedConfig = toml::from_str(
            r#"
            [oracle]
            consensus_threshold_bps = 7500

            [filter]
            max_deviation_bps = 800
            "#,
        )
        .expect("parse");
        assert_eq!(config.oracle.consensus_threshold_bps, 7_500);
        assert_eq!(config.oracle.max_staleness_secs, 3_600);
        assert_eq!(config.filter.max_deviation_bps, 800);
        assert_eq!(config.history.capacity, 256);
    }

    #[test]
    fn test_empty_toml_is_usable() {
        let config: FeedConfig = toml::from_str("").expect("parse");
        assert_eq!(
            config.default_oracle_config().max_price_deviation_bps,
            500
        );
    }

    #[test]
    fn test_default_oracle_config_round_trips_template() {
        let config = FeedConfig::default();
        let oracle = config.default_oracle_config();
        assert_eq!(oracle.min_stake_required, PRICE_SCALE);
        assert!(oracle.consensus_threshold_bps >= veris_types::MIN_CONSENSUS_THRESHOLD_BPS);
    }
}
