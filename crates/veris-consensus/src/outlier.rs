//! Median-based outlier filtering.
//!
//! A pre-processing step that strips attestations far from the price median
//! before they reach the engine, so a single extreme reporter cannot drag
//! the weighted average. Runs on the raw round; the engine itself never
//! filters.

use veris_types::bps::deviation_bps;
use veris_types::oracle::Attestation;

/// Retain only attestations whose price is within `max_deviation_bps` of
/// the round's median price.
///
/// With two or fewer attestations there is not enough data to call anything
/// an outlier and the input is returned unchanged. Survivors keep their
/// input order.
pub fn filter_outliers(attestations: &[Attestation], max_deviation_bps: u64) -> Vec<Attestation> {
    if attestations.len() <= 2 {
        return attestations.to_vec();
    }

    let median = median_price(attestations);
    if median == 0 {
        // Deviation from a zero median is undefined; pass the round through.
        return attestations.to_vec();
    }

    attestations
        .iter()
        .filter(|att| deviation_bps(att.price, median) <= max_deviation_bps)
        .cloned()
        .collect()
}

/// The median of the attested prices.
///
/// Middle value for an odd count, the average of the two middle values for
/// an even count. Zero for an empty slice.
pub fn median_price(attestations: &[Attestation]) -> u128 {
    let mut prices: Vec<u128> = attestations.iter().map(|a| a.price).collect();
    prices.sort_unstable();

    let n = prices.len();
    if n == 0 {
        return 0;
    }
    if n % 2 == 1 {
        prices[n / 2]
    } else {
        let low = prices[n / 2 - 1];
        let high = prices[n / 2];
        // Overflow-safe midpoint.
        (low / 2) + (high / 2) + (low % 2 + high % 2) / 2
    }
}
