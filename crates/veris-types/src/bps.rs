//! Basis-point deviation arithmetic.
//!
//! Every deviation in the workspace uses the same formula:
//!
//! ```text
//! deviation_bps = |price - reference| * 10000 / reference
//! ```
//!
//! Integer arithmetic only; independent evaluators must converge on
//! bit-identical results given identical inputs.

use crate::BPS_SCALE;

/// Compute the absolute deviation of `price` from `reference` in basis points.
///
/// A zero `reference` has no defined deviation; it is reported as
/// `u64::MAX` ("infinitely far") so that downstream threshold comparisons
/// fail closed. Results that exceed `u64` are saturated.
///
/// # Examples
///
/// ```
/// use veris_types::bps::deviation_bps;
///
/// assert_eq!(deviation_bps(2100, 2000), 500); // 5% above
/// assert_eq!(deviation_bps(1900, 2000), 500); // 5% below
/// assert_eq!(deviation_bps(2000, 2000), 0);
/// ```
pub fn deviation_bps(price: u128, reference: u128) -> u64 {
    if reference == 0 {
        return u64::MAX;
    }
    let diff = price.abs_diff(reference);
    let scaled = diff
        .checked_mul(BPS_SCALE as u128)
        .map(|v| v / reference)
        .unwrap_or(u128::MAX);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
