//! Process-wide read-only constants.
//!
//! Scoring factor tables live next to the scoring engine; this module holds
//! the constants shared across crate boundaries (unit scale, score bounds,
//! chain identity defaults, fallback price).

use alloy_primitives::U256;

/// Number of wei in one ether (10^18).
pub const WEI_PER_ETH: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Lower bound of the trust score range.
pub const MIN_SCORE: u8 = 0;

/// Upper bound of the trust score range.
pub const MAX_SCORE: u8 = 100;

/// Baseline score every non-empty assessment starts from.
pub const BASELINE_SCORE: i32 = 50;

/// Fixed score assigned when an address has no transaction history.
pub const EMPTY_HISTORY_SCORE: u8 = 10;

/// Chain label reported by default (Base mainnet).
pub const DEFAULT_CHAIN_NAME: &str = "Base";

/// Chain ID reported by default (Base mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 8453;

/// Price substituted when the price provider is unreachable or malformed.
pub const DEFAULT_FALLBACK_ETH_PRICE_USD: f64 = 2500.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wei_per_eth_scale() {
        assert_eq!(WEI_PER_ETH.to_string(), "1000000000000000000");
    }

    #[test]
    fn test_score_bounds() {
        assert!(MIN_SCORE < EMPTY_HISTORY_SCORE);
        assert!(u8::try_from(BASELINE_SCORE).unwrap() < MAX_SCORE);
    }
}
