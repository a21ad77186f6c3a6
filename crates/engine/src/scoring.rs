//! Trust scoring heuristic.
//!
//! Applies independent, additive factor adjustments to a baseline score and
//! maps the clamped result to a risk tier. Every adjustment that fires may
//! emit exactly one explanatory note; notes are appended in fixed factor
//! order so identical metrics always yield byte-identical output.

use walletcheck_core::constants::{BASELINE_SCORE, EMPTY_HISTORY_SCORE, MAX_SCORE, MIN_SCORE};
use walletcheck_core::{AggregateMetrics, TrustAssessment, TrustTier};

/// Flag emitted for the empty-history sentinel.
const NO_HISTORY_FLAG: &str = "No transaction history found";

/// Success-rate factor only fires on histories large enough to be meaningful.
const SUCCESS_RATE_MIN_TX: usize = 10;

/// Success rate below this percentage draws a flag and a penalty.
const SUCCESS_RATE_FLOOR_PCT: f64 = 80.0;

/// Produce a trust assessment from aggregated metrics.
///
/// `metrics` is `None` for an address with no transaction history; that
/// case is terminal: fixed score, tier `UNKNOWN`, a single flag, no
/// positives. Otherwise the general heuristic runs: baseline 50, five
/// independent factor rows (wallet age, transaction count, counterparty
/// diversity, recency, success rate), each evaluated high-to-low with only
/// the first matching tier applying, then a clamp into `0..=100`.
///
/// Deterministic: identical inputs yield identical score, tier, and note
/// ordering.
pub fn assess(metrics: Option<&AggregateMetrics>, tx_count: usize) -> TrustAssessment {
    let Some(metrics) = metrics else {
        return TrustAssessment {
            score: EMPTY_HISTORY_SCORE,
            tier: TrustTier::Unknown,
            positives: Vec::new(),
            flags: vec![NO_HISTORY_FLAG.to_string()],
        };
    };

    let mut score = BASELINE_SCORE;
    let mut positives = Vec::new();
    let mut flags = Vec::new();

    // Wallet age
    let age = metrics.wallet_age_days;
    if age > 365 {
        score += 20;
        positives.push(format!("Established wallet ({} days old)", age));
    } else if age > 180 {
        score += 15;
        positives.push(format!("Mature wallet ({} days old)", age));
    } else if age > 90 {
        score += 10;
        positives.push(format!("Active wallet ({} days old)", age));
    } else if age > 30 {
        score += 5;
    } else {
        score -= 10;
        flags.push(format!("New wallet (only {} days old)", age));
    }

    // Transaction count
    if tx_count > 100 {
        score += 15;
        positives.push(format!("High activity ({} transactions)", tx_count));
    } else if tx_count > 50 {
        score += 10;
        positives.push(format!("Regular activity ({} transactions)", tx_count));
    } else if tx_count > 20 {
        score += 5;
    } else if tx_count < 5 {
        score -= 10;
        flags.push("Very low transaction count".to_string());
    }

    // Counterparty diversity
    let unique = metrics.unique_counterparty_count;
    if unique > 50 {
        score += 10;
        positives.push(format!("Diverse interactions ({} unique addresses)", unique));
    } else if unique > 20 {
        score += 5;
    } else if unique < 5 {
        score -= 5;
        flags.push("Limited address diversity".to_string());
    }

    // Recency
    let idle_days = metrics.days_since_last_tx;
    if idle_days < 7 {
        score += 10;
        positives.push("Recently active".to_string());
    } else if idle_days < 30 {
        score += 5;
    } else if idle_days > 90 {
        score -= 5;
        flags.push(format!("Inactive for {} days", idle_days));
    }

    // Success rate, only meaningful with enough history
    if tx_count > SUCCESS_RATE_MIN_TX {
        let rate = success_rate_pct(metrics, tx_count);
        if rate < SUCCESS_RATE_FLOOR_PCT {
            score -= 5;
            flags.push(format!("High failure rate ({:.1}% success)", rate));
        }
    }

    let score = score.clamp(MIN_SCORE as i32, MAX_SCORE as i32) as u8;
    // Safe: the clamp above keeps the score inside the mapped range.
    let tier = TrustTier::from_score(score).unwrap_or(TrustTier::Avoid);

    TrustAssessment {
        score,
        tier,
        positives,
        flags,
    }
}

/// Successful transactions as a percentage of the full history.
pub fn success_rate_pct(metrics: &AggregateMetrics, tx_count: usize) -> f64 {
    if tx_count == 0 {
        return 0.0;
    }
    (metrics.successful_count as f64 / tx_count as f64) * 100.0
}
