//! Transaction aggregation.
//!
//! Reduces an arbitrary-order transaction history into the summary
//! statistics the scoring engine and report assembler consume. Pure
//! function of its inputs.

use std::collections::HashSet;

use walletcheck_core::constants::SECONDS_PER_DAY;
use walletcheck_core::{Address, AggregateMetrics, TransactionRecord, U256};

/// Aggregate a transaction history for `address`.
///
/// Returns `None` for an empty history (the scoring engine treats that as a
/// terminal sentinel rather than attempting age/volume math on absent
/// data). `now` is the assessment timestamp in Unix seconds, captured once
/// per assessment by the caller so every derived duration is consistent.
///
/// Ordering of `transactions` is irrelevant: first/last are determined by
/// timestamp comparison, never by list position.
pub fn aggregate(
    address: Address,
    transactions: &[TransactionRecord],
    now: u64,
) -> Option<AggregateMetrics> {
    if transactions.is_empty() {
        return None;
    }

    // Scan for the timestamp extremes. The earliest record defines wallet
    // age, the latest defines recency.
    let mut first = &transactions[0];
    let mut last = &transactions[0];
    for tx in transactions {
        if tx.timestamp < first.timestamp {
            first = tx;
        }
        if tx.timestamp > last.timestamp {
            last = tx;
        }
    }

    let wallet_age_days = now.saturating_sub(first.timestamp) / SECONDS_PER_DAY;
    let days_since_last_tx = now.saturating_sub(last.timestamp) / SECONDS_PER_DAY;

    let mut volume_in_wei = U256::ZERO;
    let mut volume_out_wei = U256::ZERO;
    let mut successful_count = 0u32;
    let mut failed_count = 0u32;
    let mut counterparties: HashSet<Address> = HashSet::new();
    let mut hourly_activity = [0u32; 24];

    for tx in transactions {
        if tx.is_error {
            failed_count += 1;
        } else {
            successful_count += 1;
        }

        hourly_activity[utc_hour(tx.timestamp) as usize] += 1;

        // Volume and counterparty attribution require both sides of the
        // transfer. Records with a missing side (contract creation) count
        // toward success/failure and the histogram only.
        let (Some(from), Some(to)) = (tx.from, tx.to) else {
            continue;
        };

        // A self-transfer contributes to both sides but never to the
        // counterparty set.
        if to == address {
            volume_in_wei = volume_in_wei.saturating_add(tx.value);
            if from != address {
                counterparties.insert(from);
            }
        }
        if from == address {
            volume_out_wei = volume_out_wei.saturating_add(tx.value);
            if to != address {
                counterparties.insert(to);
            }
        }
    }

    Some(AggregateMetrics {
        wallet_age_days,
        days_since_last_tx,
        volume_in_wei,
        volume_out_wei,
        successful_count,
        failed_count,
        unique_counterparty_count: counterparties.len() as u32,
        peak_hour: peak_hour(&hourly_activity),
        hourly_activity,
        first_tx_timestamp: first.timestamp,
        last_tx_timestamp: last.timestamp,
        last_tx_hash: last.hash.clone(),
        last_tx_value_wei: last.value,
    })
}

/// UTC hour of day for a Unix timestamp.
fn utc_hour(timestamp: u64) -> u8 {
    ((timestamp / 3600) % 24) as u8
}

/// Index of the maximum bucket; ties resolve to the lowest index.
fn peak_hour(hourly: &[u32; 24]) -> u8 {
    let mut peak = 0usize;
    for (hour, &count) in hourly.iter().enumerate() {
        if count > hourly[peak] {
            peak = hour;
        }
    }
    peak as u8
}
