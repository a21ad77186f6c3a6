//! Report assembly.
//!
//! Orchestrates the concurrent upstream fetches, feeds the snapshot through
//! the aggregation and scoring engine, and renders the final structured
//! report. Upstream failures degrade to documented substitutes (zero
//! balance, empty history, fallback price) and never abort an assessment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walletcheck_core::{Address, TrustTier, WalletSnapshot, U256};
use walletcheck_engine::scoring::success_rate_pct;
use walletcheck_engine::{aggregate, assess};
use walletcheck_providers::{PriceClient, ScanClient};

use crate::config::Config;

/// A wei quantity rendered in both ether and USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyAmount {
    /// Ether amount, 6 decimal places.
    pub eth: String,
    /// USD amount, 2 decimal places.
    pub usd: String,
}

/// The most recent transaction, rendered for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastTransactionReport {
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// RFC 3339 rendering of the timestamp.
    pub date: String,
    /// Transaction hash.
    pub hash: String,
    /// Whole days since the transaction.
    pub days_since: u64,
    /// Transferred value in ether, 6 decimal places.
    pub value_eth: String,
    /// Transferred value in USD, 2 decimal places.
    pub value_usd: String,
}

/// The earliest transaction, rendered for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstTransactionReport {
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// RFC 3339 rendering of the timestamp.
    pub date: String,
}

/// Wallet age in days plus its compact human rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAgeReport {
    /// Whole days since the earliest transaction.
    pub days: u64,
    /// Compact rendering: "2y 3m", "4m 12d", or "9d".
    pub formatted: String,
}

/// The full background-check report returned to the caller.
///
/// Fields with no meaning for an empty history (wallet age, first/last
/// transaction, success rate, peak hour, counterparty count) are omitted
/// from the JSON rather than zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletReport {
    /// Queried address, lowercase hex.
    pub address: String,
    /// RFC 3339 timestamp of report generation.
    pub generated_at: String,
    /// Chain label the history was read from.
    pub chain: String,
    /// ETH/USD price the report was rendered with, 2 decimal places.
    pub eth_price_usd: String,
    /// Clamped trust score in `0..=100`.
    pub trust_score: u8,
    /// Risk tier derived from the score.
    pub trust_level: TrustTier,
    /// Account balance.
    pub balance: MoneyAmount,
    /// Most recent transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transaction: Option<LastTransactionReport>,
    /// Earliest transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_transaction: Option<FirstTransactionReport>,
    /// Number of transactions in the (capped) history.
    pub transaction_count: usize,
    /// Successful transactions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successful_transactions: Option<u32>,
    /// Failed transactions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_transactions: Option<u32>,
    /// Success rate as a percentage, 1 decimal place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<String>,
    /// Wallet age.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_age: Option<WalletAgeReport>,
    /// Total received.
    pub volume_in: MoneyAmount,
    /// Total sent.
    pub volume_out: MoneyAmount,
    /// Distinct counterparties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_addresses: Option<u32>,
    /// Average transactions per active month.
    pub activity_score: u64,
    /// Busiest UTC hour, rendered "HH:00 UTC".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_activity_hour: Option<String>,
    /// Positive signals from the scoring engine.
    pub positives: Vec<String>,
    /// Risk flags from the scoring engine.
    pub flags: Vec<String>,
}

/// Fetch the three upstream inputs concurrently and assemble a report.
///
/// Each upstream failure is absorbed into its documented substitute and
/// logged at `warn`; this function never fails for upstream reasons.
pub async fn generate_report(
    scan: &ScanClient,
    price: &PriceClient,
    config: &Config,
    address: Address,
) -> WalletReport {
    let (balance_res, txs_res, price_res) = tokio::join!(
        scan.fetch_balance(address),
        scan.fetch_transactions(address),
        price.fetch_eth_usd(),
    );

    let balance_wei = balance_res.unwrap_or_else(|e| {
        warn!("balance provider degraded to zero: {}", e);
        U256::ZERO
    });
    let transactions = txs_res.unwrap_or_else(|e| {
        warn!("history provider degraded to empty list: {}", e);
        Vec::new()
    });
    let eth_price_usd = price_res.unwrap_or_else(|e| {
        warn!(
            "price provider degraded to fallback {}: {}",
            config.providers.fallback_eth_price_usd, e
        );
        config.providers.fallback_eth_price_usd
    });

    debug!(
        "snapshot for 0x{:x}: {} transactions, balance {} wei",
        address,
        transactions.len(),
        balance_wei
    );

    let snapshot = WalletSnapshot {
        address,
        balance_wei,
        transactions,
        eth_price_usd,
    };

    // One consistent clock reading per assessment.
    let now = Utc::now().timestamp().max(0) as u64;
    assemble(&snapshot, now, &config.network.chain_name)
}

/// Assemble a report from an immutable snapshot. Pure apart from the
/// caller-provided clock reading.
pub fn assemble(snapshot: &WalletSnapshot, now: u64, chain: &str) -> WalletReport {
    let tx_count = snapshot.transactions.len();
    let metrics = aggregate(snapshot.address, &snapshot.transactions, now);
    let assessment = assess(metrics.as_ref(), tx_count);
    let price = snapshot.eth_price_usd;

    let (
        last_transaction,
        first_transaction,
        successful,
        failed,
        success_rate,
        wallet_age,
        volume_in,
        volume_out,
        unique_addresses,
        activity,
        peak_activity_hour,
    ) = match &metrics {
        Some(m) => (
            Some(LastTransactionReport {
                timestamp: m.last_tx_timestamp,
                date: rfc3339(m.last_tx_timestamp),
                hash: m.last_tx_hash.clone(),
                days_since: m.days_since_last_tx,
                value_eth: format_eth(m.last_tx_value_wei),
                value_usd: format_usd(m.last_tx_value_wei, price),
            }),
            Some(FirstTransactionReport {
                timestamp: m.first_tx_timestamp,
                date: rfc3339(m.first_tx_timestamp),
            }),
            Some(m.successful_count),
            Some(m.failed_count),
            Some(format!("{:.1}", success_rate_pct(m, tx_count))),
            Some(WalletAgeReport {
                days: m.wallet_age_days,
                formatted: format_age(m.wallet_age_days),
            }),
            money(m.volume_in_wei, price),
            money(m.volume_out_wei, price),
            Some(m.unique_counterparty_count),
            activity_score(tx_count, m.wallet_age_days),
            Some(format!("{:02}:00 UTC", m.peak_hour)),
        ),
        None => (
            None,
            None,
            None,
            None,
            None,
            None,
            money(U256::ZERO, price),
            money(U256::ZERO, price),
            None,
            0,
            None,
        ),
    };

    WalletReport {
        address: format!("0x{}", hex::encode(snapshot.address)),
        generated_at: rfc3339(now),
        chain: chain.to_string(),
        eth_price_usd: format!("{:.2}", price),
        trust_score: assessment.score,
        trust_level: assessment.tier,
        balance: money(snapshot.balance_wei, price),
        last_transaction,
        first_transaction,
        transaction_count: tx_count,
        successful_transactions: successful,
        failed_transactions: failed,
        success_rate,
        wallet_age,
        volume_in,
        volume_out,
        unique_addresses,
        activity_score: activity,
        peak_activity_hour,
        positives: assessment.positives,
        flags: assessment.flags,
    }
}

/// Convert a wei quantity to ether.
///
/// Aggregation keeps exact integer sums; precision loss is confined to
/// this final render step.
fn wei_to_eth(wei: U256) -> f64 {
    wei.to_string().parse::<f64>().unwrap_or_default() / 1e18
}

fn format_eth(wei: U256) -> String {
    format!("{:.6}", wei_to_eth(wei))
}

fn format_usd(wei: U256, price: f64) -> String {
    format!("{:.2}", wei_to_eth(wei) * price)
}

fn money(wei: U256, price: f64) -> MoneyAmount {
    MoneyAmount {
        eth: format_eth(wei),
        usd: format_usd(wei, price),
    }
}

/// Render a day count compactly: years+months past a year, months+days
/// past a month, plain days below that.
fn format_age(days: u64) -> String {
    if days >= 365 {
        let years = days / 365;
        let remaining = days % 365;
        format!("{}y {}m", years, remaining / 30)
    } else if days >= 30 {
        format!("{}m {}d", days / 30, days % 30)
    } else {
        format!("{}d", days)
    }
}

/// Average transactions per active month, with a one-month floor so very
/// young wallets do not blow the division up.
fn activity_score(tx_count: usize, wallet_age_days: u64) -> u64 {
    let months = (wallet_age_days as f64 / 30.0).max(1.0);
    (tx_count as f64 / months).round() as u64
}

fn rfc3339(timestamp: u64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string())
}
