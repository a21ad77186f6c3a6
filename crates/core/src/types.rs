//! Core types for the walletcheck service.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MAX_SCORE;
use crate::error::CoreError;

/// A single on-chain transaction as delivered by the history provider.
///
/// The feed conventionally orders records newest-first, but nothing in this
/// crate relies on that: consumers determine first/last by timestamp
/// comparison. `from`/`to` are `None` for records without a counterparty on
/// that side (e.g. contract creation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unix timestamp of the block containing the transaction, in seconds.
    pub timestamp: u64,
    /// Sender address, if present.
    pub from: Option<Address>,
    /// Receiver address, if present.
    pub to: Option<Address>,
    /// Transferred value in wei.
    pub value: U256,
    /// Whether the transaction failed on-chain.
    pub is_error: bool,
    /// Transaction hash as a 0x-prefixed hex string.
    pub hash: String,
}

/// Immutable snapshot of everything one assessment is computed from.
///
/// Assembled once per request from the three upstream providers and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletSnapshot {
    /// The queried address.
    pub address: Address,
    /// Account balance in wei.
    pub balance_wei: U256,
    /// Transaction history, up to the provider-side cap.
    pub transactions: Vec<TransactionRecord>,
    /// ETH/USD price used for rendering.
    pub eth_price_usd: f64,
}

/// Summary statistics derived from a non-empty transaction history.
///
/// Owned by the aggregator, consumed once by the scoring engine and the
/// report assembler. An empty history is represented by the absence of this
/// value, not by a zeroed instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Days elapsed since the earliest observed transaction.
    pub wallet_age_days: u64,
    /// Days elapsed since the most recent observed transaction.
    pub days_since_last_tx: u64,
    /// Total wei received by the queried address.
    pub volume_in_wei: U256,
    /// Total wei sent by the queried address.
    pub volume_out_wei: U256,
    /// Number of transactions without an error flag.
    pub successful_count: u32,
    /// Number of transactions with an error flag.
    pub failed_count: u32,
    /// Number of distinct counterparties, excluding the queried address.
    pub unique_counterparty_count: u32,
    /// Transaction counts bucketed by UTC hour of day.
    pub hourly_activity: [u32; 24],
    /// Index of the busiest hour; ties broken by lowest index.
    pub peak_hour: u8,
    /// Timestamp of the earliest transaction.
    pub first_tx_timestamp: u64,
    /// Timestamp of the most recent transaction.
    pub last_tx_timestamp: u64,
    /// Hash of the most recent transaction.
    pub last_tx_hash: String,
    /// Value of the most recent transaction, in wei.
    pub last_tx_value_wei: U256,
}

/// Categorical risk tier derived from the clamped trust score.
///
/// `Unknown` is reserved for the empty-history sentinel and is never
/// produced by [`TrustTier::from_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustTier {
    /// Score 80..=100.
    High,
    /// Score 60..=79.
    Moderate,
    /// Score 40..=59.
    Caution,
    /// Score 20..=39.
    HighRisk,
    /// Score 0..=19.
    Avoid,
    /// No transaction history to assess.
    Unknown,
}

impl TrustTier {
    /// Map a clamped score to its tier.
    ///
    /// Total over `0..=100`: every score maps to exactly one of the five
    /// scored tiers, evaluated high to low.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidScore` if the score exceeds 100.
    pub fn from_score(score: u8) -> crate::error::Result<Self> {
        if score > MAX_SCORE {
            return Err(CoreError::InvalidScore(score as u32));
        }
        Ok(match score {
            80..=100 => TrustTier::High,
            60..=79 => TrustTier::Moderate,
            40..=59 => TrustTier::Caution,
            20..=39 => TrustTier::HighRisk,
            _ => TrustTier::Avoid,
        })
    }

    /// Canonical uppercase string form (matches the report wire format).
    pub const fn as_str(&self) -> &'static str {
        match self {
            TrustTier::High => "HIGH",
            TrustTier::Moderate => "MODERATE",
            TrustTier::Caution => "CAUTION",
            TrustTier::HighRisk => "HIGH_RISK",
            TrustTier::Avoid => "AVOID",
            TrustTier::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal output of the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustAssessment {
    /// Clamped trust score in `0..=100`.
    pub score: u8,
    /// Risk tier derived from the score (or `Unknown` for empty history).
    pub tier: TrustTier,
    /// Human-readable positive signals, in fixed factor order.
    pub positives: Vec<String>,
    /// Human-readable risk flags, in fixed factor order.
    pub flags: Vec<String>,
}
