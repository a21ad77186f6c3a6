//! # Walletcheck Core
//!
//! Core types, constants, and errors for the walletcheck background-check
//! service.
//!
//! This crate provides the data model shared by every other component:
//! transaction records as delivered by the history provider, the immutable
//! per-assessment snapshot, the derived aggregate metrics, and the terminal
//! trust assessment (score, tier, supporting signals).
//!
//! ## Features
//!
//! - **Ethereum Types**: Uses Alloy primitives for Address and U256
//! - **Domain Types**: TransactionRecord, WalletSnapshot, AggregateMetrics,
//!   TrustAssessment, TrustTier
//! - **Constants**: Chain label, unit scale, fallback price, score bounds

#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use error::{CoreError, Result};
pub use types::*;

// Re-export Alloy primitives for convenience
pub use alloy_primitives::{Address, U256};
