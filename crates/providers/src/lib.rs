//! Upstream provider clients.
//!
//! Thin async HTTP clients for the three external collaborators an
//! assessment reads from:
//!
//! - [`ScanClient`] — Etherscan-family account API (balance + transaction
//!   history)
//! - [`PriceClient`] — CoinGecko-family price quote
//!
//! Clients return [`ProviderError`] on any failure; the report assembler
//! decides how to degrade. No retries here: a failed call is terminal for
//! the request and substituted upstream.

#![warn(missing_docs)]

pub mod error;
pub mod price;
pub mod scan;

pub use error::ProviderError;
pub use price::PriceClient;
pub use scan::ScanClient;
