//! Walletcheck API service.
//!
//! Hosts the report assembler (concurrent upstream fetch, aggregation,
//! scoring, rendering) behind a boundary-thin axum router, plus the TOML
//! configuration it runs from.

pub mod config;
pub mod report;
pub mod server;
