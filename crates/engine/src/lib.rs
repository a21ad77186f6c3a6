//! Walletcheck decision engine.
//!
//! This crate implements the two pure stages of an assessment:
//!
//! - [`aggregate`]: reduce a transaction history into [`AggregateMetrics`]
//!   (volumes, counterparties, hourly histogram, success counts), or signal
//!   an empty history.
//! - [`assess`]: apply the weighted multi-factor heuristic to the metrics
//!   and produce a clamped, explainable [`TrustAssessment`].
//!
//! Both stages are deterministic functions of their inputs: no clocks, no
//! I/O, no shared state. The assessment-time "now" is captured once by the
//! caller and passed in.
//!
//! [`AggregateMetrics`]: walletcheck_core::AggregateMetrics
//! [`TrustAssessment`]: walletcheck_core::TrustAssessment

#![warn(missing_docs)]

pub mod aggregate;
pub mod scoring;

pub use aggregate::aggregate;
pub use scoring::assess;
