//! Supervision caseload tracking for suspended sentences and probation.
//!
//! The [`supervision`] module holds the pure lifecycle and risk computations
//! together with the service and HTTP layers that persist their results.

pub mod config;
pub mod error;
pub mod supervision;
pub mod telemetry;
