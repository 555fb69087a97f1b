//! Error types for the telemetry gateway
//!
//! None of these escape the gateway's public operations; they are logged
//! and the gateway degrades to inert.

use thiserror::Error;

/// Errors that can occur while bringing up error reporting
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The hardcoded endpoint identifier did not parse
    #[error("invalid DSN: {0}")]
    InvalidDsn(String),

    /// The backend client could not be constructed
    #[error("client construction failed: {0}")]
    ClientConstruction(String),

    /// A sampled-error pattern does not compile
    #[error("invalid sampled-error pattern: {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A sampled-error rate is outside `[0, 1]`
    #[error("invalid sampled-error rate for {pattern}: {rate}")]
    InvalidRate { pattern: String, rate: f64 },
}
