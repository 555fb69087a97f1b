//! Domain error types
//!
//! This module defines error types for parsing and validating telemetry
//! domain values: severities, form factors, throttling methods, sampling
//! rates and error-message patterns.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown severity level name
    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    /// Unknown form factor name
    #[error("Invalid form factor: {0}")]
    InvalidFormFactor(String),

    /// Unknown throttling method name
    #[error("Invalid throttling method: {0}")]
    InvalidThrottlingMethod(String),

    /// Sampling rate outside of `[0, 1]`
    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(String),

    /// Error-message pattern that does not compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler diagnostic
        reason: String,
    },

    /// Malformed `key=value` tag
    #[error("Invalid tag: {0}")]
    InvalidTag(String),
}
