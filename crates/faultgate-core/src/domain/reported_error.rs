//! Error values handed to the gateway for exception capture

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The protocol method and error code of a failed protocol round-trip
///
/// Errors carrying this are grouped by method (and error, when known)
/// instead of by stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFailure {
    /// Protocol method that failed, e.g. `Page.navigate`
    pub method: String,
    /// Error reported by the protocol peer, if any
    #[serde(default)]
    pub error: Option<String>,
}

/// An application error submitted for reporting
///
/// `expected` marks failures the caller anticipates (bad user input, a page
/// that refuses to load). Those are never forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ReportedError {
    /// Type name shown by the backend, e.g. `NavigationError`
    pub kind: String,
    /// Human-readable message; also the de-duplication and pattern-matching subject
    pub message: String,
    /// Caller-set marker for anticipated failures
    pub expected: bool,
    /// Present when the error came from the protocol layer
    pub protocol: Option<ProtocolFailure>,
}

impl ReportedError {
    /// Creates an unexpected error of kind `Error`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: "Error".to_string(),
            message: message.into(),
            expected: false,
            protocol: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Marks the error as expected
    pub fn expected(mut self) -> Self {
        self.expected = true;
        self
    }

    pub fn with_protocol(mut self, method: impl Into<String>, error: impl Into<String>) -> Self {
        self.protocol = Some(ProtocolFailure {
            method: method.into(),
            error: Some(error.into()),
        });
        self
    }

    /// A protocol failure where the peer returned no error code
    pub fn with_protocol_method(mut self, method: impl Into<String>) -> Self {
        self.protocol = Some(ProtocolFailure {
            method: method.into(),
            error: None,
        });
        self
    }
}
