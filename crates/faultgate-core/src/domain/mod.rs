//! Domain types
//!
//! This module contains the core domain types for faultgate:
//! - Severity levels and breadcrumbs
//! - Reported errors and their protocol-failure details
//! - Capture options, report scopes and de-duplication keys
//! - The run context snapshot
//! - Domain-specific error types

pub mod breadcrumb;
pub mod capture;
pub mod context;
pub mod errors;
pub mod reported_error;
pub mod severity;

// Re-export commonly used types
pub use breadcrumb::Breadcrumb;
pub use capture::{
    parse_tag, CaptureOptions, DedupKey, ReportScope, ReportSource, AUDIT_TAG,
    DEFAULT_FINGERPRINT, GATHERER_TAG, PROTOCOL_METHOD_TAG,
};
pub use context::{ContextSnapshot, FormFactor, ThrottlingMethod, ThrottlingSettings};
pub use errors::DomainError;
pub use reported_error::{ProtocolFailure, ReportedError};
pub use severity::Severity;
