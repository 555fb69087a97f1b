//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. The gateway depends on these; the implementations
//! live in the telemetry crate or in tests.
//!
//! ## Ports Overview
//!
//! - [`IReportingBackend`] - Constructs a live client for the error-reporting service
//! - [`IReportingClient`] - Forwards messages, breadcrumbs and exceptions to that service
//! - [`IRandomSource`] - Uniform draws for the sampling decisions

pub mod random;
pub mod reporting;

pub use random::IRandomSource;
pub use reporting::{IReportingBackend, IReportingClient};
