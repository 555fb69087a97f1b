//! faultgate Telemetry - Opt-in, sampled error reporting
//!
//! Provides:
//! - `TelemetryGateway`: inert-until-initialized front door for messages,
//!   breadcrumbs, exceptions and the run context
//! - `DedupCache`: at-most-once reporting per audit/gatherer failure
//! - `SampledErrorTable`: per-pattern sampling of noisy errors
//! - `SentryBackend`: the Sentry adapter behind the reporting ports
//! - `ThreadRandom`: the production random source

pub mod dedup;
pub mod error;
pub mod gateway;
pub mod sampling;
pub mod sentry_backend;

pub use dedup::DedupCache;
pub use error::TelemetryError;
pub use gateway::{TelemetryGateway, LOG_COMPONENT, SENTRY_DSN};
pub use sampling::{SampledErrorPattern, SampledErrorTable, ThreadRandom, SAMPLE_RATE};
pub use sentry_backend::{SentryBackend, SentryClient};
