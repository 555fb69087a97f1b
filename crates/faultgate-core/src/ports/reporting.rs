//! Error-reporting backend port (driven/secondary port)
//!
//! This module defines the narrow interface through which the gateway talks
//! to an external error-reporting service. The primary implementation is the
//! Sentry adapter in `faultgate-telemetry`.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` for client construction because failures are
//!   adapter-specific; the gateway only needs to know that it failed.
//! - Capture calls return nothing. Delivery is the backend's concern and
//!   must never reach the host process.
//! - `capture_exception` is async so an adapter may hand the event to its
//!   transport without blocking; it resolves once the event is queued.

use std::sync::Arc;
use std::time::Duration;

use crate::config::BackendOptions;
use crate::domain::{Breadcrumb, ContextSnapshot, ReportScope, ReportedError, Severity};

/// Port trait for constructing a live reporting client
///
/// ## Implementation Notes
///
/// - `dsn` is the endpoint identifier baked into the gateway; `options` are
///   the user-supplied settings forwarded verbatim.
/// - Construction may be slow (loading the SDK, spawning a transport) and is
///   therefore async.
#[async_trait::async_trait]
pub trait IReportingBackend: Send + Sync {
    /// Builds a client, or fails if the backend cannot be brought up
    async fn connect(
        &self,
        options: &BackendOptions,
        dsn: &str,
    ) -> anyhow::Result<Arc<dyn IReportingClient>>;
}

/// Port trait for a live reporting client
#[async_trait::async_trait]
pub trait IReportingClient: Send + Sync {
    /// Sends a plain message event
    fn capture_message(&self, message: &str, level: Severity);

    /// Records a breadcrumb for attachment to later events
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb);

    /// Publishes the run context as top-level extras on all later events
    fn set_context(&self, context: &ContextSnapshot);

    /// Sends an exception event with `scope` applied to that event only
    async fn capture_exception(&self, error: &ReportedError, scope: &ReportScope);

    /// Waits up to `timeout` for queued events to be delivered
    ///
    /// Returns `true` when the queue drained in time.
    fn flush(&self, timeout: Duration) -> bool;
}
