//! The telemetry gateway
//!
//! A gateway starts out inert. [`TelemetryGateway::initialize`] selects its
//! mode exactly once: it goes live only when the user opted in, the process
//! wins the [`SAMPLE_RATE`] draw, and the backend client could be built.
//! Every other outcome leaves it inert for the rest of the process. Callers
//! never see an error from any operation.

use std::sync::Arc;
use std::time::Duration;

use faultgate_core::config::ReportingInit;
use faultgate_core::domain::{
    Breadcrumb, CaptureOptions, ContextSnapshot, DedupKey, ReportScope, ReportedError, Severity,
    DEFAULT_FINGERPRINT, PROTOCOL_METHOD_TAG,
};
use faultgate_core::ports::{IRandomSource, IReportingBackend, IReportingClient};
use tokio::sync::OnceCell;
use tracing::{debug, info, trace, warn};

use crate::dedup::DedupCache;
use crate::sampling::{is_selected, SampledErrorTable, ThreadRandom, SAMPLE_RATE};
use crate::sentry_backend::SentryBackend;

/// Endpoint identifier handed to the backend alongside the user's options
pub const SENTRY_DSN: &str =
    "https://a63b2e4d1f7c4e9b8d0f5c3a2b1e6d7f@o4504821.ingest.sentry.io/4504821";

/// Component name attached to the gateway's own log records
pub const LOG_COMPONENT: &str = "sentry";

/// The two terminal modes; chosen once, never changed
enum GatewayMode {
    Inert,
    Live(LiveReporter),
}

/// State that only exists once reporting is live
struct LiveReporter {
    client: Arc<dyn IReportingClient>,
    context: Arc<ContextSnapshot>,
    sampled_errors: SampledErrorTable,
    dedup: DedupCache,
}

/// Opt-in, sampled front door to the error-reporting backend
///
/// Construct once at startup and share by `Arc`.
pub struct TelemetryGateway {
    backend: Arc<dyn IReportingBackend>,
    random: Arc<dyn IRandomSource>,
    mode: OnceCell<GatewayMode>,
}

impl TelemetryGateway {
    /// Creates an uninitialized gateway drawing from the thread RNG
    pub fn new(backend: Arc<dyn IReportingBackend>) -> Self {
        Self::with_random(backend, Arc::new(ThreadRandom))
    }

    /// Creates an uninitialized gateway with an explicit random source
    pub fn with_random(backend: Arc<dyn IReportingBackend>, random: Arc<dyn IRandomSource>) -> Self {
        Self {
            backend,
            random,
            mode: OnceCell::new(),
        }
    }

    /// Creates an uninitialized gateway backed by Sentry
    pub fn sentry() -> Self {
        Self::new(Arc::new(SentryBackend::new()))
    }

    /// Selects the gateway's mode. Only the first call has any effect.
    pub async fn initialize(&self, init: &ReportingInit) {
        if self.mode.initialized() {
            debug!("Error reporting already initialized");
            return;
        }
        self.mode.get_or_init(|| self.select_mode(init)).await;
    }

    async fn select_mode(&self, init: &ReportingInit) -> GatewayMode {
        if !init.enable_error_reporting {
            debug!("Error reporting disabled by user");
            return GatewayMode::Inert;
        }
        if !self.should_sample() {
            debug!(rate = SAMPLE_RATE, "Error reporting not sampled for this run");
            return GatewayMode::Inert;
        }

        match self.go_live(init).await {
            Ok(live) => {
                info!(
                    channel = %live.context.channel,
                    sampled_patterns = live.sampled_errors.len(),
                    "Error reporting enabled"
                );
                GatewayMode::Live(live)
            }
            Err(e) => {
                warn!(component = LOG_COMPONENT, error = %e, "Could not initialize error reporting");
                GatewayMode::Inert
            }
        }
    }

    async fn go_live(&self, init: &ReportingInit) -> anyhow::Result<LiveReporter> {
        let sampled_errors = SampledErrorTable::compile(&init.sampled_errors)?;
        let client = self.backend.connect(&init.backend, SENTRY_DSN).await?;

        let context = Arc::new(init.context());
        client.set_context(&context);

        Ok(LiveReporter {
            client,
            context,
            sampled_errors,
            dedup: DedupCache::new(),
        })
    }

    fn live(&self) -> Option<&LiveReporter> {
        match self.mode.get() {
            Some(GatewayMode::Live(live)) => Some(live),
            _ => None,
        }
    }

    /// Whether `initialize` has finished selecting a mode
    pub fn is_initialized(&self) -> bool {
        self.mode.initialized()
    }

    /// Whether events are actually being forwarded
    pub fn is_live(&self) -> bool {
        self.live().is_some()
    }

    /// One draw against [`SAMPLE_RATE`]; equality counts as selected
    pub fn should_sample(&self) -> bool {
        is_selected(SAMPLE_RATE, self.random.next_f64())
    }

    /// Forwards a plain message; `Info` when no severity is given
    pub fn capture_message(&self, message: &str, level: Option<Severity>) {
        if let Some(live) = self.live() {
            live.client
                .capture_message(message, level.unwrap_or_default());
        }
    }

    pub fn capture_breadcrumb(&self, breadcrumb: Breadcrumb) {
        if let Some(live) = self.live() {
            live.client.add_breadcrumb(breadcrumb);
        }
    }

    /// The snapshot taken at initialization; `None` unless live
    pub fn get_context(&self) -> Option<Arc<ContextSnapshot>> {
        self.live().map(|live| Arc::clone(&live.context))
    }

    /// Reports an exception, subject to filtering, de-duplication and sampling.
    ///
    /// Resolves once the event has been handed to the client; delivery is not
    /// awaited.
    pub async fn capture_exception(&self, error: Option<&ReportedError>, options: &CaptureOptions) {
        let Some(live) = self.live() else {
            return;
        };
        let Some(error) = error else {
            return;
        };
        if error.expected {
            trace!(message = %error.message, "Skipping expected error");
            return;
        }

        // Recorded before the first await so a racing duplicate sees it.
        if let Some(source) = options.source() {
            let key = DedupKey::new(source, error.message.clone());
            if !live.dedup.record(key) {
                trace!(message = %error.message, "Skipping already reported error");
                return;
            }
        }

        if let Some(sampled) = live.sampled_errors.find(&error.message) {
            if !sampled.keeps(self.random.next_f64()) {
                trace!(pattern = %sampled.pattern, "Error sampled out");
                return;
            }
        }

        let mut scope = ReportScope::from(options);
        if let Some(protocol) = &error.protocol {
            let mut fingerprint = vec![DEFAULT_FINGERPRINT.to_string(), protocol.method.clone()];
            fingerprint.extend(protocol.error.clone());
            scope.fingerprint = Some(fingerprint);
            scope
                .tags
                .insert(PROTOCOL_METHOD_TAG.to_string(), protocol.method.clone());
        }

        live.client.capture_exception(error, &scope).await;
    }

    /// Waits up to `timeout` for queued events; trivially `true` when inert
    pub async fn flush(&self, timeout: Duration) -> bool {
        let Some(live) = self.live() else {
            return true;
        };
        let client = Arc::clone(&live.client);
        tokio::task::spawn_blocking(move || client.flush(timeout))
            .await
            .unwrap_or(false)
    }
}
