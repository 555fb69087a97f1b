//! Shared test doubles for gateway integration tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use faultgate_core::config::{BackendOptions, ReportingInit, TelemetryConfig};
use faultgate_core::domain::{Breadcrumb, ContextSnapshot, ReportScope, ReportedError, Severity};
use faultgate_core::ports::{IRandomSource, IReportingBackend, IReportingClient};
use faultgate_telemetry::TelemetryGateway;

/// Draw that always wins the initialization sample
pub const WINNING_DRAW: f64 = 0.0;

/// Returns queued draws in order, then `fallback` forever
pub struct ScriptedRandom {
    draws: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl ScriptedRandom {
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: Mutex::new(draws.iter().copied().collect()),
            fallback: WINNING_DRAW,
        }
    }
}

impl IRandomSource for ScriptedRandom {
    fn next_f64(&self) -> f64 {
        self.draws
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

/// One call observed by [`RecordingClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Message(String, Severity),
    Breadcrumb(Breadcrumb),
    Context(ContextSnapshot),
    Exception(ReportedError, ReportScope),
}

#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Recorded>>,
}

impl RecordingClient {
    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn exceptions(&self) -> Vec<(ReportedError, ReportScope)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Recorded::Exception(error, scope) => Some((error, scope)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: Recorded) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl IReportingClient for RecordingClient {
    fn capture_message(&self, message: &str, level: Severity) {
        self.push(Recorded::Message(message.to_string(), level));
    }

    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.push(Recorded::Breadcrumb(breadcrumb));
    }

    fn set_context(&self, context: &ContextSnapshot) {
        self.push(Recorded::Context(context.clone()));
    }

    async fn capture_exception(&self, error: &ReportedError, scope: &ReportScope) {
        tokio::task::yield_now().await;
        self.push(Recorded::Exception(error.clone(), scope.clone()));
    }

    fn flush(&self, _timeout: Duration) -> bool {
        true
    }
}

/// Hands out one shared [`RecordingClient`], or fails every connect
pub struct RecordingBackend {
    pub client: Arc<RecordingClient>,
    pub fail: bool,
    pub connects: Mutex<Vec<(BackendOptions, String)>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            client: Arc::new(RecordingClient::default()),
            fail: false,
            connects: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

#[async_trait::async_trait]
impl IReportingBackend for RecordingBackend {
    async fn connect(
        &self,
        options: &BackendOptions,
        dsn: &str,
    ) -> anyhow::Result<Arc<dyn IReportingClient>> {
        self.connects
            .lock()
            .unwrap()
            .push((options.clone(), dsn.to_string()));
        if self.fail {
            anyhow::bail!("backend unavailable");
        }
        Ok(self.client.clone())
    }
}

/// Opted-in init bundle for a run against example.com
pub fn enabled_init() -> ReportingInit {
    ReportingInit::from_config(&TelemetryConfig::default(), "https://example.com").with_enabled(true)
}

/// A gateway already live against a fresh recording backend
///
/// `draws` are consumed after the initialization draw.
pub async fn live_gateway(
    init: ReportingInit,
    draws: &[f64],
) -> (TelemetryGateway, Arc<RecordingBackend>) {
    let backend = Arc::new(RecordingBackend::new());
    let mut all_draws = vec![WINNING_DRAW];
    all_draws.extend_from_slice(draws);
    let gateway =
        TelemetryGateway::with_random(backend.clone(), Arc::new(ScriptedRandom::new(&all_draws)));
    gateway.initialize(&init).await;
    assert!(gateway.is_live(), "gateway should be live");
    (gateway, backend)
}
