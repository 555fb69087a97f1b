//! Per-run settings shared by commands that bring up the gateway

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use faultgate_core::config::{ReportingInit, TelemetryConfig};
use faultgate_core::domain::{FormFactor, ThrottlingMethod, ThrottlingSettings};
use faultgate_telemetry::TelemetryGateway;
use tracing::{debug, warn};

/// How long to wait for queued events before exiting
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Describes the run that reports are attached to
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// URL of the page being audited
    #[arg(long, default_value = "about:blank")]
    pub url: String,

    /// Device class to emulate (mobile, desktop)
    #[arg(long, default_value = "mobile")]
    pub form_factor: FormFactor,

    /// Throttling method (simulate, devtools, provided)
    #[arg(long, default_value = "simulate")]
    pub throttling_method: ThrottlingMethod,

    /// Round-trip time in milliseconds
    #[arg(long)]
    pub rtt_ms: Option<f64>,

    /// CPU slowdown multiplier
    #[arg(long)]
    pub cpu_slowdown_multiplier: Option<f64>,

    /// Opt in to error reporting for this run
    #[arg(long)]
    pub enable_error_reporting: bool,
}

impl RunArgs {
    /// Combines the persistent settings with this run's flags
    pub fn reporting_init(&self, config: &TelemetryConfig) -> ReportingInit {
        let mut throttling = ThrottlingSettings::default();
        if let Some(rtt_ms) = self.rtt_ms {
            throttling.rtt_ms = rtt_ms;
        }
        if let Some(multiplier) = self.cpu_slowdown_multiplier {
            throttling.cpu_slowdown_multiplier = multiplier;
        }

        ReportingInit::from_config(config, self.url.clone())
            .with_enabled(config.enable_error_reporting || self.enable_error_reporting)
            .with_form_factor(self.form_factor)
            .with_throttling_method(self.throttling_method)
            .with_throttling(throttling)
    }

    /// Builds and initializes a Sentry-backed gateway for this run
    pub async fn start_gateway(&self, config: &TelemetryConfig) -> Arc<TelemetryGateway> {
        let gateway = Arc::new(TelemetryGateway::sentry());
        gateway.initialize(&self.reporting_init(config)).await;
        debug!(live = gateway.is_live(), "Gateway initialized");
        gateway
    }
}

/// Flushes queued events before the process exits
pub async fn finish(gateway: &TelemetryGateway) {
    if !gateway.flush(FLUSH_TIMEOUT).await {
        warn!(timeout_secs = FLUSH_TIMEOUT.as_secs(), "Not all events were delivered before exit");
    }
}
