//! Sentry adapter for the reporting ports
//!
//! Each connected client owns a dedicated [`Hub`] rather than binding the
//! process-global one, so a gateway never leaks scope into unrelated code
//! that also happens to use Sentry. Per-exception scopes live on a hub
//! forked for that one capture.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use faultgate_core::config::BackendOptions;
use faultgate_core::domain::{Breadcrumb, ContextSnapshot, ReportScope, ReportedError, Severity};
use faultgate_core::ports::{IReportingBackend, IReportingClient};
use sentry::protocol::Event;
use sentry::transports::ReqwestHttpTransport;
use sentry::{ClientOptions, Hub, Level, Scope, Transport, TransportFactory};
use tracing::debug;

use crate::error::TelemetryError;

/// Constructs Sentry-backed reporting clients
#[derive(Clone, Default)]
pub struct SentryBackend {
    transport: Option<Arc<dyn TransportFactory>>,
}

impl SentryBackend {
    /// Delivers over HTTP with reqwest
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given transport instead of the default HTTP one
    pub fn with_transport(transport: Arc<dyn TransportFactory>) -> Self {
        Self {
            transport: Some(transport),
        }
    }
}

/// Maps backend options plus the endpoint identifier to Sentry client options.
pub fn client_options(options: &BackendOptions, dsn: &str) -> Result<ClientOptions, TelemetryError> {
    let dsn = dsn
        .parse::<sentry::types::Dsn>()
        .map_err(|e| TelemetryError::InvalidDsn(e.to_string()))?;
    let release = options
        .release
        .clone()
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    Ok(ClientOptions {
        dsn: Some(dsn),
        release: Some(release.into()),
        environment: options.environment.clone().map(Into::into),
        server_name: options.server_name.clone().map(Into::into),
        max_breadcrumbs: options.max_breadcrumbs,
        debug: options.debug,
        ..Default::default()
    })
}

#[async_trait::async_trait]
impl IReportingBackend for SentryBackend {
    async fn connect(
        &self,
        options: &BackendOptions,
        dsn: &str,
    ) -> anyhow::Result<Arc<dyn IReportingClient>> {
        let mut client_options = client_options(options, dsn)?;
        let transport: Arc<dyn TransportFactory> = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(|options: &ClientOptions| -> Arc<dyn Transport> {
                Arc::new(ReqwestHttpTransport::new(options))
            }),
        };
        client_options.transport = Some(transport);

        // Integrations and the transport thread are set up here.
        let client = tokio::task::spawn_blocking(move || {
            sentry::Client::with_options(sentry::apply_defaults(client_options))
        })
        .await
        .map_err(|e| TelemetryError::ClientConstruction(e.to_string()))?;

        if !client.is_enabled() {
            return Err(TelemetryError::ClientConstruction(
                "client has no usable DSN or transport".to_string(),
            )
            .into());
        }

        debug!("Sentry client constructed");
        let hub = Hub::new(Some(Arc::new(client)), Arc::new(Scope::default()));
        Ok(Arc::new(SentryClient { hub: Arc::new(hub) }))
    }
}

/// A live client bound to its own hub
pub struct SentryClient {
    hub: Arc<Hub>,
}

#[async_trait::async_trait]
impl IReportingClient for SentryClient {
    fn capture_message(&self, message: &str, level: Severity) {
        self.hub.capture_message(message, to_sentry_level(level));
    }

    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.hub.add_breadcrumb(to_sentry_breadcrumb(breadcrumb));
    }

    fn set_context(&self, context: &ContextSnapshot) {
        let extras = context.extras();
        self.hub.configure_scope(|scope| {
            scope.set_tag("channel", &context.channel);
            for (key, value) in extras {
                scope.set_extra(&key, value);
            }
        });
    }

    async fn capture_exception(&self, error: &ReportedError, scope: &ReportScope) {
        let event = exception_event(error);
        // The shared hub's scope stack must not be pushed from concurrent
        // callers; each capture gets a private hub forked from its top.
        let hub = Hub::new_from_top(&self.hub);
        hub.with_scope(
            |target| apply_scope(target, scope),
            || {
                hub.capture_event(event);
            },
        );
    }

    fn flush(&self, timeout: Duration) -> bool {
        self.hub
            .client()
            .map_or(true, |client| client.flush(Some(timeout)))
    }
}

fn to_sentry_level(level: Severity) -> Level {
    match level {
        Severity::Debug => Level::Debug,
        Severity::Info => Level::Info,
        Severity::Warning => Level::Warning,
        Severity::Error => Level::Error,
        Severity::Fatal => Level::Fatal,
    }
}

fn to_sentry_breadcrumb(breadcrumb: Breadcrumb) -> sentry::Breadcrumb {
    sentry::Breadcrumb {
        timestamp: SystemTime::from(breadcrumb.timestamp),
        category: breadcrumb.category,
        message: breadcrumb.message,
        level: to_sentry_level(breadcrumb.level),
        data: breadcrumb.data.into_iter().collect(),
        ..Default::default()
    }
}

fn exception_event(error: &ReportedError) -> Event<'static> {
    let mut event = sentry::event_from_error(error);
    if let Some(exception) = event.exception.values.last_mut() {
        exception.ty = error.kind.clone();
    }
    event
}

fn apply_scope(target: &mut Scope, scope: &ReportScope) {
    if let Some(level) = scope.level {
        target.set_level(Some(to_sentry_level(level)));
    }
    for (key, value) in &scope.tags {
        target.set_tag(key, value);
    }
    for (key, value) in &scope.extra {
        target.set_extra(key, value.clone());
    }
    if let Some(fingerprint) = &scope.fingerprint {
        let parts: Vec<&str> = fingerprint.iter().map(String::as_str).collect();
        target.set_fingerprint(Some(parts.as_slice()));
    }
}
