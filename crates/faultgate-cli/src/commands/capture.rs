//! Capture command - Send test events through the gateway
//!
//! Brings up a gateway for a single run, sends one message or exception
//! and flushes before exit. Nothing leaves the machine unless the run is
//! opted in and wins the sampling draw.

use anyhow::Result;
use clap::Subcommand;
use faultgate_core::config::Config;
use faultgate_core::domain::{parse_tag, Breadcrumb, CaptureOptions, ReportedError, Severity};
use tracing::info;

use super::run::{finish, RunArgs};
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Capture subcommands
#[derive(Debug, Subcommand)]
pub enum CaptureCommand {
    /// Send a plain message
    Message {
        /// Message text
        text: String,

        /// Severity (debug, info, warning, error, fatal)
        #[arg(long)]
        level: Option<Severity>,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Send an exception
    Exception {
        /// Error message
        message: String,

        /// Error type shown by the backend
        #[arg(long, default_value = "Error")]
        kind: String,

        /// Name of the audit that failed
        #[arg(long, conflicts_with = "gatherer")]
        audit: Option<String>,

        /// Name of the gatherer that failed
        #[arg(long)]
        gatherer: Option<String>,

        /// Protocol method whose call failed
        #[arg(long)]
        protocol_method: Option<String>,

        /// Error returned by the protocol method
        #[arg(long, requires = "protocol_method")]
        protocol_error: Option<String>,

        /// Mark the error as expected; it is never sent
        #[arg(long)]
        expected: bool,

        /// Severity (debug, info, warning, error, fatal)
        #[arg(long)]
        level: Option<Severity>,

        /// Extra tag as key=value (repeatable)
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,

        /// Breadcrumb recorded before the exception (repeatable)
        #[arg(long = "breadcrumb")]
        breadcrumbs: Vec<String>,

        #[command(flatten)]
        run: RunArgs,
    },
}

impl CaptureCommand {
    /// Execute the capture command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        match self {
            CaptureCommand::Message { text, level, run } => {
                let formatter = get_formatter(format);
                let gateway = run.start_gateway(&config.telemetry).await;
                let live = gateway.is_live();
                report_mode(formatter.as_ref(), live);

                info!(live, "Capturing message");
                gateway.capture_message(text, *level);
                finish(&gateway).await;

                if format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "live": live,
                        "kind": "message",
                        "level": level.unwrap_or_default().to_string(),
                        "message": text,
                    }));
                } else if live {
                    formatter.success(&format!("Message sent: {}", text));
                }
                Ok(())
            }
            CaptureCommand::Exception {
                message,
                kind,
                audit,
                gatherer,
                protocol_method,
                protocol_error,
                expected,
                level,
                tags,
                breadcrumbs,
                run,
            } => {
                let formatter = get_formatter(format);

                let mut error = ReportedError::new(message.as_str()).with_kind(kind.as_str());
                match (protocol_method, protocol_error) {
                    (Some(method), Some(protocol_error)) => {
                        error = error.with_protocol(method.as_str(), protocol_error.as_str());
                    }
                    (Some(method), None) => {
                        error = error.with_protocol_method(method.as_str());
                    }
                    _ => {}
                }
                if *expected {
                    error = error.expected();
                }
                let options = capture_options(audit.as_deref(), gatherer.as_deref(), *level, tags);

                let gateway = run.start_gateway(&config.telemetry).await;
                let live = gateway.is_live();
                report_mode(formatter.as_ref(), live);

                for crumb in breadcrumbs {
                    gateway.capture_breadcrumb(Breadcrumb::new(crumb.as_str()).with_category("cli"));
                }
                info!(live, kind = %error.kind, "Capturing exception");
                gateway.capture_exception(Some(&error), &options).await;
                finish(&gateway).await;

                if format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "live": live,
                        "kind": "exception",
                        "error": error,
                        "source": options.source().map(|s| s.to_string()),
                    }));
                } else if live && !*expected {
                    formatter.success(&format!("Exception submitted: {}", message));
                } else if *expected {
                    formatter.info("Expected errors are never reported");
                }
                Ok(())
            }
        }
    }
}

fn capture_options(
    audit: Option<&str>,
    gatherer: Option<&str>,
    level: Option<Severity>,
    tags: &[(String, String)],
) -> CaptureOptions {
    let mut options = match (audit, gatherer) {
        (Some(audit), _) => CaptureOptions::audit(audit),
        (None, Some(gatherer)) => CaptureOptions::gatherer(gatherer),
        (None, None) => CaptureOptions::new(),
    };
    if let Some(level) = level {
        options = options.with_level(level);
    }
    for (key, value) in tags {
        options = options.with_tag(key.as_str(), value.as_str());
    }
    options
}

fn report_mode(formatter: &dyn OutputFormatter, live: bool) {
    if !live {
        formatter.warn("Error reporting is inactive for this run; nothing will be sent");
    }
}
