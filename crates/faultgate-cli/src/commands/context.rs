//! Context command - Show the context attached to reports for a run

use anyhow::Result;
use clap::Args;
use faultgate_core::config::Config;
use faultgate_core::domain::ContextSnapshot;

use super::run::{finish, RunArgs};
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Context arguments
#[derive(Debug, Args)]
pub struct ContextCommand {
    /// Show the context a live run would attach, without initializing reporting
    #[arg(long)]
    preview: bool,

    #[command(flatten)]
    run: RunArgs,
}

impl ContextCommand {
    /// Execute the context command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        if self.preview {
            let context = self.run.reporting_init(&config.telemetry).context();
            print_context(formatter.as_ref(), format, &context, false)?;
            return Ok(());
        }

        let gateway = self.run.start_gateway(&config.telemetry).await;
        let snapshot = gateway.get_context();
        finish(&gateway).await;

        match snapshot {
            Some(context) => print_context(formatter.as_ref(), format, &context, true)?,
            None if format.is_json() => {
                formatter.print_json(&serde_json::json!({ "live": false, "context": null }));
            }
            None => {
                formatter.warn("Error reporting is inactive for this run; no context was captured");
                formatter.info("Use --preview to see the context a live run would attach.");
            }
        }

        Ok(())
    }
}

fn print_context(
    formatter: &dyn OutputFormatter,
    format: OutputFormat,
    context: &ContextSnapshot,
    live: bool,
) -> Result<()> {
    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "live": live,
            "context": serde_json::to_value(context)?,
        }));
        return Ok(());
    }

    if live {
        formatter.success("Context attached to reports");
    } else {
        formatter.success("Context preview");
    }
    for (key, value) in context.extras() {
        formatter.info(&format!("{:<26} {}", key, value));
    }
    Ok(())
}
