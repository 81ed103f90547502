//! Output formatting

use miette::{IntoDiagnostic, Result};
use sqlevent_core::telemetry::to_telemetry_events;
use sqlevent_core::SqlEvent;

use crate::args::OutputFormat;

/// Output formatter for detected events
pub struct OutputFormatter {
    format: OutputFormat,
    file_name: String,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, file_name: String) -> Self {
        Self { format, file_name }
    }

    /// Print events in the configured format
    pub fn print_events(&self, events: &[SqlEvent], method: &str) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                self.print_human(events);
                Ok(())
            }
            OutputFormat::Json => self.print_json(events),
            OutputFormat::Telemetry => self.print_telemetry(events, method),
        }
    }

    fn print_human(&self, events: &[SqlEvent]) {
        println!("\x1b[1m{}\x1b[0m", self.file_name);

        if events.is_empty() {
            println!("  (no events)");
            return;
        }

        for event in events {
            let color = if event.kind().is_table_event() {
                "\x1b[32m"
            } else {
                "\x1b[36m"
            };
            println!(
                "  {}{:<20}\x1b[0m {}",
                color,
                event.kind().as_str(),
                display_name(event)
            );
        }
    }

    fn print_json(&self, events: &[SqlEvent]) -> Result<()> {
        let output = serde_json::json!({
            "file": self.file_name,
            "events": events
        });
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        Ok(())
    }

    fn print_telemetry(&self, events: &[SqlEvent], method: &str) -> Result<()> {
        let output = serde_json::json!({
            "file": self.file_name,
            "events": to_telemetry_events(events, method)
        });
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        Ok(())
    }
}

/// `schema.name`, `name`, or a placeholder when the name was not captured
fn display_name(event: &SqlEvent) -> String {
    match (event.schema(), event.name()) {
        (Some(schema), Some(name)) => format!("{}.{}", schema, name),
        (None, Some(name)) => name.to_string(),
        (Some(schema), None) => format!("{}.<unknown>", schema),
        (None, None) => "<unknown>".to_string(),
    }
}
