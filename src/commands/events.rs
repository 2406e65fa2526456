use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::events::{Event, EventLog, EventType};

/// Show the newest entries of the mutation log
pub fn cmd_events(log: &EventLog, limit: usize, output: OutputOptions) -> Result<()> {
    let events = log.tail(limit)?;

    let text = if events.is_empty() {
        format!("No events recorded in {}", log.path().display())
    } else {
        events
            .iter()
            .map(format_event_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandOutput::new(json!(events)).with_text(text).print(output)
}

fn format_event_line(event: &Event) -> String {
    // Pad before coloring so escape codes do not count toward the width
    let kind = format!("{:<8}", event.event_type.to_string());
    let kind = match event.event_type {
        EventType::Created => kind.green().to_string(),
        EventType::Updated => kind.yellow().to_string(),
        EventType::Deleted => kind.red().to_string(),
    };
    format!(
        "{} {} {} #{}",
        event.timestamp.dimmed(),
        kind,
        event.collection.cyan(),
        event.entity_id
    )
}

/// Clear the mutation log
pub fn cmd_events_prune(log: &EventLog, output: OutputOptions) -> Result<()> {
    let removed = log.clear()?;

    let text = if removed == 0 {
        format!("Events log cleared (no events were present in {})", log.path().display())
    } else {
        format!(
            "Events log cleared. Removed {removed} event(s) from {}.",
            log.path().display()
        )
    };

    CommandOutput::new(json!({
        "action": "events_prune",
        "removed_count": removed,
        "success": true,
    }))
    .with_text(text)
    .print(output)
}
