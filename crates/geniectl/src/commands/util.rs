//! Shared helpers for command handlers.

use chrono::{DateTime, Utc};
use dialoguer::Confirm;

use crate::error::CliError;

/// Ask for confirmation unless `--yes` was passed.
///
/// In a non-interactive context (no TTY), refuses instead of hanging.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool, CliError> {
    if yes {
        return Ok(true);
    }

    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: prompt.to_owned(),
        });
    }

    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Render an optional timestamp for table cells.
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || "Never".into(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
