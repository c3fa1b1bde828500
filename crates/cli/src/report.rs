//! Human-readable rendering of batch previews.

use quickbatch_core::{Batch, Command, CommandStatus};

fn status_label(status: CommandStatus) -> &'static str {
    match status {
        CommandStatus::Initial => "ok",
        CommandStatus::Error => "error",
    }
}

/// Tabs in raw lines are shown as `|` so columns stay aligned.
fn display_raw(raw: &str) -> String {
    raw.replace('\t', "|")
}

fn render_command(cmd: &Command) -> String {
    let action = cmd.action().map_or("-", |a| a.as_str());
    let operation = cmd.operation().map_or("-", |op| op.as_str());
    let mut line = format!(
        "{:>4}  {:<5}  {:<6}  {:<26}  {}",
        cmd.index(),
        status_label(cmd.status()),
        action,
        operation,
        display_raw(cmd.raw()),
    );
    if let Some(summary) = cmd.summary() {
        line.push_str(&format!("  # {}", summary));
    }
    if let Some(msg) = cmd.error_message() {
        line.push_str(&format!("\n        error: {}", msg));
    }
    line
}

/// Full preview: a header line, then one row per command.
pub fn render_preview(batch: &Batch) -> String {
    let mut out = format!(
        "batch '{}' by {}: {} command(s), {} error(s)\n",
        batch.name(),
        batch.user(),
        batch.len(),
        batch.error_count()
    );
    for cmd in batch.commands() {
        out.push_str(&render_command(cmd));
        out.push('\n');
    }
    out
}

/// Only the rejected lines, one `line N: message` each.
pub fn render_errors(batch: &Batch) -> String {
    let mut out = String::new();
    for cmd in batch.commands() {
        if let Some(msg) = cmd.error_message() {
            out.push_str(&format!(
                "line {}: {} [{}]\n",
                cmd.index(),
                msg,
                display_raw(cmd.raw())
            ));
        }
    }
    out
}
