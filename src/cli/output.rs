//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;
use serde::Serialize;

use super::progress::TimedEvent;
use crate::errors::{Result, SealError};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Result envelope printed by `--json`.
///
/// Mirrors `{ success, data?, error? }` so scripts can branch on
/// `success` without parsing messages.
#[derive(Debug, Serialize)]
pub struct Response<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "errorKind", skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl<T: Serialize> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(err: &SealError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
        }
    }
}

/// Print any serializable value as one line of JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let line = serde_json::to_string(value)
        .map_err(|e| SealError::SerializationError(format!("json output: {e}")))?;
    println!("{line}");
    Ok(())
}

/// Print one progress event as it arrives.
pub fn print_event(timed: &TimedEvent) {
    let stage = format!("{:<10}", timed.event.stage.as_str());
    let stage = if timed.event.stage == crate::pipeline::Stage::Error {
        style(stage).red().bold()
    } else {
        style(stage).cyan()
    };

    let percent = timed
        .event
        .percent
        .map(|p| format!("{p:>3}%"))
        .unwrap_or_else(|| "    ".into());

    let mut line = format!(
        "{} {} {} {}",
        style(timed.at.format("%H:%M:%S%.3f")).dim(),
        stage,
        percent,
        timed.event.label
    );
    if let Some(info) = &timed.event.info {
        line.push_str(&format!(" ({info})"));
    }
    eprintln!("{line}");
}

/// Print a summary table of a finished run (Stage, Step, %, Elapsed).
pub fn print_progress_table(events: &[TimedEvent]) {
    let Some(first) = events.first() else {
        return;
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stage", "Step", "%", "Elapsed"]);

    for timed in events {
        let elapsed = timed.at - first.at;
        table.add_row(vec![
            timed.event.stage.to_string(),
            match &timed.event.info {
                Some(info) => format!("{} ({info})", timed.event.label),
                None => timed.event.label.clone(),
            },
            timed
                .event
                .percent
                .map(|p| p.to_string())
                .unwrap_or_default(),
            format!("{} ms", elapsed.num_milliseconds()),
        ]);
    }

    eprintln!("{table}");
}
