//! Terminal rendering of pipeline progress.
//!
//! Every event is stamped with the wall-clock time it arrived, then
//! either printed as a styled line or as a JSON line on stderr.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::output;
use crate::pipeline::{ProgressEvent, ProgressObserver};

/// A progress event plus the time it was received.
#[derive(Debug, Clone, Serialize)]
pub struct TimedEvent {
    #[serde(flatten)]
    pub event: ProgressEvent,
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub at: DateTime<Utc>,
}

/// Observer used by the `encrypt` and `decrypt` commands.
pub struct ProgressRenderer {
    live: bool,
    json: bool,
    events: Vec<TimedEvent>,
}

impl ProgressRenderer {
    /// `live` prints each event as it arrives; `json` switches the
    /// format to one JSON object per line.
    pub fn new(live: bool, json: bool) -> Self {
        Self {
            live,
            json,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Print the summary table for a finished run (text mode only).
    pub fn finish(&self) {
        if self.live && !self.json {
            output::print_progress_table(&self.events);
        }
    }
}

impl ProgressObserver for ProgressRenderer {
    fn on_progress(&mut self, event: &ProgressEvent) {
        let timed = TimedEvent {
            event: event.clone(),
            at: Utc::now(),
        };

        if self.live {
            if self.json {
                match serde_json::to_string(&timed) {
                    Ok(line) => eprintln!("{line}"),
                    Err(e) => tracing::warn!("cannot serialize progress event: {e}"),
                }
            } else {
                output::print_event(&timed);
            }
        }

        self.events.push(timed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;

    #[test]
    fn renderer_records_events_even_when_quiet() {
        let mut renderer = ProgressRenderer::new(false, false);
        renderer.on_progress(&ProgressEvent::new(Stage::Validate, "Validating input"));
        renderer.on_progress(&ProgressEvent::new(Stage::Done, "Done").with_percent(100));

        let stages: Vec<Stage> = renderer.events().iter().map(|t| t.event.stage).collect();
        assert_eq!(stages, vec![Stage::Validate, Stage::Done]);
        assert!(renderer.events()[0].at <= renderer.events()[1].at);
    }

    #[test]
    fn timed_event_serializes_flat_with_timestamp() {
        let timed = TimedEvent {
            event: ProgressEvent::new(Stage::Xor, "XOR with keystream done").with_percent(100),
            at: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
        };
        let json = serde_json::to_string(&timed).unwrap();
        assert_eq!(
            json,
            r#"{"stage":"xor","label":"XOR with keystream done","percent":100,"ts":1700000000123}"#
        );
    }
}
