//! Progress events emitted while a pipeline runs.
//!
//! Events are delivered synchronously, in stage order, to a
//! `ProgressObserver` supplied by the caller.  They are purely
//! informational: nothing an observer does can change the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Validate,
    Parse,
    DeriveKey,
    Keystream,
    Xor,
    HmacTag,
    VerifyTag,
    Assemble,
    Done,
    Error,
}

impl Stage {
    /// Wire name of the stage (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Parse => "parse",
            Stage::DeriveKey => "deriveKey",
            Stage::Keystream => "keystream",
            Stage::Xor => "xor",
            Stage::HmacTag => "hmacTag",
            Stage::VerifyTag => "verifyTag",
            Stage::Assemble => "assemble",
            Stage::Done => "done",
            Stage::Error => "error",
        }
    }

    /// Whether this stage ends a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Error)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of pipeline progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl ProgressEvent {
    pub fn new(stage: Stage, label: impl Into<String>) -> Self {
        Self {
            stage,
            label: label.into(),
            percent: None,
            info: None,
        }
    }

    pub fn with_percent(mut self, percent: u8) -> Self {
        self.percent = Some(percent.min(100));
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// Receives progress events from a running pipeline.
pub trait ProgressObserver {
    fn on_progress(&mut self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressEvent),
{
    fn on_progress(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}

/// Observer that records every event in order.
#[derive(Debug, Default, Clone)]
pub struct ProgressLog {
    events: Vec<ProgressEvent>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Stages in the order they were reported, including repeats.
    pub fn stages(&self) -> Vec<Stage> {
        self.events.iter().map(|e| e.stage).collect()
    }

    pub fn last(&self) -> Option<&ProgressEvent> {
        self.events.last()
    }

    pub fn into_events(self) -> Vec<ProgressEvent> {
        self.events
    }
}

impl ProgressObserver for ProgressLog {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}
