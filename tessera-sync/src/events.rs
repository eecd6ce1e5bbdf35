//! Progress events emitted during a sync run.
//!
//! One run produces, in order:
//!
//! ```text
//! processing-started
//! page-created | page-switched
//! ┌ record-processing
//! │ record-unchanged | record-created-or-updated
//! └ missing-translation            (placeholder records only)
//! batch-complete
//! ```
//!
//! Sinks are fire-and-forget: emitting never fails and never blocks the run.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Counters reported once at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub created_count: usize,
    pub updated_count: usize,
    pub skipped_count: usize,
    /// Keys rendered as a placeholder, in processing order.
    pub missing_keys: Vec<String>,
    pub total_processed: usize,
}

impl RunSummary {
    /// `Created 2 | Updated 1 | Skipped 5 | Missing 1 (BE) frame(s)`;
    /// zero updated/skipped/missing parts are left out.
    pub fn message(&self) -> String {
        let mut parts = vec![format!("Created {}", self.created_count)];
        if self.updated_count > 0 {
            parts.push(format!("Updated {}", self.updated_count));
        }
        if self.skipped_count > 0 {
            parts.push(format!("Skipped {}", self.skipped_count));
        }
        if !self.missing_keys.is_empty() {
            parts.push(format!(
                "Missing {} ({})",
                self.missing_keys.len(),
                self.missing_keys.join(", ")
            ));
        }
        format!("{} frame(s)", parts.join(" | "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ProgressEvent {
    ProcessingStarted {
        total_count: usize,
    },
    PageCreated {
        page_name: String,
    },
    PageSwitched {
        page_name: String,
    },
    RecordProcessing {
        key: String,
        /// 1-based position of the record.
        current_index: usize,
        total_count: usize,
        progress_percent: u8,
    },
    RecordUnchanged {
        key: String,
    },
    RecordCreatedOrUpdated {
        key: String,
        was_update: bool,
    },
    MissingTranslation {
        key: String,
    },
    BatchComplete(RunSummary),
}

impl ProgressEvent {
    /// Human-readable line for the notification log.
    pub fn message(&self) -> String {
        match self {
            Self::ProcessingStarted { total_count } => {
                format!("Processing {total_count} frame(s)...")
            }
            Self::PageCreated { page_name } => format!("Created new page: \"{page_name}\""),
            Self::PageSwitched { page_name } => format!("Switched to page: \"{page_name}\""),
            Self::RecordProcessing {
                key,
                current_index,
                total_count,
                ..
            } => format!("Processing frames {current_index}/{total_count} ({key})"),
            Self::RecordUnchanged { key } => format!("No changes for {key} (skipped)"),
            Self::RecordCreatedOrUpdated { key, was_update: true } => {
                format!("Updated frame for {key}")
            }
            Self::RecordCreatedOrUpdated { key, was_update: false } => {
                format!("Created frame for {key}")
            }
            Self::MissingTranslation { key } => {
                format!("{key} has no translations - creating placeholder frame")
            }
            Self::BatchComplete(summary) => summary.message(),
        }
    }
}

/// Rounded share of records processed, `current` being 1-based.
pub fn progress_percent(current: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((current as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Receiver of progress events.
pub trait EventSink {
    fn emit(&mut self, event: ProgressEvent);
}

impl EventSink for Vec<ProgressEvent> {
    fn emit(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: ProgressEvent) {
        (**self).emit(event);
    }
}

/// Forwards events into an unbounded channel.
///
/// A dropped receiver is not an error; events are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> ChannelSink<T> {
    pub fn new(tx: mpsc::UnboundedSender<T>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Send anything convertible into the channel's item type.
    pub fn send(&self, item: impl Into<T>) {
        if self.tx.send(item.into()).is_err() {
            log::trace!("ChannelSink: receiver gone, dropping event");
        }
    }
}

impl<T: From<ProgressEvent>> EventSink for ChannelSink<T> {
    fn emit(&mut self, event: ProgressEvent) {
        self.send(event);
    }
}

/// Writes every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: ProgressEvent) {
        match &event {
            ProgressEvent::RecordProcessing { .. } | ProgressEvent::RecordUnchanged { .. } => {
                log::debug!("{}", event.message())
            }
            _ => log::info!("{}", event.message()),
        }
    }
}
