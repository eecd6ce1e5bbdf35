//! JSON messages exchanged with the settings UI.
//!
//! Both directions are tagged by a `type` field in SCREAMING_SNAKE_CASE:
//!
//! ```text
//! UI ──▸ plugin   CREATE_FRAMES { data, settings, pageName }
//!                 SAVE_SETTINGS { settings }
//!                 LOAD_SETTINGS
//!                 CLEAR_STORAGE
//!
//! plugin ──▸ UI   FRAME_PROCESSING_STARTED · PAGE_CREATED · PAGE_SWITCHED
//!                 COUNTRY_PROCESSING · FRAME_UNCHANGED · FRAME_CREATED
//!                 MISSING_TRANSLATION · FRAMES_CREATED
//!                 SETTINGS_SAVED · SETTINGS_LOADED · STORAGE_CLEARED · ERROR
//! ```
//!
//! Every outgoing message except `SETTINGS_LOADED` carries a human-readable
//! `message` for the notification log.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::events::{ProgressEvent, RunSummary};
use crate::settings::FormSettings;

pub const SETTINGS_SAVED_MESSAGE: &str = "Settings saved successfully!";
pub const STORAGE_CLEARED_MESSAGE: &str = "Storage cleared successfully!";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum IncomingMessage {
    CreateFrames {
        /// Record key → `[line1, line2]`, in display order.
        data: IndexMap<String, Vec<String>>,
        settings: FormSettings,
        page_name: String,
    },
    SaveSettings {
        settings: FormSettings,
    },
    LoadSettings,
    ClearStorage,
}

impl IncomingMessage {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum OutgoingMessage {
    FrameProcessingStarted {
        message: String,
        total_count: usize,
    },
    PageCreated {
        message: String,
    },
    PageSwitched {
        message: String,
    },
    CountryProcessing {
        message: String,
        current_country: String,
        progress: u8,
    },
    FrameUnchanged {
        message: String,
        country: String,
    },
    /// Sent for both new and updated frames; `message` tells them apart.
    FrameCreated {
        message: String,
        country: String,
    },
    MissingTranslation {
        message: String,
        country: String,
    },
    FramesCreated {
        message: String,
        frames_count: usize,
        frames_updated: usize,
        frames_skipped: usize,
        missing_translations: Vec<String>,
        total_processed: usize,
    },
    SettingsSaved {
        message: String,
    },
    SettingsLoaded {
        settings: FormSettings,
    },
    StorageCleared {
        message: String,
    },
    Error {
        message: String,
    },
}

impl OutgoingMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// `ERROR` for a failure while `context`, e.g. `"creating frames"`.
    pub fn error_in(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::error(format!("Error {context}: {cause}"))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Text shown in the notification log, if the message has one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::FrameProcessingStarted { message, .. }
            | Self::PageCreated { message }
            | Self::PageSwitched { message }
            | Self::CountryProcessing { message, .. }
            | Self::FrameUnchanged { message, .. }
            | Self::FrameCreated { message, .. }
            | Self::MissingTranslation { message, .. }
            | Self::FramesCreated { message, .. }
            | Self::SettingsSaved { message }
            | Self::StorageCleared { message }
            | Self::Error { message } => Some(message),
            Self::SettingsLoaded { .. } => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<RunSummary> for OutgoingMessage {
    fn from(summary: RunSummary) -> Self {
        Self::FramesCreated {
            message: summary.message(),
            frames_count: summary.created_count,
            frames_updated: summary.updated_count,
            frames_skipped: summary.skipped_count,
            missing_translations: summary.missing_keys,
            total_processed: summary.total_processed,
        }
    }
}

impl From<ProgressEvent> for OutgoingMessage {
    fn from(event: ProgressEvent) -> Self {
        let message = event.message();
        match event {
            ProgressEvent::ProcessingStarted { total_count } => Self::FrameProcessingStarted {
                message,
                total_count,
            },
            ProgressEvent::PageCreated { .. } => Self::PageCreated { message },
            ProgressEvent::PageSwitched { .. } => Self::PageSwitched { message },
            ProgressEvent::RecordProcessing {
                key,
                progress_percent,
                ..
            } => Self::CountryProcessing {
                message,
                current_country: key,
                progress: progress_percent,
            },
            ProgressEvent::RecordUnchanged { key } => Self::FrameUnchanged {
                message,
                country: key,
            },
            ProgressEvent::RecordCreatedOrUpdated { key, .. } => Self::FrameCreated {
                message,
                country: key,
            },
            ProgressEvent::MissingTranslation { key } => Self::MissingTranslation {
                message,
                country: key,
            },
            ProgressEvent::BatchComplete(summary) => summary.into(),
        }
    }
}
