use tessera_core::CanvasError;
use tessera_text::FontError;
use thiserror::Error;

use crate::settings::SettingsError;

/// Anything that aborts a run or a plugin request.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{0}")]
    FontLoad(#[from] FontError),
    #[error("{0}")]
    NodeMutation(#[from] CanvasError),
    #[error("{0}")]
    InvalidSettings(#[from] SettingsError),
    #[error("Invalid message: {0}")]
    Message(#[from] serde_json::Error),
}
