//! Saved settings form.

use std::path::PathBuf;

use tessera_store::{ClientStorage, StoreError};

use crate::settings::FormSettings;

/// Client storage key the settings form is saved under.
pub const STORAGE_KEY: &str = "formSettings";

/// The settings form as last saved by the user.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    storage: ClientStorage,
}

impl SettingsStore {
    pub fn new(storage: ClientStorage) -> Self {
        Self { storage }
    }

    /// Open the store backed by the directory `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(ClientStorage::open(dir)?))
    }

    pub fn save(&self, settings: &FormSettings) -> Result<(), StoreError> {
        self.storage.set(STORAGE_KEY, settings)
    }

    pub fn load(&self) -> Result<Option<FormSettings>, StoreError> {
        self.storage.get(STORAGE_KEY)
    }

    /// Forget the saved form. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, StoreError> {
        self.storage.delete(STORAGE_KEY)
    }
}
