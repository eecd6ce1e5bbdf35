//! Message dispatcher between the settings UI and the reconciler.
//!
//! [`Plugin`] owns the canvas, the font loader and the settings store. Each
//! [`IncomingMessage`] is handled to completion; everything the UI should see
//! goes out through the channel returned by [`Plugin::new`]. Failures never
//! escape `handle`: they become a single `ERROR` message.

use tessera_core::Canvas;
use tessera_text::FontLoader;
use tokio::sync::mpsc;

use crate::dataset::Dataset;
use crate::error::SyncError;
use crate::events::ChannelSink;
use crate::protocol::{
    IncomingMessage, OutgoingMessage, SETTINGS_SAVED_MESSAGE, STORAGE_CLEARED_MESSAGE,
};
use crate::reconcile::Reconciler;
use crate::settings::FormSettings;
use crate::storage::SettingsStore;

pub struct Plugin<C: Canvas, F: FontLoader> {
    canvas: C,
    fonts: F,
    settings: SettingsStore,
    outbox: ChannelSink<OutgoingMessage>,
}

impl<C: Canvas, F: FontLoader> Plugin<C, F> {
    pub fn new(
        canvas: C,
        fonts: F,
        settings: SettingsStore,
    ) -> (Self, mpsc::UnboundedReceiver<OutgoingMessage>) {
        let (outbox, rx) = ChannelSink::channel();
        let plugin = Self {
            canvas,
            fonts,
            settings,
            outbox,
        };
        (plugin, rx)
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn fonts(&self) -> &F {
        &self.fonts
    }

    pub fn into_parts(self) -> (C, F) {
        (self.canvas, self.fonts)
    }

    /// Push the saved settings to a freshly opened UI.
    pub fn start(&mut self) {
        self.load_settings();
    }

    pub async fn handle(&mut self, message: IncomingMessage) {
        match message {
            IncomingMessage::CreateFrames {
                data,
                settings,
                page_name,
            } => self.create_frames(Dataset::from_rows(data), &settings, &page_name).await,
            IncomingMessage::SaveSettings { settings } => self.save_settings(&settings),
            IncomingMessage::LoadSettings => self.load_settings(),
            IncomingMessage::ClearStorage => self.clear_storage(),
        }
    }

    /// Parse and handle one JSON message.
    pub async fn handle_json(&mut self, json: &str) -> Result<(), SyncError> {
        let message = IncomingMessage::from_json(json)?;
        self.handle(message).await;
        Ok(())
    }

    async fn create_frames(&mut self, dataset: Dataset, form: &FormSettings, page_name: &str) {
        let style = match form.validate() {
            Ok(style) => style,
            Err(e) => return self.reject(e),
        };
        let result = Reconciler::new(&mut self.canvas, &self.fonts, &mut self.outbox)
            .run(&dataset, &style, page_name)
            .await;
        if let Err(e) = result {
            self.fail("creating frames", e);
        }
    }

    fn save_settings(&mut self, form: &FormSettings) {
        if let Err(e) = form.validate() {
            return self.reject(e);
        }
        match self.settings.save(form) {
            Ok(()) => self.outbox.send(OutgoingMessage::SettingsSaved {
                message: SETTINGS_SAVED_MESSAGE.to_string(),
            }),
            Err(e) => self.fail("saving settings", e),
        }
    }

    fn load_settings(&mut self) {
        match self.settings.load() {
            Ok(Some(settings)) => self.outbox.send(OutgoingMessage::SettingsLoaded { settings }),
            Ok(None) => log::debug!("No saved settings"),
            Err(e) => self.fail("loading settings", e),
        }
    }

    fn clear_storage(&mut self) {
        match self.settings.clear() {
            Ok(_) => self.outbox.send(OutgoingMessage::StorageCleared {
                message: STORAGE_CLEARED_MESSAGE.to_string(),
            }),
            Err(e) => self.fail("clearing storage", e),
        }
    }

    fn reject(&self, error: impl std::fmt::Display) {
        log::warn!("{error}");
        self.outbox.send(OutgoingMessage::error(error.to_string()));
    }

    fn fail(&self, context: &str, error: impl std::fmt::Display) {
        log::error!("Error {context}: {error}");
        self.outbox.send(OutgoingMessage::error_in(context, error));
    }
}
