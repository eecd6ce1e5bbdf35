mod cli;

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use indexmap::IndexMap;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use tessera_store::{DocumentStore, StoreError};
use tessera_sync::{
    FormSettings, IncomingMessage, MemoryCanvas, OutgoingMessage, Plugin, SettingsStore,
};
use tessera_text::{CachedFontLoader, FontCatalog, FontError};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use cli::{CliArgs, Command, SettingsCommand, SyncArgs};

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("No settings given and none saved (pass --settings or run `tessera settings save`)")]
    NoSettings,
    #[error("--font-cache must be at least 1")]
    FontCache,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Log everything the plugin sent. Saved settings go to stdout.
fn report(rx: &mut UnboundedReceiver<OutgoingMessage>) -> Vec<OutgoingMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        match &msg {
            OutgoingMessage::Error { message } => error!("{message}"),
            OutgoingMessage::CountryProcessing { message, .. }
            | OutgoingMessage::FrameUnchanged { message, .. } => log::debug!("{message}"),
            OutgoingMessage::MissingTranslation { message, .. } => warn!("{message}"),
            OutgoingMessage::SettingsLoaded { settings } => match serde_json::to_string_pretty(settings) {
                Ok(json) => println!("{json}"),
                Err(e) => error!("Failed to print settings: {e}"),
            },
            other => {
                if let Some(message) = other.message() {
                    info!("{message}");
                }
            }
        }
        out.push(msg);
    }
    out
}

fn succeeded(messages: &[OutgoingMessage]) -> bool {
    !messages.iter().any(OutgoingMessage::is_error)
}

async fn run_sync(state_dir: &Path, args: SyncArgs) -> Result<bool, CliError> {
    let settings_store = SettingsStore::open(state_dir)?;
    let form: FormSettings = match &args.settings {
        Some(path) => read_json(path)?,
        None => settings_store.load()?.ok_or(CliError::NoSettings)?,
    };
    let data: IndexMap<String, Vec<String>> = read_json(&args.dataset)?;

    let mut catalog = FontCatalog::with_defaults();
    for spec in &args.fonts {
        catalog.register_spec(spec)?;
    }
    info!("{catalog}");
    let capacity = NonZeroUsize::new(args.font_cache).ok_or(CliError::FontCache)?;
    let loaded = catalog.loaded();
    let fonts = CachedFontLoader::new(catalog, capacity);

    let documents = DocumentStore::new(&args.document);
    let canvas = MemoryCanvas::from_document(documents.load_or_default()?).with_font_guard(loaded);

    let (mut plugin, mut rx) = Plugin::new(canvas, fonts, settings_store);
    plugin
        .handle(IncomingMessage::CreateFrames {
            data,
            settings: form,
            page_name: args.page,
        })
        .await;
    let ok = succeeded(&report(&mut rx));

    // Records finished before a failure stay committed.
    let (canvas, _) = plugin.into_parts();
    let stats = documents.save(canvas.document())?;
    info!(
        "Saved {} ({} frames, {} -> {} bytes)",
        documents.path().display(),
        canvas.document().frame_count(),
        stats.original_size,
        stats.stored_size
    );
    Ok(ok)
}

async fn run_settings(state_dir: &Path, command: SettingsCommand) -> Result<bool, CliError> {
    let store = SettingsStore::open(state_dir)?;
    let message = match command {
        SettingsCommand::Save { path } => IncomingMessage::SaveSettings {
            settings: read_json(&path)?,
        },
        SettingsCommand::Show => IncomingMessage::LoadSettings,
        SettingsCommand::Clear => IncomingMessage::ClearStorage,
    };

    let (mut plugin, mut rx) = Plugin::new(MemoryCanvas::new(), FontCatalog::empty(), store);
    plugin.handle(message).await;
    let messages = report(&mut rx);
    if messages.is_empty() {
        info!("No saved settings in {}", state_dir.display());
    }
    Ok(succeeded(&messages))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();

    let result = match args.command {
        Command::Sync(sync) => run_sync(&args.state_dir, sync).await,
        Command::Settings(command) => run_settings(&args.state_dir, command).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
