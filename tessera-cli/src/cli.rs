use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tessera", version, about = "Incremental frame sync for translated copy")]
pub struct CliArgs {
    /// Directory holding saved plugin state (settings form).
    #[arg(long = "state-dir", env = "TESSERA_STATE_DIR", value_name = "DIR", default_value = ".tessera")]
    pub state_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a dataset onto a page of the document.
    Sync(SyncArgs),
    /// Manage the saved settings form.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// JSON object of `key -> [line1, line2]`.
    #[arg(long, value_name = "PATH")]
    pub dataset: PathBuf,

    /// Page the frames are placed on.
    #[arg(long, env = "TESSERA_PAGE", default_value = "Translations")]
    pub page: String,

    /// Document snapshot, created on first run.
    #[arg(long, env = "TESSERA_DOCUMENT", value_name = "PATH", default_value = "document.tsr")]
    pub document: PathBuf,

    /// Settings form JSON; the saved form is used when omitted.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Extra loadable font as `Family:Style`; repeatable.
    #[arg(long = "font", value_name = "FAMILY:STYLE")]
    pub fonts: Vec<String>,

    /// Fonts remembered between loads.
    #[arg(long = "font-cache", default_value_t = 32)]
    pub font_cache: usize,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Validate and save a settings form.
    Save {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Print the saved settings form.
    Show,
    /// Delete the saved settings form.
    Clear,
}
