//! # tessera-sync
//!
//! Incremental frame sync: renders a keyed dataset of two-line texts onto a
//! canvas page as stacked, styled frames, touching only what changed since
//! the last run.
//!
//! ## Architecture
//!
//! ```text
//! IncomingMessage ──▸ Plugin ──validate──▸ StyleSettings
//!                        │
//!                        ▼
//!                   Reconciler ──signature──▸ skip?
//!                        │ no
//!                        ├──▸ Synthesizer ──ensure_font──▸ FontLoader
//!                        ├──▸ Canvas (create / configure / lines / sign)
//!                        └──▸ LayoutCursor
//!                        │
//!                        ▼
//!                  ProgressEvent ──▸ EventSink ──▸ OutgoingMessage
//! ```
//!
//! ## Modules
//!
//! - [`settings`] — settings form, validation, style snapshot.
//! - [`signature`] — content fingerprint of a rendered record.
//! - [`synth`] — line planning and text node synthesis.
//! - [`reconcile`] — the per-record create/update/skip run.
//! - [`events`] — progress events and sinks.
//! - [`memory`] — in-memory canvas.
//! - [`protocol`], [`plugin`] — UI messages and their dispatcher.
//! - [`storage`] — saved settings form.

pub mod dataset;
pub mod error;
pub mod events;
pub mod memory;
pub mod plugin;
pub mod protocol;
pub mod reconcile;
pub mod settings;
pub mod signature;
pub mod storage;
pub mod synth;

pub use dataset::{Dataset, Record};
pub use error::SyncError;
pub use events::{ChannelSink, EventSink, LogSink, ProgressEvent, RunSummary};
pub use memory::MemoryCanvas;
pub use plugin::Plugin;
pub use protocol::{IncomingMessage, OutgoingMessage};
pub use reconcile::{frame_props, RecordOutcome, RecordState, Reconciler};
pub use settings::{FormSettings, SettingsError, StyleSettings};
pub use signature::signature;
pub use storage::{SettingsStore, STORAGE_KEY};
pub use synth::{plan_lines, LineOutcome, Synthesizer};
