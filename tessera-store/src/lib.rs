//! # tessera-store — persistence between frame sync runs
//!
//! ```text
//! ┌──────────────┐   save/load   ┌────────────────────────────┐
//! │ MemoryCanvas │ ────────────► │ DocumentStore  (doc.tsr)   │
//! │ (Document)   │               │ bincode + LZ4 snapshot     │
//! └──────────────┘               └────────────────────────────┘
//! ┌──────────────┐  set/get/del  ┌────────────────────────────┐
//! │ Plugin       │ ────────────► │ ClientStorage (<key>.json) │
//! │ (settings)   │               │ one JSON file per key      │
//! └──────────────┘               └────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`snapshot`] — whole-document snapshots; frame signatures live here.
//! - [`client`] — small JSON values, e.g. the saved settings form.

pub mod client;
pub mod snapshot;

pub use client::ClientStorage;
pub use snapshot::{DocumentStore, SnapshotStats};

use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Compression error: {0}")]
    Compression(String),
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}
