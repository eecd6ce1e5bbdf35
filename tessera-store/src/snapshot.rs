//! File-backed document snapshots.
//!
//! A snapshot is the whole canvas [`Document`] (pages, frames, text lines and
//! their plugin data) bincode-encoded and LZ4-compressed:
//!
//! ```text
//! ┌────────┬─────────────┬───────────────────────────────┐
//! │ magic  │ orig size   │ LZ4 block (bincode Document)  │
//! │ "TSR1" │ u32 LE      │ variable                      │
//! └────────┴─────────────┴───────────────────────────────┘
//! ```
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-save leaves the previous snapshot intact.

use std::fs;
use std::path::{Path, PathBuf};

use tessera_core::Document;

use crate::StoreError;

const MAGIC: &[u8; 4] = b"TSR1";

/// Sizes of the last written snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotStats {
    /// Encoded document size in bytes
    pub original_size: u64,
    /// Bytes written to disk, header included
    pub stored_size: u64,
}

impl SnapshotStats {
    pub fn compression_ratio(&self) -> f64 {
        if self.stored_size == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.stored_size as f64
    }
}

/// Snapshot file holding one document.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Persist `doc`, replacing any previous snapshot.
    pub fn save(&self, doc: &Document) -> Result<SnapshotStats, StoreError> {
        let encoded = bincode::serde::encode_to_vec(doc, bincode::config::standard())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let compressed = lz4_flex::compress_prepend_size(&encoded);

        let mut bytes = Vec::with_capacity(MAGIC.len() + compressed.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&compressed);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;

        let stats = SnapshotStats {
            original_size: encoded.len() as u64,
            stored_size: bytes.len() as u64,
        };
        log::debug!(
            "DocumentStore: saved {} ({} -> {} bytes)",
            self.path.display(),
            stats.original_size,
            stats.stored_size
        );
        Ok(stats)
    }

    /// Read the snapshot, or `None` if none was saved yet.
    pub fn load(&self) -> Result<Option<Document>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let payload = bytes
            .strip_prefix(MAGIC.as_slice())
            .ok_or_else(|| StoreError::Corrupt(format!("{}: bad header", self.path.display())))?;
        let encoded = lz4_flex::decompress_size_prepended(payload)
            .map_err(|e| StoreError::Compression(e.to_string()))?;
        let (doc, _) = bincode::serde::decode_from_slice(&encoded, bincode::config::standard())
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        Ok(Some(doc))
    }

    /// Read the snapshot, falling back to a fresh document.
    pub fn load_or_default(&self) -> Result<Document, StoreError> {
        Ok(self.load()?.unwrap_or_default())
    }
}
