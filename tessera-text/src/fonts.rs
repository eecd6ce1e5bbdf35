//! Font resolution — making a family/style pair usable before text edits.
//!
//! The host refuses to change characters, size or font of a text node until
//! the font involved has been loaded. [`FontLoader`] is that load step;
//! callers await it every time they are about to touch text.
//!
//! ## Architecture
//!
//! ```text
//! ensure_font(family, style)
//!     │
//!     ▼
//! CachedFontLoader (optional, LRU)  ──miss──▸  FontCatalog
//!                                                 ├── families: HashMap<String, Vec<String>>
//!                                                 └── loaded:   LoadedFonts (shared with the canvas)
//! ```

use async_trait::async_trait;
use lru::LruCache;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tessera_core::FontName;
use thiserror::Error;

/// Family used for every text line the sync produces.
pub const DEFAULT_FAMILY: &str = "Poppins";

/// Styles shipped with the default family.
pub const DEFAULT_STYLES: &[&str] = &[
    "Thin",
    "ExtraLight",
    "Light",
    "Regular",
    "Medium",
    "SemiBold",
    "Bold",
    "ExtraBold",
    "Black",
    "Italic",
    "Bold Italic",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Font family \"{0}\" is not available")]
    FamilyNotFound(String),
    #[error("Font style \"{style}\" is not available for \"{family}\"")]
    StyleNotFound { family: String, style: String },
    #[error("Font loading failed for \"{font}\": {reason}")]
    LoadFailed { font: FontName, reason: String },
}

/// Loads fonts into the host so text using them can be edited.
///
/// Loading is idempotent: loading an already loaded font succeeds again.
#[async_trait]
pub trait FontLoader: Send + Sync {
    async fn load_font(&self, font: &FontName) -> Result<(), FontError>;
}

#[async_trait]
impl<L: FontLoader + ?Sized> FontLoader for Arc<L> {
    async fn load_font(&self, font: &FontName) -> Result<(), FontError> {
        (**self).load_font(font).await
    }
}

/// Load `family`/`style` and hand back the resolved [`FontName`].
pub async fn ensure_font<L: FontLoader + ?Sized>(
    loader: &L,
    family: &str,
    style: &str,
) -> Result<FontName, FontError> {
    let font = FontName::new(family, style);
    loader.load_font(&font).await?;
    Ok(font)
}

// ── Loaded-font set ─────────────────────────────────────────────────

/// Set of fonts the host currently has loaded.
///
/// Cloned handles share the same set, so a canvas can check what a loader
/// has made available.
#[derive(Clone, Debug, Default)]
pub struct LoadedFonts {
    inner: Arc<RwLock<HashSet<FontName>>>,
}

impl LoadedFonts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, font: &FontName) -> bool {
        self.inner
            .read()
            .map(|set| set.contains(font))
            .unwrap_or(false)
    }

    pub fn mark_loaded(&self, font: FontName) {
        if let Ok(mut set) = self.inner.write() {
            set.insert(font);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|set| set.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Catalog ─────────────────────────────────────────────────────────

/// The fonts a host can load, keyed by lowercase family name.
///
/// Style names are matched exactly (`"SemiBold"`, not `"semibold"`).
pub struct FontCatalog {
    families: HashMap<String, Vec<String>>,
    loaded: LoadedFonts,
    load_calls: AtomicU64,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FontCatalog {
    /// A catalog with nothing in it.
    pub fn empty() -> Self {
        Self {
            families: HashMap::new(),
            loaded: LoadedFonts::new(),
            load_calls: AtomicU64::new(0),
        }
    }

    /// A catalog holding [`DEFAULT_FAMILY`] in all [`DEFAULT_STYLES`].
    pub fn with_defaults() -> Self {
        let mut catalog = Self::empty();
        for style in DEFAULT_STYLES {
            catalog.register(DEFAULT_FAMILY, *style);
        }
        catalog
    }

    /// Make `family`/`style` loadable.
    pub fn register(&mut self, family: &str, style: impl Into<String>) {
        let style = style.into();
        let styles = self.families.entry(family.to_lowercase()).or_default();
        if !styles.contains(&style) {
            styles.push(style);
        }
    }

    /// Parse a `Family:Style` spec, e.g. `"Inter:Bold"`.
    pub fn register_spec(&mut self, spec: &str) -> Result<(), FontError> {
        let (family, style) = spec
            .split_once(':')
            .map(|(f, s)| (f.trim(), s.trim()))
            .filter(|(f, s)| !f.is_empty() && !s.is_empty())
            .ok_or_else(|| FontError::LoadFailed {
                font: FontName::new(spec, ""),
                reason: "expected Family:Style".into(),
            })?;
        self.register(family, style);
        Ok(())
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(&family.to_lowercase())
    }

    pub fn styles(&self, family: &str) -> Option<&[String]> {
        self.families.get(&family.to_lowercase()).map(|v| v.as_slice())
    }

    /// Handle on the set of fonts this catalog has loaded.
    pub fn loaded(&self) -> LoadedFonts {
        self.loaded.clone()
    }

    /// Number of `load_font` calls served, successful or not.
    pub fn load_calls(&self) -> u64 {
        self.load_calls.load(Ordering::Relaxed)
    }

    fn check(&self, font: &FontName) -> Result<(), FontError> {
        let styles = self
            .families
            .get(&font.family.to_lowercase())
            .ok_or_else(|| FontError::FamilyNotFound(font.family.clone()))?;
        if styles.iter().any(|s| s == &font.style) {
            Ok(())
        } else {
            Err(FontError::StyleNotFound {
                family: font.family.clone(),
                style: font.style.clone(),
            })
        }
    }
}

#[async_trait]
impl FontLoader for FontCatalog {
    async fn load_font(&self, font: &FontName) -> Result<(), FontError> {
        self.load_calls.fetch_add(1, Ordering::Relaxed);
        self.check(font)?;
        self.loaded.mark_loaded(font.clone());
        log::trace!("FontCatalog: loaded {font}");
        Ok(())
    }
}

impl fmt::Display for FontCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: usize = self.families.values().map(Vec::len).sum();
        write!(
            f,
            "FontCatalog({} families, {} faces, {} loaded)",
            self.families.len(),
            faces,
            self.loaded.len(),
        )
    }
}

// ── LRU front ───────────────────────────────────────────────────────

/// Remembers recently loaded fonts and skips the inner loader for them.
///
/// Failures are never cached, so a missing font keeps failing.
pub struct CachedFontLoader<L> {
    inner: L,
    cache: Mutex<LruCache<FontName, ()>>,
}

impl<L: FontLoader> CachedFontLoader<L> {
    pub fn new(inner: L, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    fn is_cached(&self, font: &FontName) -> bool {
        self.cache
            .lock()
            .map(|mut cache| cache.get(font).is_some())
            .unwrap_or(false)
    }
}

#[async_trait]
impl<L: FontLoader> FontLoader for CachedFontLoader<L> {
    async fn load_font(&self, font: &FontName) -> Result<(), FontError> {
        if self.is_cached(font) {
            return Ok(());
        }
        self.inner.load_font(font).await?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(font.clone(), ());
        }
        Ok(())
    }
}
