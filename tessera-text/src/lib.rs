//! # tessera-text
//!
//! Text support for frame sync: font resolution and keyword highlighting.
//!
//! - **`fonts`** — [`FontLoader`], the host font catalog, an LRU front.
//! - **`keywords`** — comma-separated keyword list and first-match lookup.

pub mod fonts;
pub mod keywords;

pub use fonts::{
    ensure_font, CachedFontLoader, FontCatalog, FontError, FontLoader, LoadedFonts,
    DEFAULT_FAMILY, DEFAULT_STYLES,
};
pub use keywords::KeywordList;
