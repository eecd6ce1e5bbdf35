//! # tessera-core
//!
//! Canvas document model shared by every Tessera crate.
//!
//! ```text
//! Document
//!   └── Page (named, e.g. "Translations")
//!         └── FrameNode (one per record key, auto-height vertical stack)
//!               ├── plugin data ("signature" → opaque string)
//!               └── TextNode × 0..=2 (primary, secondary)
//! ```
//!
//! The reconciler never touches these types directly; it goes through the
//! [`Canvas`] trait so the host document can be swapped for a fake.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod canvas;

pub use canvas::{Canvas, CanvasError};

/// Identifier of any node (page, frame or text line) in the document.
pub type NodeId = Uuid;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

// ── Paint ───────────────────────────────────────────────────────────

/// Solid RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 1.0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive). Returns `None` for
    /// anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 17;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb` form (alpha dropped).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ── Text ────────────────────────────────────────────────────────────

/// A font family + style pair, e.g. `Poppins` / `SemiBold`.
///
/// Styles are matched exactly; the host exposes weights as style names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl std::fmt::Display for FontName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Every font-dependent property of a text line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontName,
    pub font_size: f32,
    /// Absolute line height in pixels.
    pub line_height: f32,
    pub fill: Color,
    pub align: TextAlign,
}

/// A single line of styled text inside a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub id: NodeId,
    pub characters: String,
    pub style: TextStyle,
}

impl TextNode {
    pub fn new(characters: impl Into<String>, style: TextStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            characters: characters.into(),
            style,
        }
    }

    /// Number of rendered lines; explicit newlines only, no wrapping.
    pub fn line_count(&self) -> usize {
        self.characters.lines().count().max(1)
    }
}

// ── Frames ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    None,
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisSizing {
    #[default]
    Fixed,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisAlign {
    #[default]
    Min,
    Center,
    Max,
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Layout and paint properties of a frame container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameProps {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Used as-is when the primary axis is fixed, otherwise recomputed.
    pub height: f32,
    pub layout_mode: LayoutMode,
    pub primary_sizing: AxisSizing,
    pub counter_sizing: AxisSizing,
    pub primary_align: AxisAlign,
    pub counter_align: AxisAlign,
    pub item_spacing: f32,
    pub padding: Padding,
    pub fill: Color,
}

impl Default for FrameProps {
    /// A freshly created frame: 100×100, white, no auto layout.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            layout_mode: LayoutMode::None,
            primary_sizing: AxisSizing::Fixed,
            counter_sizing: AxisSizing::Fixed,
            primary_align: AxisAlign::Min,
            counter_align: AxisAlign::Min,
            item_spacing: 0.0,
            padding: Padding::default(),
            fill: Color::WHITE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameNode {
    pub id: NodeId,
    pub name: String,
    pub props: FrameProps,
    /// Last computed bounds (height follows auto layout).
    pub bounds: Rect,
    pub children: Vec<TextNode>,
    /// Opaque string metadata that survives across runs.
    pub plugin_data: BTreeMap<String, String>,
}

impl FrameNode {
    pub fn new(name: impl Into<String>) -> Self {
        let props = FrameProps::default();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bounds: Rect {
                x: props.x,
                y: props.y,
                width: props.width,
                height: props.height,
            },
            props,
            children: Vec::new(),
            plugin_data: BTreeMap::new(),
        }
    }

    pub fn child(&self, id: NodeId) -> Option<&TextNode> {
        self.children.iter().find(|c| c.id == id)
    }
}

// ── Pages & document ────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: NodeId,
    pub name: String,
    pub frames: Vec<FrameNode>,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            frames: Vec::new(),
        }
    }

    /// First frame carrying `name`.
    pub fn frame_named(&self, name: &str) -> Option<&FrameNode> {
        self.frames.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub version: u32,
    pub pages: Vec<Page>,
    pub current_page: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with a single default page.
    pub fn new() -> Self {
        let page = Page::new("Page 1");
        Self {
            id: Uuid::new_v4(),
            version: 1,
            current_page: Some(page.id),
            pages: vec![page],
        }
    }

    pub fn page(&self, id: NodeId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: NodeId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub fn page_named(&self, name: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.name == name)
    }

    /// Look up a frame on any page.
    pub fn frame(&self, id: NodeId) -> Option<&FrameNode> {
        self.pages
            .iter()
            .flat_map(|p| p.frames.iter())
            .find(|f| f.id == id)
    }

    pub fn frame_mut(&mut self, id: NodeId) -> Option<&mut FrameNode> {
        self.pages
            .iter_mut()
            .flat_map(|p| p.frames.iter_mut())
            .find(|f| f.id == id)
    }

    /// The frame owning text line `line`.
    pub fn frame_of_line_mut(&mut self, line: NodeId) -> Option<&mut FrameNode> {
        self.pages
            .iter_mut()
            .flat_map(|p| p.frames.iter_mut())
            .find(|f| f.children.iter().any(|c| c.id == line))
    }

    pub fn frame_count(&self) -> usize {
        self.pages.iter().map(|p| p.frames.len()).sum()
    }
}
