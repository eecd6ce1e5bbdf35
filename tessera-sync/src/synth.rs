//! Text line synthesis: deciding a record's lines and writing one of them.
//!
//! [`plan_lines`] turns a record into the 1–2 lines its frame should show.
//! [`Synthesizer`] resolves the style for a line (loading fonts first, then
//! applying the keyword override) and writes it into a new or existing
//! text node.

use tessera_core::{Canvas, Color, FontName, NodeId, TextAlign, TextNode, TextStyle};
use tessera_text::{ensure_font, FontError, FontLoader, KeywordList, DEFAULT_FAMILY};

use crate::dataset::Record;
use crate::error::SyncError;
use crate::settings::{LineStyle, SettingsError, StyleSettings};

/// Family every synthesized line is set in.
pub const FONT_FAMILY: &str = DEFAULT_FAMILY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineRole {
    Primary,
    Secondary,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesiredLine {
    pub content: String,
    pub role: LineRole,
}

/// Lines a frame should hold, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinePlan {
    pub lines: Vec<DesiredLine>,
    /// Both lines were blank; `lines` holds the placeholder.
    pub missing: bool,
}

pub fn placeholder_text(key: &str) -> String {
    format!("{key} translation missing!")
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Non-blank lines of `record`, or a single primary-styled placeholder
/// when both are blank.
pub fn plan_lines(record: &Record) -> LinePlan {
    let lines: Vec<DesiredLine> = [
        (record.primary(), LineRole::Primary),
        (record.secondary(), LineRole::Secondary),
    ]
    .into_iter()
    .filter(|(content, _)| has_text(content))
    .map(|(content, role)| DesiredLine {
        content: content.to_string(),
        role,
    })
    .collect();

    if lines.is_empty() {
        return LinePlan {
            lines: vec![DesiredLine {
                content: placeholder_text(&record.key),
                role: LineRole::Primary,
            }],
            missing: true,
        };
    }
    LinePlan {
        lines,
        missing: false,
    }
}

/// What happened to one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// Existing node already had this content; nothing written.
    Unchanged,
    Updated,
    Appended(NodeId),
}

pub struct Synthesizer<'a, F: FontLoader + ?Sized> {
    fonts: &'a F,
    settings: &'a StyleSettings,
    keywords: KeywordList,
    fill: Color,
}

impl<'a, F: FontLoader + ?Sized> Synthesizer<'a, F> {
    pub fn new(fonts: &'a F, settings: &'a StyleSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            fonts,
            settings,
            keywords: KeywordList::parse(&settings.keyword.keywords),
            fill: settings.text_fill()?,
        })
    }

    fn line_style(&self, role: LineRole) -> &LineStyle {
        match role {
            LineRole::Primary => &self.settings.primary,
            LineRole::Secondary => &self.settings.secondary,
        }
    }

    /// Load the fonts a line needs and compute its final style.
    ///
    /// The keyword font is only loaded when it differs from the base font.
    /// The first keyword found in `content` swaps in the keyword font, size
    /// and (if set) line height.
    pub async fn resolve_style(&self, content: &str, role: LineRole) -> Result<TextStyle, FontError> {
        let base = self.line_style(role);
        let keyword = &self.settings.keyword;

        let base_font = ensure_font(self.fonts, FONT_FAMILY, &base.font_weight).await?;
        let keyword_font = FontName::new(FONT_FAMILY, keyword.font_weight.as_str());
        if keyword_font != base_font {
            ensure_font(self.fonts, &keyword_font.family, &keyword_font.style).await?;
        }

        let mut style = TextStyle {
            font: base_font,
            font_size: base.font_size_px(),
            line_height: base.line_height_px(),
            fill: self.fill,
            align: TextAlign::Center,
        };

        if let Some(term) = self.keywords.first_match(content) {
            log::trace!("keyword \"{term}\" matched in {content:?}");
            style.font = keyword_font;
            style.font_size = keyword.font_size_px();
            if let Some(line_height) = keyword.line_height {
                style.line_height = line_height as f32;
            }
        }
        Ok(style)
    }

    /// Write `line` into `existing`, or append it to `container`.
    ///
    /// An existing node whose characters already equal the content is left
    /// alone entirely, without loading any font.
    pub async fn synthesize<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        container: NodeId,
        existing: Option<&TextNode>,
        line: &DesiredLine,
    ) -> Result<LineOutcome, SyncError> {
        if let Some(node) = existing {
            if node.characters == line.content {
                return Ok(LineOutcome::Unchanged);
            }
        }

        let style = self.resolve_style(&line.content, line.role).await?;
        match existing {
            Some(node) => {
                canvas.update_text_line(node.id, &line.content, &style)?;
                Ok(LineOutcome::Updated)
            }
            None => {
                let id = canvas.append_text_line(container, &line.content, &style)?;
                Ok(LineOutcome::Appended(id))
            }
        }
    }
}
