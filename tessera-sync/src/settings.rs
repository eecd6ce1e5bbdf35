//! Style settings: the raw settings form and its validated snapshot.
//!
//! The UI sends every field as a string ([`FormSettings`]). Validation turns
//! it into [`StyleSettings`], the immutable value the reconciler consumes.
//! Numeric fields may be left empty and fall back to fixed defaults at
//! render time.

use serde::{Deserialize, Serialize};
use tessera_core::Color;
use thiserror::Error;

/// Primary and secondary font size when the field is empty.
pub const DEFAULT_FONT_SIZE: u32 = 30;
/// Primary and secondary line height when the field is empty.
pub const DEFAULT_LINE_HEIGHT: u32 = 36;
/// Keyword font size when the field is empty.
pub const DEFAULT_KEYWORD_FONT_SIZE: u32 = 20;
pub const DEFAULT_FONT_WEIGHT: &str = "Regular";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Invalid settings: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

/// The settings form exactly as the UI holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSettings {
    pub spreadsheet_tab: String,
    pub data_range: String,
    pub primary_font_size: String,
    pub primary_line_height: String,
    pub primary_font_weight: String,
    pub secondary_font_size: String,
    pub secondary_line_height: String,
    pub secondary_font_weight: String,
    pub background_color: String,
    pub text_color: String,
    pub highlight_keywords: String,
    pub keyword_font_size: String,
    pub keyword_line_height: String,
    pub keyword_font_weight: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            spreadsheet_tab: String::new(),
            data_range: String::new(),
            primary_font_size: String::new(),
            primary_line_height: String::new(),
            primary_font_weight: DEFAULT_FONT_WEIGHT.into(),
            secondary_font_size: String::new(),
            secondary_line_height: String::new(),
            secondary_font_weight: DEFAULT_FONT_WEIGHT.into(),
            background_color: "#750000".into(),
            text_color: "#ffffff".into(),
            highlight_keywords: String::new(),
            keyword_font_size: String::new(),
            keyword_line_height: String::new(),
            keyword_font_weight: DEFAULT_FONT_WEIGHT.into(),
        }
    }
}

impl FormSettings {
    /// Check every field and build the style snapshot.
    ///
    /// All problems are collected, not just the first.
    pub fn validate(&self) -> Result<StyleSettings, SettingsError> {
        let mut problems = Vec::new();

        if self.spreadsheet_tab.trim().is_empty() {
            problems.push("Tab name required".to_string());
        }
        if self.data_range.trim().is_empty() {
            problems.push("Range required".to_string());
        }

        let mut color = |field: &str, value: &str| {
            if Color::from_hex(value).is_none() {
                problems.push(format!("Invalid hex color for {field}"));
            }
        };
        color("backgroundColor", &self.background_color);
        color("textColor", &self.text_color);

        let primary_font_size = leading_int(&self.primary_font_size);
        let primary_line_height = leading_int(&self.primary_line_height);
        let secondary_font_size = leading_int(&self.secondary_font_size);
        let secondary_line_height = leading_int(&self.secondary_line_height);
        let keyword_font_size = leading_int(&self.keyword_font_size);
        let keyword_line_height = leading_int(&self.keyword_line_height);

        if !problems.is_empty() {
            return Err(SettingsError::Invalid(problems));
        }

        let weight = |value: &str| {
            let value = value.trim();
            if value.is_empty() {
                DEFAULT_FONT_WEIGHT.to_string()
            } else {
                value.to_string()
            }
        };

        Ok(StyleSettings {
            background_color: self.background_color.clone(),
            text_color: self.text_color.clone(),
            primary: LineStyle {
                font_size: primary_font_size,
                line_height: primary_line_height,
                font_weight: weight(&self.primary_font_weight),
            },
            secondary: LineStyle {
                font_size: secondary_font_size,
                line_height: secondary_line_height,
                font_weight: weight(&self.secondary_font_weight),
            },
            keyword: KeywordStyle {
                keywords: self.highlight_keywords.clone(),
                font_size: keyword_font_size,
                line_height: keyword_line_height,
                font_weight: weight(&self.keyword_font_weight),
            },
        })
    }
}

/// Size and weight of one of the two text lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStyle {
    pub font_size: Option<u32>,
    pub line_height: Option<u32>,
    pub font_weight: String,
}

impl LineStyle {
    pub fn font_size_px(&self) -> f32 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE) as f32
    }

    pub fn line_height_px(&self) -> f32 {
        self.line_height.unwrap_or(DEFAULT_LINE_HEIGHT) as f32
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            font_size: None,
            line_height: None,
            font_weight: DEFAULT_FONT_WEIGHT.into(),
        }
    }
}

/// Style applied to lines containing a highlight keyword.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordStyle {
    /// Comma-separated keyword list, as typed.
    pub keywords: String,
    pub font_size: Option<u32>,
    /// `None` keeps the line's own line height.
    pub line_height: Option<u32>,
    pub font_weight: String,
}

impl KeywordStyle {
    pub fn font_size_px(&self) -> f32 {
        self.font_size.unwrap_or(DEFAULT_KEYWORD_FONT_SIZE) as f32
    }
}

/// Validated, immutable style snapshot for one run.
///
/// Adding a field here means adding it to [`crate::signature`] as well,
/// otherwise changing it will not refresh existing frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSettings {
    pub background_color: String,
    pub text_color: String,
    pub primary: LineStyle,
    pub secondary: LineStyle,
    pub keyword: KeywordStyle,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            background_color: "#750000".into(),
            text_color: "#ffffff".into(),
            primary: LineStyle::default(),
            secondary: LineStyle::default(),
            keyword: KeywordStyle {
                font_weight: DEFAULT_FONT_WEIGHT.into(),
                ..KeywordStyle::default()
            },
        }
    }
}

impl StyleSettings {
    pub fn background(&self) -> Result<Color, SettingsError> {
        parse_color("backgroundColor", &self.background_color)
    }

    pub fn text_fill(&self) -> Result<Color, SettingsError> {
        parse_color("textColor", &self.text_color)
    }
}

/// Leading decimal digits of `value`, so `"36px"` reads as 36.
///
/// Anything without a leading number (empty, `"abc"`, negative) is `None`
/// and renders with the default.
fn leading_int(value: &str) -> Option<u32> {
    let value = value.trim();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

fn parse_color(field: &str, value: &str) -> Result<Color, SettingsError> {
    Color::from_hex(value)
        .ok_or_else(|| SettingsError::Invalid(vec![format!("Invalid hex color for {field}")]))
}
