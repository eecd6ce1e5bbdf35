//! Content signature of a rendered record.
//!
//! A structural JSON encoding of the trimmed lines plus every style field
//! that changes how a frame looks. Equal signatures mean the frame on the
//! canvas is already up to date; it is the only check the reconciler makes
//! before skipping a record.

use serde_json::json;

use crate::settings::StyleSettings;

/// Fingerprint of `line1`/`line2` rendered with `settings`.
///
/// Surrounding whitespace of either line does not affect the result.
pub fn signature(line1: &str, line2: &str, settings: &StyleSettings) -> String {
    let StyleSettings {
        background_color,
        text_color,
        primary,
        secondary,
        keyword,
    } = settings;

    json!([
        [line1.trim(), line2.trim()],
        primary.font_size,
        primary.line_height,
        primary.font_weight,
        secondary.font_size,
        secondary.line_height,
        secondary.font_weight,
        background_color,
        text_color,
        keyword.keywords,
        keyword.font_size,
        keyword.line_height,
        keyword.font_weight,
    ])
    .to_string()
}
