//! Style parameters handed to the document renderer and checked by the font validator.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Page margins
// ────────────────────────────────────────────────────────────────────────────

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top_in: f32,
    pub right_in: f32,
    pub bottom_in: f32,
    pub left_in: f32,
}

impl Margins {
    pub fn uniform(inches: f32) -> Self {
        Self {
            top_in: inches,
            right_in: inches,
            bottom_in: inches,
            left_in: inches,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(0.75)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document style
// ────────────────────────────────────────────────────────────────────────────

/// Font and page options for one rendered document.
///
/// `font_family` is free text so user-chosen fonts reach the validator unchanged;
/// only the standard PDF families are considered ATS-safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyle {
    pub font_family: String,
    pub font_size_pt: f32,
    /// Hex colour of body text, e.g. `#000000`.
    pub color: String,
    pub margins: Margins,
}

impl Default for DocumentStyle {
    /// Helvetica 11pt, black, 0.75" margins.
    fn default() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            font_size_pt: 11.0,
            color: "#000000".to_string(),
            margins: Margins::default(),
        }
    }
}
