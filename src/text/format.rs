//! Per-block text format.

use crate::color::Color;
use crate::font::FontId;

/// Font and color shared by all characters of a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextFormat {
    pub font: FontId,
    pub color: Color,
}

impl TextFormat {
    /// Create a format.
    #[must_use]
    pub fn new(font: FontId, color: Color) -> Self {
        Self { font, color }
    }

    /// Same color, different font.
    #[must_use]
    pub fn with_font(self, font: FontId) -> Self {
        Self { font, ..self }
    }

    /// Same font, different color.
    #[must_use]
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}
