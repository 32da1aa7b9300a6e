//! Font metrics consumed by the line layout.
//!
//! Rasterization lives outside this crate. Layout only needs to measure text,
//! so a font is anything implementing [`FontMetrics`]. Blocks refer to fonts by
//! [`FontId`] and the layout resolves them through a [`FontRegistry`].
//!
//! [`CellFont`] is a ready-made metrics provider for fixed-cell displays: every
//! character is one or two cells wide, following Unicode East Asian Width.

use std::collections::HashMap;

use crate::unicode::{
    WidthMethod, chars_fitting_width, display_width_char_with_method, display_width_with_method,
};

/// Identifier of a registered font.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u16);

/// Pixel measurements of a font.
///
/// Implementations must be deterministic, and `char_count_that_fits` must be
/// monotonic in `budget`.
pub trait FontMetrics {
    /// Width of `text` in pixels.
    fn pixel_width(&self, text: &str) -> u32;

    /// Width of a single character in pixels.
    fn char_pixel_width(&self, c: char) -> u32;

    /// Height of one line of text in pixels.
    fn line_height(&self) -> u32;

    /// Number of leading characters of `text` that fit in `budget` pixels.
    fn char_count_that_fits(&self, text: &str, budget: u32) -> usize {
        let mut used = 0u32;
        let mut count = 0;
        for c in text.chars() {
            used = used.saturating_add(self.char_pixel_width(c));
            if used > budget {
                break;
            }
            count += 1;
        }
        count
    }
}

/// Fixed-cell font: each display cell is `cell_width` pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFont {
    cell_width: u32,
    line_height: u32,
    method: WidthMethod,
}

impl CellFont {
    /// Create a cell font with the default width method.
    #[must_use]
    pub fn new(cell_width: u32, line_height: u32) -> Self {
        Self::with_method(cell_width, line_height, WidthMethod::default())
    }

    /// Create a cell font with an explicit ambiguous-width policy.
    #[must_use]
    pub fn with_method(cell_width: u32, line_height: u32, method: WidthMethod) -> Self {
        Self {
            cell_width,
            line_height,
            method,
        }
    }

    /// Pixels per cell.
    #[must_use]
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }
}

impl FontMetrics for CellFont {
    fn pixel_width(&self, text: &str) -> u32 {
        display_width_with_method(text, self.method) as u32 * self.cell_width
    }

    fn char_pixel_width(&self, c: char) -> u32 {
        display_width_char_with_method(c, self.method) as u32 * self.cell_width
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }

    fn char_count_that_fits(&self, text: &str, budget: u32) -> usize {
        if self.cell_width == 0 {
            return text.chars().count();
        }
        chars_fitting_width(text, (budget / self.cell_width) as usize, self.method)
    }
}

/// Fonts available to the layout, keyed by id.
#[derive(Default)]
pub struct FontRegistry {
    fonts: HashMap<FontId, Box<dyn FontMetrics>>,
}

impl FontRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding a single font under `FontId::default()`.
    #[must_use]
    pub fn with_font(font: impl FontMetrics + 'static) -> Self {
        let mut registry = Self::new();
        registry.insert(FontId::default(), font);
        registry
    }

    /// Register (or replace) a font.
    pub fn insert(&mut self, id: FontId, font: impl FontMetrics + 'static) {
        self.fonts.insert(id, Box::new(font));
    }

    /// Look up a font.
    #[must_use]
    pub fn get(&self, id: FontId) -> Option<&dyn FontMetrics> {
        self.fonts.get(&id).map(|font| &**font)
    }

    /// Number of registered fonts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// True if no font is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.fonts.keys().copied().collect();
        ids.sort();
        f.debug_struct("FontRegistry").field("fonts", &ids).finish()
    }
}
