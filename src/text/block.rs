//! A run of text sharing one format.

use std::fmt;

use super::format::TextFormat;
use super::rope::TextRope;

/// How a block terminates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockEnd {
    /// The next block continues on the same line.
    #[default]
    None,
    /// Hard line break after the block's text.
    Newline,
}

/// Contiguous text with one [`TextFormat`] and one end marker.
///
/// Lengths count characters. A `Newline` block counts its break as one extra
/// character, so `len()` of `"abc"` + `Newline` is 4 while `text_len()` is 3.
#[derive(Clone, PartialEq, Eq)]
pub struct TextBlock {
    text: TextRope,
    format: TextFormat,
    end: BlockEnd,
}

impl TextBlock {
    /// Create a block ending in [`BlockEnd::None`].
    #[must_use]
    pub fn new(text: &str, format: TextFormat) -> Self {
        Self::with_end(text, format, BlockEnd::None)
    }

    /// Create a block with an explicit end marker.
    #[must_use]
    pub fn with_end(text: &str, format: TextFormat, end: BlockEnd) -> Self {
        Self {
            text: TextRope::from_str(text),
            format,
            end,
        }
    }

    pub(crate) fn from_rope(text: TextRope, format: TextFormat, end: BlockEnd) -> Self {
        Self { text, format, end }
    }

    /// Empty block ending in [`BlockEnd::None`].
    #[must_use]
    pub fn empty(format: TextFormat) -> Self {
        Self::new("", format)
    }

    /// Visible text, without the trailing newline.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Visible text from char `pos` on, plus `\n` for a `Newline` block.
    #[must_use]
    pub fn text_from(&self, pos: usize) -> String {
        let mut text = self.text.slice_to_string(pos..);
        if self.end == BlockEnd::Newline && pos <= self.text_len() {
            text.push('\n');
        }
        text
    }

    /// Block format.
    #[must_use]
    pub fn format(&self) -> &TextFormat {
        &self.format
    }

    /// Replace the block format.
    pub fn set_format(&mut self, format: TextFormat) {
        self.format = format;
    }

    /// End marker.
    #[must_use]
    pub fn end(&self) -> BlockEnd {
        self.end
    }

    /// Change the end marker.
    pub fn set_end(&mut self, end: BlockEnd) {
        self.end = end;
    }

    /// Length in characters, the newline included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text_len() + usize::from(self.end == BlockEnd::Newline)
    }

    /// Number of visible characters.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.text.len_chars()
    }

    /// No visible text and no line break.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.end == BlockEnd::None
    }

    /// Visible character at `pos`.
    #[must_use]
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.text.char_at(pos)
    }

    /// Insert a character into the visible text.
    pub fn insert_char(&mut self, pos: usize, c: char) {
        self.text.insert_char(pos, c);
    }

    /// Remove a visible character.
    pub fn remove_char(&mut self, pos: usize) -> Option<char> {
        self.text.remove_char(pos)
    }

    /// Keep only the first `len` visible characters.
    pub fn truncate(&mut self, len: usize) {
        self.text.truncate(len);
    }

    /// Split the text at `pos`; the tail keeps this block's format.
    pub(crate) fn split_text(&mut self, pos: usize) -> TextRope {
        self.text.split_off(pos)
    }
}

impl fmt::Debug for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBlock")
            .field("text", &self.text)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}
