//! Greedy word-wrap of one visual line.
//!
//! A [`TextLine`] is built by walking a running [`BlockCursor`] over the
//! document and taking as many characters as fit a pixel budget. The cursor is
//! left where the next line has to continue.
//!
//! Breaking follows three policies:
//!
//! - prefer the last space in a short look-back window, consuming the space
//!   (and hiding it when it is the first character that did not fit);
//! - with no space nearby, cut mid-word and append `-`, giving up one
//!   character slot for it;
//! - a `Newline` block ends the line once its text is consumed.

use bitflags::bitflags;

use crate::event::{LogLevel, emit_log};
use crate::font::{FontMetrics, FontRegistry};

use super::block::BlockEnd;
use super::block_cursor::{BlockCursor, Step};
use super::document::TextDocument;
use super::format::TextFormat;

/// How far back from the break point a space is looked for.
pub const WORD_DETECTION_RANGE: usize = 10;

bitflags! {
    /// Why and how a line was broken.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LineBreak: u8 {
        /// Cut mid-word, `-` appended.
        const DASH = 1;
        /// Broken at a space that is consumed but not drawn.
        const TRIMMED_SPACE = 1 << 1;
        /// Ended by a block's newline.
        const HARD = 1 << 2;
    }
}

/// Result of [`calculate_signs_to_show`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignsToShow {
    /// Characters consumed from the text.
    pub count: usize,
    pub flags: LineBreak,
}

/// Decide how many characters of `text` go on the current line.
///
/// When a break is needed the line ends after the last space among the fitting
/// characters and the one just past them. Only a space in that last slot, the
/// first character that did not fit, is consumed without being drawn and
/// flagged [`LineBreak::TRIMMED_SPACE`]. A space that still fits is drawn as
/// the last character of the line.
#[must_use]
pub fn calculate_signs_to_show(
    font: &dyn FontMetrics,
    text: &str,
    remaining_width: u32,
) -> SignsToShow {
    let chars: Vec<char> = text.chars().collect();
    let fit = font
        .char_count_that_fits(text, remaining_width)
        .min(chars.len());
    let mut signs = SignsToShow {
        count: fit,
        flags: LineBreak::empty(),
    };
    if fit >= chars.len() {
        return signs;
    }

    let window_end = fit + 1;
    let window_start = window_end.saturating_sub(WORD_DETECTION_RANGE);
    let window = &chars[window_start..window_end];
    let space = window
        .iter()
        .rposition(|&c| c == ' ')
        .map(|i| i + window_start);
    let newline = window.contains(&'\n');

    match space {
        Some(space) if !newline => {
            signs.count = space + 1;
            if space == fit {
                signs.flags |= LineBreak::TRIMMED_SPACE;
            }
        }
        _ if fit > 1 => {
            signs.count = fit - 1;
            signs.flags |= LineBreak::DASH;
        }
        _ => {}
    }
    signs
}

/// A positioned run of text with one format.
///
/// Inside a [`TextLine`] the coordinates are relative to the line origin;
/// [`Lines::fragments`](super::Lines::fragments) hands them out absolute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawFragment {
    /// Text to draw: trimmed space removed, dash appended.
    pub text: String,
    pub format: TextFormat,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Document characters this fragment consumed.
    pub len: usize,
}

/// One visual line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLine {
    fragments: Vec<DrawFragment>,
    shown_letter_count: usize,
    width_used: u32,
    height_used: u32,
    end: BlockEnd,
    flags: LineBreak,
    line_end: bool,
    start: BlockCursor,
    resume: BlockCursor,
    x: i32,
    y: i32,
}

impl TextLine {
    fn empty_at(start: BlockCursor) -> Self {
        Self {
            fragments: Vec::new(),
            shown_letter_count: 0,
            width_used: 0,
            height_used: 0,
            end: BlockEnd::None,
            flags: LineBreak::empty(),
            line_end: false,
            start,
            resume: start,
            x: 0,
            y: 0,
        }
    }

    /// Lay out one line starting at `cursor`, leaving `cursor` where the next
    /// line begins.
    pub fn build(
        doc: &TextDocument,
        fonts: &FontRegistry,
        cursor: &mut BlockCursor,
        max_width: u32,
    ) -> Self {
        let mut line = Self::empty_at(*cursor);

        loop {
            if !cursor.is_valid() || doc.block_count() == 0 || cursor.at_end(doc) {
                line.line_end = true;
                break;
            }

            let text = cursor.text(doc);
            if text.is_empty() {
                if cursor.step_forward(doc) == Step::Stuck {
                    line.line_end = true;
                    break;
                }
                line.resume = *cursor;
                continue;
            }

            let Some(block) = cursor.current(doc) else {
                line.line_end = true;
                break;
            };
            let format = *block.format();
            let block_end = block.end();
            let Some(font) = fonts.get(format.font) else {
                emit_log(
                    LogLevel::Error,
                    &format!("no metrics for font {}, line stopped", format.font.0),
                );
                line.line_end = true;
                break;
            };

            let remaining = max_width.saturating_sub(line.width_used);
            let first = text.chars().next().map_or(0, |c| font.char_pixel_width(c));
            if remaining < first {
                break;
            }

            let mut signs = calculate_signs_to_show(font, &text, remaining);
            if signs.count == 0 {
                line.push_fragment(String::new(), format, 0, font.line_height(), 0);
                line.resume = *cursor;
                break;
            }

            let mut shown = visible_part(&text, signs);
            // A dash wider than the character it replaced must not overflow
            while signs.flags.contains(LineBreak::DASH)
                && signs.count > 1
                && font.pixel_width(&shown) > remaining
            {
                signs.count -= 1;
                shown = visible_part(&text, signs);
            }

            let width = font.pixel_width(&shown);
            line.push_fragment(shown, format, width, font.line_height(), signs.count);
            cursor.advance(doc, signs.count);
            line.resume = *cursor;
            line.flags = signs.flags;

            let text_len = text.chars().count();
            let newline_consumed = block_end == BlockEnd::Newline && signs.count == text_len;
            if newline_consumed {
                line.end = BlockEnd::Newline;
                line.flags |= LineBreak::HARD;
                break;
            }
            if signs.flags.contains(LineBreak::TRIMMED_SPACE) || signs.count < text_len {
                break;
            }
        }

        line.align_fragments_to_bottom();
        line
    }

    fn push_fragment(
        &mut self,
        text: String,
        format: TextFormat,
        width: u32,
        height: u32,
        len: usize,
    ) {
        self.fragments.push(DrawFragment {
            text,
            format,
            x: self.width_used as i32,
            y: 0,
            width,
            height,
            len,
        });
        self.width_used += width;
        self.height_used = self.height_used.max(height);
        self.shown_letter_count += len;
    }

    fn align_fragments_to_bottom(&mut self) {
        let height = self.height_used;
        for fragment in &mut self.fragments {
            fragment.y = height.saturating_sub(fragment.height) as i32;
        }
    }

    /// Document characters on this line, a consumed newline or space included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shown_letter_count
    }

    /// True if the line consumed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown_letter_count == 0
    }

    /// Drawn width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width_used
    }

    /// Height in pixels: the tallest fragment.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height_used
    }

    pub(crate) fn set_height(&mut self, height: u32) {
        self.height_used = height;
    }

    /// `Newline` if the line was ended by a hard break.
    #[must_use]
    pub fn end(&self) -> BlockEnd {
        self.end
    }

    /// Break flags of the last fragment.
    #[must_use]
    pub fn flags(&self) -> LineBreak {
        self.flags
    }

    /// True if the document ran out while building this line.
    #[must_use]
    pub fn is_line_end(&self) -> bool {
        self.line_end
    }

    /// Where this line starts in the document.
    #[must_use]
    pub fn start(&self) -> BlockCursor {
        self.start
    }

    /// Where the next line continues.
    #[must_use]
    pub fn resume(&self) -> BlockCursor {
        self.resume
    }

    /// Fragments, relative to the line origin.
    #[must_use]
    pub fn fragments(&self) -> &[DrawFragment] {
        &self.fragments
    }

    /// Drawn text of the whole line.
    #[must_use]
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Line origin.
    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub(crate) fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Horizontal pixel offset of column `col` from the line origin.
    #[must_use]
    pub fn x_of_column(&self, fonts: &FontRegistry, col: usize) -> u32 {
        let mut remaining = col;
        for fragment in &self.fragments {
            if remaining < fragment.len {
                let Some(font) = fonts.get(fragment.format.font) else {
                    return fragment.x as u32;
                };
                let prefix: String = fragment.text.chars().take(remaining).collect();
                return fragment.x as u32 + font.pixel_width(&prefix);
            }
            remaining -= fragment.len;
        }
        self.width_used
    }
}

/// Text drawn for `signs.count` consumed characters of `text`.
fn visible_part(text: &str, signs: SignsToShow) -> String {
    let mut shown: String = text.chars().take(signs.count).collect();
    if shown.ends_with('\n') {
        shown.pop();
    }
    if signs.flags.contains(LineBreak::TRIMMED_SPACE) && shown.ends_with(' ') {
        shown.pop();
    }
    if signs.flags.contains(LineBreak::DASH) {
        shown.push('-');
    }
    shown
}
