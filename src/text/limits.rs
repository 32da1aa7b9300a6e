//! Limits on how much text an editor accepts.
//!
//! Checks never touch the live document. Line and size limits lay out a copy
//! with the pending addition applied and measure the result.

use crate::event::{LogLevel, emit_log};
use crate::font::FontRegistry;

use super::block::TextBlock;
use super::block_cursor::BlockCursor;
use super::document::TextDocument;
use super::format::TextFormat;
use super::lines::{LayoutArea, Lines, LinesDrawStop};

/// One limit on the editor content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextLimit {
    /// At most this many characters, newlines included.
    MaxSignsCount(usize),
    /// At most this many laid-out lines.
    MaxLines(usize),
    /// Laid-out text must fit the editor height.
    MaxSize,
}

impl TextLimit {
    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Outcome of a limit check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdditionBound {
    CanAddAll,
    /// Only a prefix of the block fits.
    CanAddPart,
    CantAdd,
}

/// Set of limits, at most one per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextLimits {
    limits: Vec<TextLimit>,
}

impl TextLimits {
    /// No limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a limit, replacing an existing one of the same kind.
    pub fn set(&mut self, limit: TextLimit) {
        match self.limits.iter_mut().find(|l| l.same_kind(&limit)) {
            Some(existing) => *existing = limit,
            None => self.limits.push(limit),
        }
    }

    /// Remove all limits.
    pub fn clear(&mut self) {
        self.limits.clear();
    }

    /// True if nothing is limited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Iterate the limits in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TextLimit> {
        self.limits.iter()
    }
}

impl FromIterator<TextLimit> for TextLimits {
    fn from_iter<I: IntoIterator<Item = TextLimit>>(iter: I) -> Self {
        let mut limits = Self::new();
        for limit in iter {
            limits.set(limit);
        }
        limits
    }
}

/// Everything a limit check needs to know about the editor.
pub struct LimitContext<'a> {
    pub document: &'a TextDocument,
    pub fonts: &'a FontRegistry,
    pub cursor: BlockCursor,
    pub format: TextFormat,
    /// Text area without padding and cursor.
    pub max_width: u32,
    pub max_height: u32,
    pub empty_line_height: u32,
}

impl LimitContext<'_> {
    fn pre_draw(&self, document: &TextDocument) -> Lines {
        let mut lines = Lines::new();
        lines.draw(
            document,
            self.fonts,
            LayoutArea::unbounded_height(self.max_width),
            self.empty_line_height,
        );
        lines
    }

    fn pre_draw_char(&self, c: char) -> Lines {
        let mut copy = self.document.clone();
        let mut cursor = self.cursor;
        if cursor.add_char(&mut copy, c, self.format).is_err() {
            emit_log(LogLevel::Warn, "limit check could not place the character");
        }
        self.pre_draw(&copy)
    }

    fn pre_draw_block(&self, block: &TextBlock) -> Lines {
        let mut copy = self.document.clone();
        let mut cursor = BlockCursor::begin(&copy);
        cursor.add_text_block(&mut copy, block.clone());
        self.pre_draw(&copy)
    }

    fn fits_height(&self, lines: &Lines) -> bool {
        lines.stop() != LinesDrawStop::OutOfSpace && lines.lines_height() <= self.max_height
    }

    /// May `c` be inserted at the cursor?
    #[must_use]
    pub fn check_char(&self, limits: &TextLimits, c: char) -> AdditionBound {
        for limit in limits.iter() {
            let allowed = match *limit {
                TextLimit::MaxSignsCount(max) => self.document.len() < max,
                TextLimit::MaxLines(max) => self.pre_draw_char(c).len() <= max,
                TextLimit::MaxSize => self.fits_height(&self.pre_draw_char(c)),
            };
            if !allowed {
                emit_log(LogLevel::Info, &format!("{limit:?} reached"));
                return AdditionBound::CantAdd;
            }
        }
        AdditionBound::CanAddAll
    }

    /// How much of `block` may be appended.
    ///
    /// Returns the block to append: the whole block, or the longest prefix
    /// every limit accepts.
    #[must_use]
    pub fn check_block(&self, limits: &TextLimits, block: &TextBlock) -> (AdditionBound, TextBlock) {
        let mut bound = AdditionBound::CanAddAll;
        let mut shortest = block.clone();
        for limit in limits.iter() {
            let (result, part) = match *limit {
                TextLimit::MaxSignsCount(max) => self.check_signs(block, max),
                TextLimit::MaxLines(max) => {
                    self.check_layout(block, |lines| lines.len() <= max)
                }
                TextLimit::MaxSize => self.check_layout(block, |lines| self.fits_height(lines)),
            };
            match result {
                AdditionBound::CantAdd => {
                    emit_log(LogLevel::Info, &format!("{limit:?} reached"));
                    return (AdditionBound::CantAdd, block.clone());
                }
                AdditionBound::CanAddPart => {
                    bound = AdditionBound::CanAddPart;
                    if part.len() < shortest.len() {
                        shortest = part;
                    }
                }
                AdditionBound::CanAddAll => {}
            }
        }
        (bound, shortest)
    }

    fn check_signs(&self, block: &TextBlock, max: usize) -> (AdditionBound, TextBlock) {
        let current = self.document.len();
        if current >= max {
            return (AdditionBound::CantAdd, block.clone());
        }
        if current + block.len() <= max {
            return (AdditionBound::CanAddAll, block.clone());
        }
        (AdditionBound::CanAddPart, prefix(block, max - current))
    }

    fn check_layout<F>(&self, block: &TextBlock, accept: F) -> (AdditionBound, TextBlock)
    where
        F: Fn(&Lines) -> bool,
    {
        let fits_width = |lines: &Lines| lines.stop() != LinesDrawStop::OutOfSpace;
        let lines = self.pre_draw_block(block);
        if !fits_width(&lines) {
            return (AdditionBound::CantAdd, block.clone());
        }
        if accept(&lines) {
            return (AdditionBound::CanAddAll, block.clone());
        }
        for count in (1..=block.text_len()).rev() {
            let part = prefix(block, count);
            if accept(&self.pre_draw_block(&part)) {
                return (AdditionBound::CanAddPart, part);
            }
        }
        (AdditionBound::CantAdd, block.clone())
    }
}

/// First `count` visible characters of `block`, without a line break.
fn prefix(block: &TextBlock, count: usize) -> TextBlock {
    let mut part = TextBlock::new(&block.text(), *block.format());
    part.truncate(count);
    part
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::CellFont;

    fn check_char(text: &str, limits: &TextLimits, c: char) -> AdditionBound {
        let doc = TextDocument::from_text(text, TextFormat::default());
        let fonts = FontRegistry::with_font(CellFont::new(1, 1));
        let ctx = LimitContext {
            document: &doc,
            fonts: &fonts,
            cursor: BlockCursor::end(&doc),
            format: TextFormat::default(),
            max_width: 5,
            max_height: 2,
            empty_line_height: 1,
        };
        ctx.check_char(limits, c)
    }

    fn check_block(text: &str, limits: &TextLimits, block: &str) -> (AdditionBound, String) {
        let doc = TextDocument::from_text(text, TextFormat::default());
        let fonts = FontRegistry::with_font(CellFont::new(1, 1));
        let ctx = LimitContext {
            document: &doc,
            fonts: &fonts,
            cursor: BlockCursor::end(&doc),
            format: TextFormat::default(),
            max_width: 5,
            max_height: 2,
            empty_line_height: 1,
        };
        let (bound, part) = ctx.check_block(limits, &TextBlock::new(block, TextFormat::default()));
        (bound, part.text())
    }

    #[test]
    fn test_set_replaces_same_kind() {
        let mut limits = TextLimits::new();
        limits.set(TextLimit::MaxLines(2));
        limits.set(TextLimit::MaxSize);
        limits.set(TextLimit::MaxLines(4));
        assert_eq!(
            limits.iter().copied().collect::<Vec<_>>(),
            vec![TextLimit::MaxLines(4), TextLimit::MaxSize]
        );
        limits.clear();
        assert!(limits.is_empty());
    }

    #[test]
    fn test_no_limits_accepts() {
        assert_eq!(check_char("abc", &TextLimits::new(), 'x'), AdditionBound::CanAddAll);
    }

    #[test]
    fn test_max_signs_char() {
        let limits: TextLimits = [TextLimit::MaxSignsCount(3)].into_iter().collect();
        assert_eq!(check_char("ab", &limits, 'x'), AdditionBound::CanAddAll);
        assert_eq!(check_char("abc", &limits, 'x'), AdditionBound::CantAdd);
    }

    #[test]
    fn test_max_lines_char() {
        let limits: TextLimits = [TextLimit::MaxLines(1)].into_iter().collect();
        assert_eq!(check_char("abcd", &limits, 'x'), AdditionBound::CanAddAll);
        assert_eq!(check_char("abcde", &limits, 'x'), AdditionBound::CantAdd);
        assert_eq!(check_char("ab", &limits, '\n'), AdditionBound::CantAdd);
    }

    #[test]
    fn test_max_size_char() {
        let limits: TextLimits = [TextLimit::MaxSize].into_iter().collect();
        assert_eq!(check_char("abcde", &limits, 'x'), AdditionBound::CanAddAll);
        assert_eq!(check_char("abcde fghij", &limits, 'x'), AdditionBound::CantAdd);
    }

    #[test]
    fn test_max_signs_block_part() {
        let limits: TextLimits = [TextLimit::MaxSignsCount(5)].into_iter().collect();
        assert_eq!(
            check_block("ab", &limits, "cdefg"),
            (AdditionBound::CanAddPart, "cde".to_string())
        );
        assert_eq!(
            check_block("ab", &limits, "cd"),
            (AdditionBound::CanAddAll, "cd".to_string())
        );
        assert_eq!(check_block("abcde", &limits, "x").0, AdditionBound::CantAdd);
    }

    #[test]
    fn test_max_lines_block_part() {
        let limits: TextLimits = [TextLimit::MaxLines(1)].into_iter().collect();
        assert_eq!(
            check_block("ab", &limits, "cdefgh"),
            (AdditionBound::CanAddPart, "cde".to_string())
        );
    }

    #[test]
    fn test_shortest_part_wins() {
        let limits: TextLimits = [TextLimit::MaxLines(1), TextLimit::MaxSignsCount(3)]
            .into_iter()
            .collect();
        assert_eq!(
            check_block("ab", &limits, "cdefgh"),
            (AdditionBound::CanAddPart, "c".to_string())
        );
    }
}
