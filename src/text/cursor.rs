//! Screen-aware cursors.
//!
//! [`TextCursor`] pairs a [`BlockCursor`] with its character offset from the
//! first laid-out line, so the line and column it sits on can be found.
//! [`TextLineCursor`] adds up/down movement across wrapped lines.

use crate::error::{Error, Result};

use super::block::BlockEnd;
use super::block_cursor::{BlockCursor, Step};
use super::document::TextDocument;
use super::format::TextFormat;
use super::line::TextLine;
use super::lines::{Lines, LinesDrawStop};

/// Width reserved for the cursor bar, in pixels.
pub const CURSOR_WIDTH: u32 = 2;

/// Navigation input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Result of a cursor move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Could not move: already at the document start.
    Start,
    /// Could not move: already at the document end.
    End,
    Left,
    Right,
    Up,
    Down,
    /// Cursor or document not usable; nothing changed.
    Error,
}

/// Where a freshly set text puts the cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorStartPosition {
    DocumentBegin,
    #[default]
    DocumentEnd,
    /// Keep the previous character offset, clamped to the new text.
    Offset,
}

/// Block cursor plus its offset on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextCursor {
    cursor: BlockCursor,
    on_screen: usize,
}

impl TextCursor {
    /// Wrap a block cursor; call [`TextCursor::sync`] once lines exist.
    #[must_use]
    pub fn new(cursor: BlockCursor) -> Self {
        Self {
            cursor,
            on_screen: 0,
        }
    }

    /// Underlying block cursor.
    #[must_use]
    pub fn block_cursor(&self) -> &BlockCursor {
        &self.cursor
    }

    /// Characters between the first laid-out line and the cursor.
    #[must_use]
    pub fn on_screen_position(&self) -> usize {
        self.on_screen
    }

    /// Recompute the screen offset after a layout pass.
    pub fn sync(&mut self, doc: &TextDocument, lines: &Lines) {
        let start = lines.draw_start();
        let (block, pos) = start.coords().unwrap_or((0, 0));
        let start = BlockCursor::new(doc, pos, block);
        let window = doc.absolute_position(&start).unwrap_or(0);
        let cursor = doc.absolute_position(&self.cursor).unwrap_or(0);
        self.on_screen = cursor.saturating_sub(window);
    }

    /// Place the cursor at a new position.
    pub fn set(&mut self, cursor: BlockCursor) {
        self.cursor = cursor;
    }

    /// Move one character left or right.
    ///
    /// Up and down without a layout only report `Start`/`End` at the document
    /// boundaries and otherwise fail.
    pub fn move_cursor(&mut self, doc: &TextDocument, direction: NavigationDirection) -> Move {
        if !self.cursor.is_valid() || doc.block_count() == 0 {
            return Move::Error;
        }
        match direction {
            NavigationDirection::Left | NavigationDirection::Up if self.cursor.at_begin() => {
                Move::Start
            }
            NavigationDirection::Right | NavigationDirection::Down
                if self.cursor.at_end(doc) =>
            {
                Move::End
            }
            NavigationDirection::Left => {
                if self.step_left(doc) {
                    Move::Left
                } else {
                    Move::Start
                }
            }
            NavigationDirection::Right => {
                if self.step_right(doc) {
                    Move::Right
                } else {
                    Move::End
                }
            }
            NavigationDirection::Up | NavigationDirection::Down => Move::Error,
        }
    }

    /// Step forward until the position in the text grows by one.
    ///
    /// The end of a `None` block and the start of the next one are the same
    /// point, so a crossing takes a second step. A failed move leaves the
    /// cursor untouched.
    fn step_right(&mut self, doc: &TextDocument) -> bool {
        let Some(from) = doc.absolute_position(&self.cursor) else {
            return false;
        };
        let mut next = self.cursor;
        while next.step_forward(doc) != Step::Stuck {
            if doc.absolute_position(&next).is_some_and(|at| at > from) {
                self.cursor = next;
                self.on_screen += 1;
                return true;
            }
        }
        false
    }

    /// Step back until the position in the text shrinks by one, then settle
    /// at the end of a joined previous block rather than the head of the
    /// current one.
    fn step_left(&mut self, doc: &TextDocument) -> bool {
        let Some(from) = doc.absolute_position(&self.cursor) else {
            return false;
        };
        let mut next = self.cursor;
        loop {
            if next.step_back(doc) == Step::Stuck {
                return false;
            }
            if doc.absolute_position(&next).is_some_and(|at| at < from) {
                break;
            }
        }
        while let Some((block, 0)) = next.coords() {
            let joins_previous = block > 0
                && doc
                    .block(block - 1)
                    .is_some_and(|b| b.end() == BlockEnd::None);
            if !joins_previous || next.step_back(doc) == Step::Stuck {
                break;
            }
        }
        self.cursor = next;
        self.on_screen = self.on_screen.saturating_sub(1);
        true
    }

    /// Insert `c` and move past it.
    pub fn add_char(&mut self, doc: &mut TextDocument, c: char, format: TextFormat) -> Result<()> {
        self.cursor.add_char(doc, c, format)?;
        self.step_right(doc);
        Ok(())
    }

    /// Delete the character before the cursor.
    ///
    /// Returns false at the document start.
    pub fn remove_char(&mut self, doc: &mut TextDocument) -> Result<bool> {
        match self.move_cursor(doc, NavigationDirection::Left) {
            Move::Left => {
                self.cursor.remove_char(doc)?;
                Ok(true)
            }
            Move::Error => Err(Error::InvalidCursor),
            _ => Ok(false),
        }
    }
}

/// Text cursor that also moves across wrapped lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextLineCursor {
    inner: TextCursor,
}

impl TextLineCursor {
    /// Wrap a block cursor.
    #[must_use]
    pub fn new(cursor: BlockCursor) -> Self {
        Self {
            inner: TextCursor::new(cursor),
        }
    }

    /// The line-unaware part.
    #[must_use]
    pub fn text_cursor(&self) -> &TextCursor {
        &self.inner
    }

    pub(crate) fn text_cursor_mut(&mut self) -> &mut TextCursor {
        &mut self.inner
    }

    /// Underlying block cursor.
    #[must_use]
    pub fn block_cursor(&self) -> &BlockCursor {
        self.inner.block_cursor()
    }

    /// Line index and column the cursor is on, if it is inside the window.
    ///
    /// The position just after the last line belongs to it only when the
    /// layout reached the end of the text.
    #[must_use]
    pub fn selected_line(&self, lines: &Lines) -> Option<(usize, usize)> {
        let pos = self.inner.on_screen_position();
        let count = lines.len();
        let mut offset = 0;
        for (index, line) in lines.iter().enumerate() {
            let len = line.len();
            let owns_end = index + 1 == count && lines.stop() != LinesDrawStop::OutOfSpace;
            if pos < offset + len || (owns_end && pos <= offset + len) {
                return Some((index, pos - offset));
            }
            offset += len;
        }
        None
    }

    /// Last column a cursor may take on line `index`.
    fn max_column(lines: &Lines, index: usize, line: &TextLine) -> usize {
        let owns_end = index + 1 == lines.len() && lines.stop() != LinesDrawStop::OutOfSpace;
        if owns_end {
            line.len()
        } else {
            line.len().saturating_sub(1)
        }
    }

    /// Move one step in `direction`.
    pub fn move_cursor(
        &mut self,
        doc: &TextDocument,
        lines: &Lines,
        direction: NavigationDirection,
    ) -> Move {
        if !self.inner.cursor.is_valid() || doc.block_count() == 0 {
            return Move::Error;
        }
        let vertical = matches!(
            direction,
            NavigationDirection::Up | NavigationDirection::Down
        );
        let Some((index, col)) = self.selected_line(lines).filter(|_| vertical) else {
            return self.inner.move_cursor(doc, direction);
        };

        if direction == NavigationDirection::Up {
            let Some(previous) = index.checked_sub(1).and_then(|i| lines.line(i)) else {
                return Move::Start;
            };
            let target = col.min(Self::max_column(lines, index - 1, previous));
            let steps = col + (previous.len() - target);
            self.repeat(doc, NavigationDirection::Left, steps);
            return Move::Up;
        }

        let (Some(current), Some(next)) = (lines.line(index), lines.line(index + 1)) else {
            return Move::End;
        };
        if next.is_empty() && current.end() != BlockEnd::Newline {
            return Move::End;
        }
        let target = col.min(Self::max_column(lines, index + 1, next));
        let steps = (current.len() - col) + target;
        self.repeat(doc, NavigationDirection::Right, steps);
        Move::Down
    }

    /// Move `n` times, stopping early at a boundary or error.
    pub fn move_cursor_n(
        &mut self,
        doc: &TextDocument,
        lines: &Lines,
        direction: NavigationDirection,
        n: usize,
    ) -> Move {
        let mut result = Move::Start;
        for _ in 0..n {
            result = self.move_cursor(doc, lines, direction);
            if matches!(result, Move::Start | Move::End | Move::Error) {
                break;
            }
        }
        result
    }

    fn repeat(&mut self, doc: &TextDocument, direction: NavigationDirection, steps: usize) {
        for _ in 0..steps {
            if matches!(
                self.inner.move_cursor(doc, direction),
                Move::Start | Move::End | Move::Error
            ) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{CellFont, FontRegistry};
    use crate::text::lines::LayoutArea;

    fn fmt() -> TextFormat {
        TextFormat::default()
    }

    fn layout(doc: &TextDocument, width: u32) -> Lines {
        let fonts = FontRegistry::with_font(CellFont::new(1, 1));
        let mut lines = Lines::new();
        lines.draw(doc, &fonts, LayoutArea::unbounded_height(width), 1);
        lines
    }

    fn line_cursor(doc: &TextDocument, lines: &Lines, position: usize) -> TextLineCursor {
        let mut cursor = TextLineCursor::new(BlockCursor::begin(doc));
        cursor.text_cursor_mut().sync(doc, lines);
        let moved = cursor.move_cursor_n(doc, lines, NavigationDirection::Right, position);
        assert_ne!(moved, Move::Error);
        cursor
    }

    #[test]
    fn test_left_right_boundaries() {
        let doc = TextDocument::from_text("ab", fmt());
        let mut cursor = TextCursor::new(BlockCursor::begin(&doc));
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Left), Move::Start);
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Right), Move::Right);
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Right), Move::Right);
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Right), Move::End);
        assert_eq!(cursor.on_screen_position(), 2);
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Down), Move::End);
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Up), Move::Error);
        assert_eq!(cursor.block_cursor().coords(), Some((0, 2)));
    }

    #[test]
    fn test_uninitialized_cursor_errors() {
        let doc = TextDocument::from_text("ab", fmt());
        let mut cursor = TextCursor::new(BlockCursor::npos());
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Right), Move::Error);
        assert!(!cursor.block_cursor().is_valid());
    }

    #[test]
    fn test_crossing_joined_blocks_is_one_step() {
        let bold = fmt().with_font(crate::font::FontId(1));
        let doc = TextDocument::from_blocks(vec![
            crate::text::TextBlock::new("ab", fmt()),
            crate::text::TextBlock::new("cd", bold),
        ]);
        let mut cursor = TextCursor::new(BlockCursor::at(0, 2));
        cursor.move_cursor(&doc, NavigationDirection::Right);
        assert_eq!(cursor.block_cursor().coords(), Some((1, 1)));
        cursor.move_cursor(&doc, NavigationDirection::Left);
        assert_eq!(cursor.block_cursor().coords(), Some((0, 2)));
    }

    #[test]
    fn test_left_from_joined_head_moves_one_character() {
        eprintln!("[TEST] left from the head of a joined block leaves the shared point");
        let bold = fmt().with_font(crate::font::FontId(1));
        let doc = TextDocument::from_blocks(vec![
            crate::text::TextBlock::new("ab", fmt()),
            crate::text::TextBlock::new("cd", bold),
        ]);
        let mut cursor = TextCursor::new(BlockCursor::at(1, 0));
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Left), Move::Left);
        assert_eq!(cursor.block_cursor().coords(), Some((0, 1)));
        assert_eq!(doc.absolute_position(cursor.block_cursor()), Some(1));

        // The screen offset tracks the text offset through every crossing
        let mut cursor = TextCursor::new(BlockCursor::begin(&doc));
        let moves = [
            NavigationDirection::Right,
            NavigationDirection::Right,
            NavigationDirection::Right,
            NavigationDirection::Left,
            NavigationDirection::Left,
            NavigationDirection::Right,
            NavigationDirection::Right,
            NavigationDirection::Right,
        ];
        for direction in moves {
            cursor.move_cursor(&doc, direction);
            assert_eq!(
                Some(cursor.on_screen_position()),
                doc.absolute_position(cursor.block_cursor())
            );
        }
        assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Right), Move::End);
        assert_eq!(cursor.on_screen_position(), 4);
    }

    #[test]
    fn test_newline_is_one_step() {
        let doc = TextDocument::from_text("ab\ncd", fmt());
        let mut cursor = TextCursor::new(BlockCursor::at(0, 2));
        cursor.move_cursor(&doc, NavigationDirection::Right);
        assert_eq!(cursor.block_cursor().coords(), Some((1, 0)));
        cursor.move_cursor(&doc, NavigationDirection::Left);
        assert_eq!(cursor.block_cursor().coords(), Some((0, 2)));
    }

    #[test]
    fn test_add_and_backspace() {
        let mut doc = TextDocument::new();
        let mut cursor = TextCursor::new(BlockCursor::npos());
        for c in "ab\nc".chars() {
            cursor.add_char(&mut doc, c, fmt()).unwrap();
        }
        assert_eq!(doc.text(), "ab\nc");
        assert_eq!(cursor.on_screen_position(), 4);

        assert_eq!(cursor.remove_char(&mut doc), Ok(true));
        assert_eq!(cursor.remove_char(&mut doc), Ok(true));
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.block_count(), 1);
        assert_eq!(cursor.remove_char(&mut doc), Ok(true));
        assert_eq!(cursor.remove_char(&mut doc), Ok(true));
        assert_eq!(cursor.remove_char(&mut doc), Ok(false));
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn test_backspace_across_joined_blocks() {
        let bold = fmt().with_font(crate::font::FontId(1));
        let mut doc = TextDocument::from_blocks(vec![
            crate::text::TextBlock::new("ab", fmt()),
            crate::text::TextBlock::new("cd", bold),
        ]);
        let mut cursor = TextCursor::new(BlockCursor::at(1, 1));
        assert_eq!(cursor.remove_char(&mut doc), Ok(true));
        assert_eq!(doc.text(), "abd");
    }

    #[test]
    fn test_selected_line() {
        let doc = TextDocument::from_text("hello world", fmt());
        let lines = layout(&doc, 5);
        assert_eq!(line_cursor(&doc, &lines, 5).selected_line(&lines), Some((0, 5)));
        assert_eq!(line_cursor(&doc, &lines, 6).selected_line(&lines), Some((1, 0)));
        assert_eq!(line_cursor(&doc, &lines, 11).selected_line(&lines), Some((1, 5)));
    }

    #[test]
    fn test_down_then_up_keeps_column() {
        eprintln!("[TEST] down then up on 5/5/5 lines returns to the same column");
        let doc = TextDocument::from_text("abcd efgh ijklm", fmt());
        let lines = layout(&doc, 5);
        let mut cursor = line_cursor(&doc, &lines, 8);
        assert_eq!(cursor.selected_line(&lines), Some((1, 3)));

        assert_eq!(cursor.move_cursor(&doc, &lines, NavigationDirection::Down), Move::Down);
        assert_eq!(cursor.selected_line(&lines), Some((2, 3)));
        assert_eq!(cursor.move_cursor(&doc, &lines, NavigationDirection::Up), Move::Up);
        assert_eq!(cursor.selected_line(&lines), Some((1, 3)));
        assert_eq!(cursor.block_cursor().coords(), Some((0, 8)));
    }

    #[test]
    fn test_up_down_boundaries() {
        let doc = TextDocument::from_text("abcd efgh ijklm", fmt());
        let lines = layout(&doc, 5);
        let mut top = line_cursor(&doc, &lines, 2);
        assert_eq!(top.move_cursor(&doc, &lines, NavigationDirection::Up), Move::Start);
        let mut bottom = line_cursor(&doc, &lines, 12);
        assert_eq!(bottom.move_cursor(&doc, &lines, NavigationDirection::Down), Move::End);
        assert_eq!(bottom.selected_line(&lines), Some((2, 2)));
    }

    #[test]
    fn test_down_clamps_to_shorter_line() {
        let doc = TextDocument::from_text("abcdef\nab\n", fmt());
        let lines = layout(&doc, 10);
        let mut cursor = line_cursor(&doc, &lines, 5);
        assert_eq!(cursor.move_cursor(&doc, &lines, NavigationDirection::Down), Move::Down);
        // Column 2 of "ab" is its newline
        assert_eq!(cursor.selected_line(&lines), Some((1, 2)));
        assert_eq!(cursor.block_cursor().coords(), Some((1, 2)));

        assert_eq!(cursor.move_cursor(&doc, &lines, NavigationDirection::Down), Move::Down);
        assert_eq!(cursor.selected_line(&lines), Some((2, 0)));
        assert_eq!(cursor.move_cursor(&doc, &lines, NavigationDirection::Down), Move::End);
    }

    #[test]
    fn test_horizontal_moves_keep_working_with_lines() {
        let doc = TextDocument::from_text("ab\ncd", fmt());
        let lines = layout(&doc, 10);
        let mut cursor = line_cursor(&doc, &lines, 2);
        assert_eq!(cursor.move_cursor(&doc, &lines, NavigationDirection::Right), Move::Right);
        assert_eq!(cursor.selected_line(&lines), Some((1, 0)));
    }
}
