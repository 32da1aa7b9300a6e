//! `(block, offset)` locator and the document mutation entry point.

use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};

use super::block::{BlockEnd, TextBlock};
use super::document::TextDocument;
use super::format::TextFormat;

/// Outcome of a single cursor step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Moved within the current block.
    Moved,
    /// Moved onto another block.
    BlockChanged,
    /// Already at the document boundary, or the document is empty.
    Stuck,
}

/// Position inside a [`TextDocument`].
///
/// The cursor does not borrow the document; every operation takes the
/// document it walks. Either coordinate being `None` is the uninitialized
/// state. `pos` may equal the block's visible length, meaning "after the last
/// character".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockCursor {
    block: Option<usize>,
    pos: Option<usize>,
}

impl BlockCursor {
    /// Uninitialized cursor.
    #[must_use]
    pub const fn npos() -> Self {
        Self {
            block: None,
            pos: None,
        }
    }

    /// Cursor at raw coordinates, unchecked.
    #[must_use]
    pub const fn at(block: usize, pos: usize) -> Self {
        Self {
            block: Some(block),
            pos: Some(pos),
        }
    }

    /// Cursor clamped into `doc`.
    ///
    /// `block` is clamped to the last block and `pos` to that block's length.
    /// An empty document gives the uninitialized cursor.
    #[must_use]
    pub fn new(doc: &TextDocument, pos: usize, block: usize) -> Self {
        let Some(last) = doc.block_count().checked_sub(1) else {
            return Self::npos();
        };
        let block = block.min(last);
        let len = doc.block(block).map_or(0, TextBlock::len);
        Self::at(block, pos.min(len))
    }

    /// Cursor at the document head, or uninitialized if there are no blocks.
    #[must_use]
    pub fn begin(doc: &TextDocument) -> Self {
        Self::new(doc, 0, 0)
    }

    /// Cursor at the last selectable position of the document.
    #[must_use]
    pub fn end(doc: &TextDocument) -> Self {
        let Some(last) = doc.block_count().checked_sub(1) else {
            return Self::npos();
        };
        let pos = doc.block(last).map_or(0, TextBlock::text_len);
        Self::at(last, pos)
    }

    /// Block index.
    #[must_use]
    pub fn block(&self) -> Option<usize> {
        self.block
    }

    /// Offset inside the block.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.pos
    }

    /// Both coordinates, if set.
    #[must_use]
    pub fn coords(&self) -> Option<(usize, usize)> {
        Some((self.block?, self.pos?))
    }

    /// True if both coordinates are set.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.block.is_some() && self.pos.is_some()
    }

    /// Forget the position.
    pub fn reset(&mut self) {
        *self = Self::npos();
    }

    fn init_at_head(&mut self) {
        self.block.get_or_insert(0);
        self.pos.get_or_insert(0);
    }

    /// At the very first position of the document.
    #[must_use]
    pub fn at_begin(&self) -> bool {
        self.coords() == Some((0, 0))
    }

    /// At the last selectable position of the document.
    ///
    /// The newline of a final `Newline` block is not selectable.
    #[must_use]
    pub fn at_end(&self, doc: &TextDocument) -> bool {
        let (Some((block, pos)), Some(last)) = (self.coords(), doc.last_block()) else {
            return false;
        };
        let newline = usize::from(last.end() == BlockEnd::Newline);
        block + 1 == doc.block_count() && pos + newline >= last.len()
    }

    /// Block under the cursor.
    #[must_use]
    pub fn current<'d>(&self, doc: &'d TextDocument) -> Option<&'d TextBlock> {
        doc.block(self.block?)
    }

    /// Remaining text of the current block, its newline included.
    #[must_use]
    pub fn text(&self, doc: &TextDocument) -> String {
        match (self.current(doc), self.pos) {
            (Some(block), Some(pos)) => block.text_from(pos),
            _ => String::new(),
        }
    }

    /// Advance one slot, crossing block boundaries.
    ///
    /// Every `(block, offset)` pair is its own slot, so the end of a `None`
    /// block and the head of the next block take two steps although they are
    /// one position in the text. [`TextCursor`](super::TextCursor) merges
    /// them. An uninitialized cursor is stuck.
    pub fn step_forward(&mut self, doc: &TextDocument) -> Step {
        let Some((block, pos)) = self.coords() else {
            return Step::Stuck;
        };
        let Some(current) = doc.block(block) else {
            return Step::Stuck;
        };
        let len = current.len();
        let end_reached = (current.end() == BlockEnd::Newline && pos + 1 == len) || pos >= len;
        if end_reached {
            if block + 1 >= doc.block_count() {
                return Step::Stuck;
            }
            *self = Self::at(block + 1, 0);
            return Step::BlockChanged;
        }
        self.pos = Some(pos + 1);
        Step::Moved
    }

    /// Go back one slot, crossing block boundaries.
    pub fn step_back(&mut self, doc: &TextDocument) -> Step {
        let Some((block, pos)) = self.coords() else {
            return Step::Stuck;
        };
        if doc.block(block).is_none() {
            return Step::Stuck;
        }
        if pos > 0 {
            self.pos = Some(pos - 1);
            return Step::Moved;
        }
        if block == 0 {
            return Step::Stuck;
        }
        let previous = doc.block(block - 1).map_or(0, TextBlock::text_len);
        *self = Self::at(block - 1, previous);
        Step::BlockChanged
    }

    /// `n` forward steps. Returns true if any step changed block.
    pub fn advance(&mut self, doc: &TextDocument, n: usize) -> bool {
        let mut changed = false;
        for _ in 0..n {
            changed |= self.step_forward(doc) == Step::BlockChanged;
        }
        changed
    }

    /// `n` backward steps. Returns true if any step changed block.
    pub fn retreat(&mut self, doc: &TextDocument, n: usize) -> bool {
        let mut changed = false;
        for _ in 0..n {
            changed |= self.step_back(doc) == Step::BlockChanged;
        }
        changed
    }

    /// Insert `c` at the cursor without moving it.
    ///
    /// `\n` splits the current block. Inserting into a document without
    /// blocks creates the first block with `format`.
    pub fn add_char(&mut self, doc: &mut TextDocument, c: char, format: TextFormat) -> Result<()> {
        if doc.block_count() == 0 {
            doc.append(TextBlock::empty(format));
            self.init_at_head();
            if c == '\n' {
                return doc.add_newline(self, BlockEnd::Newline);
            }
        }
        let (block, pos) = self.coords().ok_or(Error::InvalidCursor)?;
        if c == '\n' {
            return doc.add_newline(self, BlockEnd::Newline);
        }
        let current = doc.block_mut(block).ok_or(Error::InvalidCursor)?;
        current.insert_char(pos, c);
        Ok(())
    }

    /// Insert every character of `text`, advancing past each one.
    pub fn add_text(&mut self, doc: &mut TextDocument, text: &str, format: TextFormat) -> Result<()> {
        for c in text.chars() {
            self.add_char(doc, c, format)?;
            self.step_forward(doc);
        }
        Ok(())
    }

    /// Append a whole block at the end of the document.
    ///
    /// Zero-length blocks are dropped unless they start a new line. A trailing
    /// empty `None` block is replaced, and a `Newline` block gets an empty
    /// `None` block after it.
    pub fn add_text_block(&mut self, doc: &mut TextDocument, block: TextBlock) {
        if block.len() == 0 {
            match doc.last_block() {
                None => return,
                Some(last) if last.end() != BlockEnd::Newline => return,
                Some(_) => {}
            }
        }
        if doc.is_empty() {
            self.init_at_head();
        }
        if doc.last_block().is_some_and(TextBlock::is_empty) {
            doc.pop_block();
        }
        let end = block.end();
        let format = *block.format();
        doc.append(block);
        if end == BlockEnd::Newline {
            self.add_text_block(doc, TextBlock::empty(format));
        }
    }

    /// Remove the character at the cursor.
    ///
    /// On the newline of a block followed by the empty trailing block, that
    /// block is dropped and the break removed. Otherwise the character (or the
    /// newline) at the cursor goes, and a block left empty is dropped unless
    /// it is last or starts a line. An empty block that only started the line
    /// after a removed newline goes with it.
    pub fn remove_char(&mut self, doc: &mut TextDocument) -> Result<()> {
        let Some((mut index, mut pos)) = self.coords() else {
            emit_log(LogLevel::Error, "cannot remove with an uninitialized cursor");
            return Err(Error::InvalidCursor);
        };
        if doc.block_count() == 0 {
            emit_log(LogLevel::Error, "cannot remove from an empty document");
            return Err(Error::EmptyDocument);
        }
        let mut block = doc.block(index).ok_or(Error::InvalidCursor)?;
        // The end of a `None` block is the head of the next one
        if block.end() == BlockEnd::None && pos >= block.text_len() {
            if let Some(next) = doc.block(index + 1) {
                (index, pos, block) = (index + 1, 0, next);
            }
        }
        let on_newline = block.end() == BlockEnd::Newline && pos == block.text_len();
        let next_empty = doc.block(index + 1).is_some_and(TextBlock::is_empty);
        let next_is_last = index + 2 == doc.block_count();

        if on_newline && next_empty && next_is_last {
            doc.remove_block(index + 1);
            if let Some(block) = doc.block_mut(index) {
                block.set_end(BlockEnd::None);
            }
            return Ok(());
        }

        let block = doc.block_mut(index).ok_or(Error::InvalidCursor)?;
        if pos < block.text_len() {
            block.remove_char(pos);
        } else if on_newline {
            block.set_end(BlockEnd::None);
        }

        let now_empty = block.is_empty();
        if on_newline && next_empty {
            doc.remove_block(index + 1);
        }
        let is_last = index + 1 == doc.block_count();
        let starts_line = index > 0
            && doc
                .block(index - 1)
                .is_some_and(|prev| prev.end() == BlockEnd::Newline);
        if now_empty && !is_last && !starts_line {
            doc.remove_block(index);
        }
        Ok(())
    }

    /// True where a new sentence would start.
    ///
    /// That is the document head, the start of a line, or after `.`, `!` or
    /// `?` followed by at least one space. Only spaces may sit between the
    /// terminator and the cursor.
    #[must_use]
    pub fn is_sentence_beginning(&self, doc: &TextDocument) -> bool {
        let Some(position) = doc.absolute_position(self) else {
            return doc.is_empty();
        };
        let text = doc.text();
        let mut spaces = 0;
        for c in text.chars().take(position).collect::<Vec<_>>().into_iter().rev() {
            match c {
                ' ' => spaces += 1,
                '\n' => return true,
                '.' | '!' | '?' => return spaces > 0,
                _ => return false,
            }
        }
        true
    }
}
