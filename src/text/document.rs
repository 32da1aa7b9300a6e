//! Block-structured text document.

use crate::error::{Error, Result};

use super::block::{BlockEnd, TextBlock};
use super::block_cursor::BlockCursor;
use super::format::TextFormat;

/// Ordered, owned sequence of [`TextBlock`]s.
///
/// The last block of a non-empty document is either a `None` block or a
/// `Newline` block followed by an empty `None` block standing for the line
/// after the break. Mutators driven through [`BlockCursor`] keep that shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextDocument {
    blocks: Vec<TextBlock>,
}

impl TextDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from prepared blocks.
    #[must_use]
    pub fn from_blocks(blocks: Vec<TextBlock>) -> Self {
        Self { blocks }
    }

    /// Split plain text into blocks on `\n`.
    ///
    /// Every piece but the last ends in [`BlockEnd::Newline`]. Empty text gives
    /// an empty document.
    #[must_use]
    pub fn from_text(text: &str, format: TextFormat) -> Self {
        Self::from_blocks(text_to_blocks(text, format))
    }

    /// All blocks in reading order.
    #[must_use]
    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    /// Block at `index`.
    #[must_use]
    pub fn block(&self, index: usize) -> Option<&TextBlock> {
        self.blocks.get(index)
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut TextBlock> {
        self.blocks.get_mut(index)
    }

    /// Last block.
    #[must_use]
    pub fn last_block(&self) -> Option<&TextBlock> {
        self.blocks.last()
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total length in characters, newlines included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.iter().map(TextBlock::len).sum()
    }

    /// True when no block holds text or a line break.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(TextBlock::is_empty)
    }

    /// Append a block at the end.
    pub fn append(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    /// Remove every block.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Remove the block at `index`.
    pub fn remove_block(&mut self, index: usize) -> Option<TextBlock> {
        (index < self.blocks.len()).then(|| self.blocks.remove(index))
    }

    pub(crate) fn pop_block(&mut self) -> Option<TextBlock> {
        self.blocks.pop()
    }

    /// Cursor at absolute character `position`.
    ///
    /// A block matches when `position` falls inside `[start, start + len)`, or
    /// when the block has zero length and `position == start`. Returns the
    /// uninitialized cursor when nothing matches.
    #[must_use]
    pub fn block_cursor(&self, position: usize) -> BlockCursor {
        let mut start = 0;
        for (index, block) in self.blocks.iter().enumerate() {
            let len = block.len();
            if (position >= start && position < start + len) || (len == 0 && position == start) {
                return BlockCursor::at(index, position - start);
            }
            start += len;
        }
        BlockCursor::npos()
    }

    /// Absolute character offset of `cursor`.
    #[must_use]
    pub fn absolute_position(&self, cursor: &BlockCursor) -> Option<usize> {
        let (block, pos) = cursor.coords()?;
        if block >= self.blocks.len() {
            return None;
        }
        let before: usize = self.blocks[..block].iter().map(TextBlock::len).sum();
        Some(before + pos)
    }

    /// Split the block under `cursor` in two.
    ///
    /// The right half keeps the format and end marker, except that splitting
    /// the last block leaves the right half ending in `None`.
    pub fn split(&mut self, cursor: &BlockCursor) -> Result<()> {
        let (index, pos) = cursor.coords().ok_or(Error::InvalidCursor)?;
        let was_last = index + 1 == self.blocks.len();
        let block = self.blocks.get_mut(index).ok_or(Error::InvalidCursor)?;
        let tail = block.split_text(pos);
        let end = if was_last { BlockEnd::None } else { block.end() };
        let right = TextBlock::from_rope(tail, *block.format(), end);
        self.blocks.insert(index + 1, right);
        Ok(())
    }

    /// Split at `cursor` and end the left half with `end`.
    pub fn add_newline(&mut self, cursor: &BlockCursor, end: BlockEnd) -> Result<()> {
        self.split(cursor)?;
        let (index, _) = cursor.coords().ok_or(Error::InvalidCursor)?;
        if let Some(block) = self.blocks.get_mut(index) {
            block.set_end(end);
        }
        Ok(())
    }

    /// Whole document text, `Newline` ends rendered as `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            out.push_str(&block.text());
            if block.end() == BlockEnd::Newline {
                out.push('\n');
            }
        }
        out
    }

    /// Text from `cursor` to the end of the document.
    #[must_use]
    pub fn text_from(&self, cursor: &BlockCursor) -> String {
        let Some((index, pos)) = cursor.coords() else {
            return String::new();
        };
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate().skip(index) {
            let from = if i == index { pos } else { 0 };
            out.push_str(&block.text_from(from));
        }
        out
    }
}

/// Split plain text into blocks on `\n`.
#[must_use]
pub fn text_to_blocks(text: &str, format: TextFormat) -> Vec<TextBlock> {
    if text.is_empty() {
        return Vec::new();
    }
    let pieces: Vec<&str> = text.split('\n').collect();
    let last = pieces.len() - 1;
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            let end = if i == last {
                BlockEnd::None
            } else {
                BlockEnd::Newline
            };
            TextBlock::with_end(piece, format, end)
        })
        .collect()
}
