//! Char-indexed block storage using the ropey crate.

use std::fmt;
use std::ops::RangeBounds;

use ropey::Rope;

/// Text of one block, addressed by char index.
#[derive(Clone, Default)]
pub struct TextRope {
    rope: Rope,
}

impl TextRope {
    /// Create an empty rope.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a rope from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Character at `char_idx`.
    #[must_use]
    pub fn char_at(&self, char_idx: usize) -> Option<char> {
        self.rope.get_char(char_idx)
    }

    /// Iterate characters starting at `char_idx`.
    pub fn chars_from(&self, char_idx: usize) -> impl Iterator<Item = char> + '_ {
        let start = char_idx.min(self.len_chars());
        self.rope.chars_at(start)
    }

    /// Owned copy of a char range; out-of-range bounds yield an empty string.
    #[must_use]
    pub fn slice_to_string<R>(&self, range: R) -> String
    where
        R: RangeBounds<usize>,
    {
        self.rope
            .get_slice(range)
            .map(|slice| slice.to_string())
            .unwrap_or_default()
    }

    /// Insert a character; positions past the end append.
    pub fn insert_char(&mut self, char_idx: usize, c: char) {
        let at = char_idx.min(self.len_chars());
        self.rope.insert_char(at, c);
    }

    /// Insert text; positions past the end append.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let at = char_idx.min(self.len_chars());
        self.rope.insert(at, text);
    }

    /// Remove the character at `char_idx`, returning it.
    pub fn remove_char(&mut self, char_idx: usize) -> Option<char> {
        let c = self.rope.get_char(char_idx)?;
        self.rope.remove(char_idx..=char_idx);
        Some(c)
    }

    /// Split at `char_idx`, keeping the head and returning the tail.
    #[must_use]
    pub fn split_off(&mut self, char_idx: usize) -> Self {
        let at = char_idx.min(self.len_chars());
        Self {
            rope: self.rope.split_off(at),
        }
    }

    /// Keep only the first `len` characters.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len_chars() {
            self.rope.remove(len..);
        }
    }
}

impl fmt::Display for TextRope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextRope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string(), f)
    }
}

impl PartialEq for TextRope {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl Eq for TextRope {}

impl From<&str> for TextRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}
