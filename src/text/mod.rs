//! Block-structured rich text and its layout.
//!
//! A [`TextDocument`] is an ordered list of [`TextBlock`]s, each a run of
//! text with one [`TextFormat`] and an optional trailing newline. Blocks are
//! addressed with a [`BlockCursor`], a plain `(block, offset)` value that
//! borrows nothing.
//!
//! Layout turns the document into [`TextLine`]s under a pixel width budget
//! and collects them in [`Lines`], a window that can scroll one line at a
//! time. [`TextCursor`] and [`TextLineCursor`] move through the document
//! with knowledge of that layout, and [`TextEditor`] ties all of it to a
//! host.
//!
//! Key types:
//!
//! - [`TextDocument`]: block storage and position arithmetic
//! - [`BlockCursor`]: stepping, insertion and removal
//! - [`TextLine`]: greedy word-wrap of one line
//! - [`Lines`]: the laid-out window
//! - [`TextEditor`]: edit modes, limits, scrolling and output
//! - [`RichTextParser`]: markup to styled blocks
//!
//! # Examples
//!
//! ```
//! use blocktext::{CellFont, FontRegistry, TextDocument, TextFormat, LayoutArea, Lines};
//!
//! let doc = TextDocument::from_text("hello world", TextFormat::default());
//! let fonts = FontRegistry::with_font(CellFont::new(1, 1));
//! let mut lines = Lines::new();
//! lines.draw(&doc, &fonts, LayoutArea::unbounded_height(5), 1);
//!
//! let texts: Vec<String> = lines.iter().map(|line| line.text()).collect();
//! assert_eq!(texts, vec!["hello", "world"]);
//! ```

mod block;
mod block_cursor;
mod cursor;
mod document;
mod editor;
mod format;
mod geometry;
mod limits;
mod line;
mod lines;
mod rich;
mod rope;

pub use block::{BlockEnd, TextBlock};
pub use block_cursor::{BlockCursor, Step};
pub use cursor::{
    CURSOR_WIDTH, CursorStartPosition, Move, NavigationDirection, TextCursor, TextLineCursor,
};
pub use document::{TextDocument, text_to_blocks};
pub use editor::{EditMode, EditorOptions, TextBackup, TextEditor};
pub use format::TextFormat;
pub use geometry::{Alignment, HorizontalAlign, Padding, Rect, VerticalAlign};
pub use limits::{AdditionBound, LimitContext, TextLimit, TextLimits};
pub use line::{
    DrawFragment, LineBreak, SignsToShow, TextLine, WORD_DETECTION_RANGE,
    calculate_signs_to_show,
};
pub use lines::{LayoutArea, Lines, LinesDrawStop};
pub use rich::{FontFace, FontWeight, RichText, RichTextParser};
pub use rope::TextRope;
