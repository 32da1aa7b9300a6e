//! `blocktext` - block-structured rich text and line layout
//!
//! Documents are lists of formatted text blocks. A layout pass wraps them into
//! visual lines under a pixel width, breaking at spaces or hyphenating long
//! words, and an editor keeps a cursor, a scrolling window and the document
//! in sync. Rendering is left to the host: layout produces positioned
//! fragments and a cursor rectangle.

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Intentional pixel coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_possible_wrap)] // Pixel sizes never reach i32::MAX
#![allow(clippy::module_name_repetitions)] // Allow text::TextLine etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::should_implement_trait)] // from_str naming is intentional
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod color;
pub mod error;
pub mod event;
pub mod font;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use color::Color;
pub use error::{Error, Result};
pub use event::{LogLevel, emit_event, emit_log, set_event_callback, set_log_callback};
pub use font::{CellFont, FontId, FontMetrics, FontRegistry};
pub use unicode::WidthMethod;

// Re-export commonly used types
pub use text::{
    AdditionBound, Alignment, BlockCursor, BlockEnd, CursorStartPosition, DrawFragment, EditMode,
    EditorOptions, FontFace, FontWeight, HorizontalAlign, LayoutArea, LineBreak, Lines,
    LinesDrawStop, Move, NavigationDirection, Padding, Rect, RichText, RichTextParser, TextBackup,
    TextBlock, TextCursor, TextDocument, TextEditor, TextFormat, TextLimit, TextLine,
    TextLineCursor, VerticalAlign,
};
