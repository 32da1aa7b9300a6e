//! Error types for blocktext.

use std::fmt;

use crate::font::FontId;

/// Result type alias for blocktext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for document and layout operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Cursor is not positioned on any block.
    InvalidCursor,
    /// Operation needs at least one block.
    EmptyDocument,
    /// No metrics registered for the font a block refers to.
    MissingFont(FontId),
    /// A configured text limit rejects the addition.
    LimitReached,
    /// Editing attempted while the editor is not in edit mode.
    ReadOnly,
    /// Rich text markup is not well-formed XML.
    Markup(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCursor => write!(f, "cursor is not positioned in the document"),
            Self::EmptyDocument => write!(f, "document has no blocks"),
            Self::MissingFont(id) => write!(f, "no metrics registered for font {}", id.0),
            Self::LimitReached => write!(f, "text limit reached"),
            Self::ReadOnly => write!(f, "editor is not in edit mode"),
            Self::Markup(reason) => write!(f, "malformed markup: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
