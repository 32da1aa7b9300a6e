//! Editable text box: document, layout window and cursor kept in sync.
//!
//! [`TextEditor`] is the host-facing surface. Every call that changes the
//! content or the geometry relays out immediately, so [`TextEditor::fragments`]
//! and [`TextEditor::cursor_rect`] always describe the current state.

use std::fmt;

use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_event, emit_log};
use crate::font::FontRegistry;

use super::block::TextBlock;
use super::block_cursor::BlockCursor;
use super::cursor::{
    CURSOR_WIDTH, CursorStartPosition, Move, NavigationDirection, TextLineCursor,
};
use super::document::{TextDocument, text_to_blocks};
use super::format::TextFormat;
use super::geometry::{Alignment, Padding, Rect};
use super::limits::{AdditionBound, LimitContext, TextLimit, TextLimits};
use super::line::DrawFragment;
use super::lines::{LayoutArea, Lines, LinesDrawStop};
use super::rich::RichTextParser;

/// What the user may do with the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditMode {
    /// Navigate only.
    Browse,
    /// Navigate, insert and remove.
    #[default]
    Edit,
    /// Up and down scroll the window; the cursor stays put.
    Scroll,
}

/// Editor configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorOptions {
    /// Outer size in pixels, padding included.
    pub width: u32,
    pub height: u32,
    pub padding: Padding,
    pub alignment: Alignment,
    /// Format of text set or typed without an explicit format.
    pub format: TextFormat,
    pub edit_mode: EditMode,
    pub cursor_start: CursorStartPosition,
    pub limits: TextLimits,
    /// Horizontal space kept free for the cursor bar.
    pub cursor_width: u32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            width: 480,
            height: 600,
            padding: Padding::default(),
            alignment: Alignment::default(),
            format: TextFormat::default(),
            edit_mode: EditMode::default(),
            cursor_start: CursorStartPosition::default(),
            limits: TextLimits::new(),
            cursor_width: CURSOR_WIDTH,
        }
    }
}

/// Snapshot taken by [`TextEditor::backup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBackup {
    pub document: TextDocument,
    /// Absolute cursor offset at the time of the backup.
    pub cursor_position: usize,
}

type TextChangedCallback = Box<dyn FnMut(&str)>;

/// Text box owning its document, layout and cursor.
pub struct TextEditor {
    document: TextDocument,
    fonts: FontRegistry,
    lines: Lines,
    cursor: TextLineCursor,
    options: EditorOptions,
    on_text_changed: Option<TextChangedCallback>,
}

impl fmt::Debug for TextEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEditor")
            .field("document", &self.document)
            .field("cursor", &self.cursor)
            .field("options", &self.options)
            .field("lines", &self.lines.len())
            .finish_non_exhaustive()
    }
}

impl TextEditor {
    /// Empty editor with default options.
    #[must_use]
    pub fn new(fonts: FontRegistry) -> Self {
        Self::new_with_options(fonts, EditorOptions::default())
    }

    /// Empty editor.
    #[must_use]
    pub fn new_with_options(fonts: FontRegistry, options: EditorOptions) -> Self {
        if fonts.get(options.format.font).is_none() {
            emit_log(
                LogLevel::Warn,
                &format!("default font {} has no metrics", options.format.font.0),
            );
        }
        let mut editor = Self {
            document: TextDocument::new(),
            fonts,
            lines: Lines::new(),
            cursor: TextLineCursor::new(BlockCursor::npos()),
            options,
            on_text_changed: None,
        };
        editor.relayout();
        editor
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Whole text, newlines included.
    #[must_use]
    pub fn text(&self) -> String {
        self.document.text()
    }

    #[must_use]
    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    /// Lines of the current window.
    #[must_use]
    pub fn lines(&self) -> &Lines {
        &self.lines
    }

    #[must_use]
    pub fn cursor(&self) -> &TextLineCursor {
        &self.cursor
    }

    #[must_use]
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    #[must_use]
    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Absolute character offset of the cursor.
    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.document
            .absolute_position(self.cursor.block_cursor())
            .unwrap_or(0)
    }

    /// True where typed text would start a new sentence.
    #[must_use]
    pub fn is_sentence_beginning(&self) -> bool {
        self.cursor
            .block_cursor()
            .is_sentence_beginning(&self.document)
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Replace the whole text.
    ///
    /// The cursor goes where [`EditorOptions::cursor_start`] says.
    pub fn set_text(&mut self, text: &str) {
        let blocks = text_to_blocks(text, self.options.format);
        self.build_document(blocks);
        self.notify_text_changed();
    }

    /// Replace the content with prepared blocks.
    pub fn set_document(&mut self, document: TextDocument) {
        self.build_document(document.blocks().to_vec());
        self.notify_text_changed();
    }

    /// Replace the content with parsed markup.
    ///
    /// An `align` attribute in the markup sets the horizontal alignment.
    pub fn set_rich_text(&mut self, parser: &RichTextParser, markup: &str) -> Result<()> {
        let rich = parser.parse(markup)?;
        if let Some(horizontal) = rich.alignment {
            self.options.alignment.horizontal = horizontal;
        }
        self.set_document(rich.document);
        Ok(())
    }

    /// Drop all text.
    pub fn clear(&mut self) {
        self.build_document(Vec::new());
        self.notify_text_changed();
    }

    /// Append `text` at the end, as much as the limits allow.
    ///
    /// The cursor moves to the end of the document.
    pub fn add_text(&mut self, text: &str) -> AdditionBound {
        if text.is_empty() {
            return AdditionBound::CanAddAll;
        }
        let blocks = text_to_blocks(text, self.options.format);
        self.append_blocks(blocks)
    }

    /// Append one block at the end, as much of it as the limits allow.
    pub fn append_block(&mut self, block: TextBlock) -> AdditionBound {
        self.append_blocks(vec![block])
    }

    fn append_blocks(&mut self, blocks: Vec<TextBlock>) -> AdditionBound {
        let mut result = AdditionBound::CanAddAll;
        let mut added = false;
        for block in blocks {
            let (bound, block) = self.check_block_bounds(&block);
            if bound == AdditionBound::CantAdd {
                result = bound;
                break;
            }
            let mut cursor = *self.cursor.block_cursor();
            cursor.add_text_block(&mut self.document, block);
            added = true;
            if bound == AdditionBound::CanAddPart {
                result = bound;
                break;
            }
        }
        self.cursor = TextLineCursor::new(BlockCursor::end(&self.document));
        self.refresh();
        if added {
            self.notify_text_changed();
        }
        result
    }

    /// Type `c` at the cursor.
    pub fn add_char(&mut self, c: char) -> Result<()> {
        if self.options.edit_mode != EditMode::Edit {
            return Err(Error::ReadOnly);
        }
        if self.check_addition_bounds(c) != AdditionBound::CanAddAll {
            return Err(Error::LimitReached);
        }
        self.options.cursor_start = CursorStartPosition::Offset;
        let format = self.options.format;
        self.cursor
            .text_cursor_mut()
            .add_char(&mut self.document, c, format)?;
        self.refresh();
        self.notify_text_changed();
        Ok(())
    }

    /// Delete the character before the cursor.
    ///
    /// Returns false if nothing was removed. When the text shrinks by a line
    /// and the window was scrolled, the window moves back up one line.
    pub fn remove_char(&mut self) -> Result<bool> {
        if self.options.edit_mode != EditMode::Edit {
            return Err(Error::ReadOnly);
        }
        if self.document.is_empty() {
            return Ok(false);
        }
        self.options.cursor_start = CursorStartPosition::Offset;
        let lines_before = self.lines.len();
        if !self.cursor.text_cursor_mut().remove_char(&mut self.document)? {
            return Ok(false);
        }
        self.relayout();
        if self.lines.len() < lines_before && self.lines.scroll_up() {
            self.relayout();
        }
        self.ensure_cursor_visible();
        self.notify_text_changed();
        Ok(true)
    }

    /// Capture the text and cursor offset.
    #[must_use]
    pub fn backup(&self) -> TextBackup {
        TextBackup {
            document: self.document.clone(),
            cursor_position: self.cursor_position(),
        }
    }

    /// Go back to a backup.
    ///
    /// The cursor is walked left from the end of the text; if the restored
    /// text is not longer than the saved offset it stays at the end.
    pub fn restore(&mut self, backup: &TextBackup) {
        self.build_document(backup.document.blocks().to_vec());
        self.cursor = TextLineCursor::new(BlockCursor::end(&self.document));
        self.relayout();
        let len = self.document.len();
        if len > backup.cursor_position {
            for _ in 0..len - backup.cursor_position {
                let moved = self
                    .cursor
                    .text_cursor_mut()
                    .move_cursor(&self.document, NavigationDirection::Left);
                if moved != Move::Left {
                    break;
                }
            }
        }
        self.refresh();
        self.notify_text_changed();
    }

    fn build_document(&mut self, blocks: Vec<TextBlock>) {
        let previous = self.cursor_position();
        self.lines.reset();
        self.document.clear();
        let mut cursor = BlockCursor::npos();
        for block in blocks {
            cursor.add_text_block(&mut self.document, block);
        }
        emit_log(
            LogLevel::Debug,
            &format!(
                "document rebuilt: {} blocks, {} chars",
                self.document.block_count(),
                self.document.len()
            ),
        );

        self.cursor = match self.options.cursor_start {
            CursorStartPosition::DocumentBegin => {
                TextLineCursor::new(BlockCursor::begin(&self.document))
            }
            CursorStartPosition::DocumentEnd => {
                TextLineCursor::new(BlockCursor::end(&self.document))
            }
            CursorStartPosition::Offset => {
                let mut cursor = TextLineCursor::new(BlockCursor::begin(&self.document));
                let steps = previous.min(self.document.len());
                for _ in 0..steps {
                    let moved = cursor
                        .text_cursor_mut()
                        .move_cursor(&self.document, NavigationDirection::Right);
                    if moved != Move::Right {
                        break;
                    }
                }
                cursor
            }
        };
        self.refresh();
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Handle a navigation key.
    ///
    /// In [`EditMode::Scroll`] up and down move the window and left and right
    /// are not handled (`None`). Otherwise the cursor moves, scrolling the
    /// window when it would leave it.
    pub fn navigate(&mut self, direction: NavigationDirection) -> Option<Move> {
        if self.options.edit_mode == EditMode::Scroll {
            return match direction {
                NavigationDirection::Up => {
                    Some(if self.scroll_up() { Move::Up } else { Move::Start })
                }
                NavigationDirection::Down => {
                    Some(if self.scroll_down() { Move::Down } else { Move::End })
                }
                NavigationDirection::Left | NavigationDirection::Right => None,
            };
        }

        self.options.cursor_start = CursorStartPosition::Offset;
        self.scroll_before_move(direction);
        let result = self
            .cursor
            .move_cursor(&self.document, &self.lines, direction);
        self.ensure_cursor_visible();
        Some(result)
    }

    /// Show one more line at the bottom.
    pub fn scroll_down(&mut self) -> bool {
        if !self.lines.scroll_down() {
            return false;
        }
        self.relayout();
        true
    }

    /// Show one more line at the top.
    pub fn scroll_up(&mut self) -> bool {
        if !self.lines.scroll_up() {
            return false;
        }
        self.relayout();
        true
    }

    /// Vertical moves off the window edge need the neighbouring line laid out
    /// before the cursor can target it.
    fn scroll_before_move(&mut self, direction: NavigationDirection) {
        let Some((index, col)) = self.cursor.selected_line(&self.lines) else {
            return;
        };
        let on_last = index + 1 == self.lines.len();
        match direction {
            NavigationDirection::Up if index == 0 => {
                self.scroll_up();
            }
            NavigationDirection::Left if index == 0 && col == 0 => {
                self.scroll_up();
            }
            NavigationDirection::Down
                if on_last && self.lines.stop() == LinesDrawStop::OutOfSpace =>
            {
                self.scroll_down();
            }
            _ => {}
        }
    }

    fn ensure_cursor_visible(&mut self) {
        for _ in 0..=self.document.len() {
            let window = self.window_start();
            let scrolled = if self.cursor_position() < window {
                self.lines.scroll_up()
            } else if self.cursor.selected_line(&self.lines).is_none() && !self.lines.is_empty() {
                self.lines.scroll_down()
            } else {
                break;
            };
            if !scrolled {
                break;
            }
            self.relayout();
        }
    }

    fn window_start(&self) -> usize {
        let (block, pos) = self.lines.draw_start().coords().unwrap_or((0, 0));
        let start = BlockCursor::new(&self.document, pos, block);
        self.document.absolute_position(&start).unwrap_or(0)
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Change the outer size.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.options.width = width;
        self.options.height = height;
        self.refresh();
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.options.padding = padding;
        self.refresh();
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.options.alignment = alignment;
        self.refresh();
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.options.edit_mode = mode;
    }

    /// Where the next [`TextEditor::set_text`] puts the cursor.
    pub fn set_cursor_start_position(&mut self, position: CursorStartPosition) {
        self.options.cursor_start = position;
    }

    /// Add a limit, replacing one of the same kind.
    pub fn set_limit(&mut self, limit: TextLimit) {
        self.options.limits.set(limit);
    }

    pub fn clear_limits(&mut self) {
        self.options.limits.clear();
    }

    /// Format for text added from now on. Existing blocks keep theirs.
    pub fn set_format(&mut self, format: TextFormat) -> Result<()> {
        if self.fonts.get(format.font).is_none() {
            return Err(Error::MissingFont(format.font));
        }
        self.options.format = format;
        self.refresh();
        Ok(())
    }

    /// Called with the whole text after every change.
    pub fn set_text_changed_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.on_text_changed = Some(Box::new(callback));
    }

    // ========================================================================
    // Limits
    // ========================================================================

    fn limit_context(&self) -> LimitContext<'_> {
        let area = self.text_area();
        LimitContext {
            document: &self.document,
            fonts: &self.fonts,
            cursor: *self.cursor.block_cursor(),
            format: self.options.format,
            max_width: area.max_width,
            max_height: area.max_height,
            empty_line_height: self.default_line_height(),
        }
    }

    /// May `c` be typed at the cursor?
    #[must_use]
    pub fn check_addition_bounds(&self, c: char) -> AdditionBound {
        self.limit_context().check_char(&self.options.limits, c)
    }

    /// How much of `block` may be appended, and the part that fits.
    #[must_use]
    pub fn check_block_bounds(&self, block: &TextBlock) -> (AdditionBound, TextBlock) {
        self.limit_context()
            .check_block(&self.options.limits, block)
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Fragments of the window in absolute coordinates.
    #[must_use]
    pub fn fragments(&self) -> Vec<DrawFragment> {
        self.lines.fragments()
    }

    /// Where the cursor bar goes, if it is inside the window.
    #[must_use]
    pub fn cursor_rect(&self) -> Option<Rect> {
        let width = self.options.cursor_width;
        if self.lines.is_empty() {
            let padding = self.options.padding;
            return Some(Rect::new(
                padding.left as i32,
                padding.top as i32,
                width,
                self.default_line_height(),
            ));
        }
        let (index, col) = self.cursor.selected_line(&self.lines)?;
        let line = self.lines.line(index)?;
        let (x, y) = line.position();
        let offset = line.x_of_column(&self.fonts, col);
        let height = match line.height() {
            0 => self.default_line_height(),
            height => height,
        };
        Some(Rect::new(x + offset as i32, y, width, height))
    }

    /// True if the cursor should be drawn.
    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        self.options.edit_mode == EditMode::Edit && self.cursor_rect().is_some()
    }

    /// Size the laid-out text needs, padding included.
    ///
    /// Without lines there is still room for the cursor on one line.
    #[must_use]
    pub fn content_size(&self) -> (u32, u32) {
        let padding = self.options.padding;
        if self.lines.is_empty() {
            return (
                padding.horizontal() + self.options.cursor_width,
                padding.vertical() + self.default_line_height(),
            );
        }
        (
            self.lines.max_width() + padding.horizontal(),
            self.lines.lines_height() + padding.vertical(),
        )
    }

    // ========================================================================
    // Layout
    // ========================================================================

    fn default_line_height(&self) -> u32 {
        self.fonts
            .get(self.options.format.font)
            .map_or(0, |font| font.line_height())
    }

    fn text_area(&self) -> LayoutArea {
        let options = &self.options;
        LayoutArea {
            max_width: options
                .width
                .saturating_sub(options.padding.horizontal())
                .saturating_sub(options.cursor_width),
            max_height: options.height.saturating_sub(options.padding.vertical()),
            x: options.padding.left as i32,
            y: options.padding.top as i32,
        }
    }

    fn relayout(&mut self) {
        let area = self.text_area();
        let line_height = self.default_line_height();
        self.lines
            .draw(&self.document, &self.fonts, area, line_height);

        let options = &self.options;
        let inner_width = options.width.saturating_sub(options.padding.horizontal());
        let inner_height = options.height.saturating_sub(options.padding.vertical());
        self.lines.align_horizontal(inner_width, options.alignment);
        self.lines.align_vertical(inner_height, options.alignment);
        self.cursor
            .text_cursor_mut()
            .sync(&self.document, &self.lines);
    }

    fn refresh(&mut self) {
        self.relayout();
        self.ensure_cursor_visible();
    }

    fn notify_text_changed(&mut self) {
        let text = self.document.text();
        emit_event(
            "text_changed",
            &format!("{{\"len\":{}}}", text.chars().count()),
        );
        if let Some(callback) = self.on_text_changed.as_mut() {
            callback(&text);
        }
    }
}
