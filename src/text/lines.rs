//! The laid-out set of visual lines.

use crate::event::{LogLevel, emit_event, emit_log};
use crate::font::FontRegistry;

use super::block::BlockEnd;
use super::block_cursor::BlockCursor;
use super::document::TextDocument;
use super::geometry::Alignment;
use super::line::{DrawFragment, TextLine};

/// Why the last layout stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinesDrawStop {
    /// No layout ran yet.
    #[default]
    None,
    /// The whole document from the window start was laid out.
    OutOfText,
    /// More text remains below the area.
    OutOfSpace,
}

/// Space available to a layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutArea {
    pub max_width: u32,
    pub max_height: u32,
    /// Origin of the first line.
    pub x: i32,
    pub y: i32,
}

impl LayoutArea {
    /// Area at the origin with unbounded height.
    #[must_use]
    pub fn unbounded_height(max_width: u32) -> Self {
        Self {
            max_width,
            max_height: u32::MAX,
            x: 0,
            y: 0,
        }
    }
}

/// Ordered visual lines of one layout pass.
///
/// Layout always rebuilds every line, starting at the window start. Scrolling
/// moves the window one line at a time and remembers earlier starts so it can
/// move back.
#[derive(Clone, Debug, Default)]
pub struct Lines {
    lines: Vec<TextLine>,
    stop: LinesDrawStop,
    draw_start: BlockCursor,
    previous_lines_start: Vec<BlockCursor>,
    origin: (i32, i32),
}

impl Lines {
    /// Empty set with the window at the document head.
    #[must_use]
    pub fn new() -> Self {
        Self {
            draw_start: BlockCursor::at(0, 0),
            ..Self::default()
        }
    }

    /// Rebuild all lines from the window start.
    ///
    /// `empty_line_height` sizes the line a cursor stands on after a final
    /// newline.
    pub fn draw(
        &mut self,
        doc: &TextDocument,
        fonts: &FontRegistry,
        area: LayoutArea,
        empty_line_height: u32,
    ) {
        self.lines.clear();
        self.stop = LinesDrawStop::None;
        self.origin = (area.x, area.y);

        let (block, pos) = self.draw_start.coords().unwrap_or((0, 0));
        let mut cursor = BlockCursor::new(doc, pos, block);
        let mut used_height = 0u32;

        loop {
            let mut line = TextLine::build(doc, fonts, &mut cursor, area.max_width);

            if line.is_empty() && line.is_line_end() {
                let after_newline = match self.lines.last() {
                    Some(last) => last.end() == BlockEnd::Newline,
                    None => starts_after_newline(doc, &line.start()),
                };
                if after_newline {
                    line.set_height(empty_line_height);
                    if used_height.saturating_add(empty_line_height) > area.max_height {
                        self.stop = LinesDrawStop::OutOfSpace;
                        break;
                    }
                    self.push(line, &mut used_height);
                }
                self.stop = LinesDrawStop::OutOfText;
                break;
            }

            if line.is_empty() {
                emit_log(LogLevel::Warn, "no character fits the line width");
                self.stop = LinesDrawStop::OutOfSpace;
                break;
            }

            if used_height.saturating_add(line.height()) > area.max_height {
                self.stop = LinesDrawStop::OutOfSpace;
                break;
            }

            let last = line.is_line_end();
            self.push(line, &mut used_height);
            if last {
                self.stop = LinesDrawStop::OutOfText;
                break;
            }
        }

        emit_log(
            LogLevel::Debug,
            &format!("layout: {} lines, stop {:?}", self.lines.len(), self.stop),
        );
        emit_event("lines_rebuilt", &format!("{{\"lines\":{}}}", self.lines.len()));
    }

    fn push(&mut self, mut line: TextLine, used_height: &mut u32) {
        let y = self.origin.1 + *used_height as i32;
        line.set_position(self.origin.0, y);
        *used_height = used_height.saturating_add(line.height());
        self.lines.push(line);
    }

    /// Drop all lines and return the window to the document head.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of laid-out lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if nothing was laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines that consumed any text; the empty line after a final newline is
    /// not counted.
    #[must_use]
    pub fn count_visible(&self) -> usize {
        self.lines.iter().filter(|line| !line.is_empty()).count()
    }

    /// Line at `index`.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&TextLine> {
        self.lines.get(index)
    }

    /// First line.
    #[must_use]
    pub fn first(&self) -> Option<&TextLine> {
        self.lines.first()
    }

    /// Last line.
    #[must_use]
    pub fn last(&self) -> Option<&TextLine> {
        self.lines.last()
    }

    /// Iterate the lines.
    pub fn iter(&self) -> impl Iterator<Item = &TextLine> {
        self.lines.iter()
    }

    /// Why the last layout stopped.
    #[must_use]
    pub fn stop(&self) -> LinesDrawStop {
        self.stop
    }

    /// Sum of line heights.
    #[must_use]
    pub fn lines_height(&self) -> u32 {
        self.lines.iter().map(TextLine::height).sum()
    }

    /// Widest line.
    #[must_use]
    pub fn max_width(&self) -> u32 {
        self.lines.iter().map(TextLine::width).max().unwrap_or(0)
    }

    /// Where layout begins.
    #[must_use]
    pub fn draw_start(&self) -> BlockCursor {
        self.draw_start
    }

    /// True if the window was scrolled down.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        !self.previous_lines_start.is_empty()
    }

    /// Shift the window down one line. The caller relays out afterwards.
    pub fn scroll_down(&mut self) -> bool {
        if self.stop == LinesDrawStop::OutOfText {
            return false;
        }
        let Some(first) = self.lines.first() else {
            return false;
        };
        let next = self.lines.get(1).map_or(first.resume(), TextLine::start);
        if next == first.start() {
            return false;
        }
        self.previous_lines_start.push(first.start());
        self.draw_start = next;
        true
    }

    /// Shift the window up one line. The caller relays out afterwards.
    pub fn scroll_up(&mut self) -> bool {
        match self.previous_lines_start.pop() {
            Some(start) => {
                self.draw_start = start;
                true
            }
            None => false,
        }
    }

    /// Place each line horizontally inside `width`.
    pub fn align_horizontal(&mut self, width: u32, alignment: Alignment) {
        let origin_x = self.origin.0;
        for line in &mut self.lines {
            let (_, y) = line.position();
            let offset = alignment.horizontal_offset(width, line.width());
            line.set_position(origin_x + offset as i32, y);
        }
    }

    /// Place the block of lines vertically inside `height`.
    pub fn align_vertical(&mut self, height: u32, alignment: Alignment) {
        let offset = alignment.vertical_offset(height, self.lines_height());
        let mut y = self.origin.1 + offset as i32;
        for line in &mut self.lines {
            let (x, _) = line.position();
            line.set_position(x, y);
            y += line.height() as i32;
        }
    }

    /// All fragments with absolute coordinates.
    #[must_use]
    pub fn fragments(&self) -> Vec<DrawFragment> {
        let mut out = Vec::new();
        for line in &self.lines {
            let (x, y) = line.position();
            for fragment in line.fragments() {
                let mut absolute = fragment.clone();
                absolute.x += x;
                absolute.y += y;
                out.push(absolute);
            }
        }
        out
    }
}

/// True if `start` is the head of a block that follows a hard break.
fn starts_after_newline(doc: &TextDocument, start: &BlockCursor) -> bool {
    match start.coords() {
        Some((block, 0)) if block > 0 => doc
            .block(block - 1)
            .is_some_and(|prev| prev.end() == BlockEnd::Newline),
        _ => false,
    }
}
