//! Property-based tests for the document model, cursors and word-wrap.
//!
//! Uses proptest to verify invariants that must hold across all valid inputs.

use blocktext::text::{LayoutArea, Step};
use blocktext::{
    BlockCursor, BlockEnd, CellFont, FontId, FontRegistry, LineBreak, Lines, LinesDrawStop, Move,
    NavigationDirection, TextBlock, TextCursor, TextDocument, TextFormat, TextLine,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Editing operations applied to both the document and a `String` oracle.
#[derive(Clone, Debug)]
enum Op {
    Insert(char),
    Backspace,
    Left,
    Right,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::sample::select(vec!['a', 'b', 'z', ' ', '.', 'é', '中']).prop_map(Op::Insert),
        2 => Just(Op::Backspace),
        1 => Just(Op::Left),
        1 => Just(Op::Right),
    ]
}

/// Lowercase words, spaces and newlines.
fn paragraph() -> impl Strategy<Value = String> {
    "[a-z \\n]{0,80}"
}

/// Blocks of two formats, some joined on one line and some ending in a
/// newline, assembled the way an editor appends them.
fn mixed_document() -> impl Strategy<Value = TextDocument> {
    prop::collection::vec(("[a-z ]{0,6}", any::<bool>(), any::<bool>()), 1..8).prop_map(
        |pieces| {
            let mut doc = TextDocument::new();
            let mut cursor = BlockCursor::npos();
            for (text, bold, newline) in pieces {
                let format = TextFormat::default().with_font(FontId(u16::from(bold)));
                let end = if newline {
                    BlockEnd::Newline
                } else {
                    BlockEnd::None
                };
                cursor.add_text_block(&mut doc, TextBlock::with_end(&text, format, end));
            }
            doc
        },
    )
}

/// Interior blocks without a newline; their end and the next block's head
/// are two cursor slots at one text position.
fn joined_boundaries(doc: &TextDocument) -> usize {
    let interior = doc.block_count().saturating_sub(1);
    doc.blocks()[..interior]
        .iter()
        .filter(|block| block.end() == BlockEnd::None)
        .count()
}

fn unit_fonts() -> FontRegistry {
    FontRegistry::with_font(CellFont::new(1, 1))
}

fn layout(doc: &TextDocument, width: u32) -> Lines {
    let mut lines = Lines::new();
    lines.draw(doc, &unit_fonts(), LayoutArea::unbounded_height(width), 1);
    lines
}

// ============================================================================
// Editing Properties
// ============================================================================

proptest! {
    /// Inserting, deleting and moving keeps the document equal to a plain string.
    #[test]
    fn edits_match_string_oracle(ops in prop::collection::vec(op(), 0..80)) {
        let mut doc = TextDocument::new();
        let mut cursor = TextCursor::new(BlockCursor::npos());
        let mut oracle: Vec<char> = Vec::new();
        let mut index = 0usize;

        for op in ops {
            match op {
                Op::Insert(c) => {
                    prop_assert!(cursor.add_char(&mut doc, c, TextFormat::default()).is_ok());
                    oracle.insert(index, c);
                    index += 1;
                }
                Op::Backspace if doc.block_count() > 0 => {
                    let removed = cursor.remove_char(&mut doc);
                    prop_assert_eq!(removed, Ok(index > 0));
                    if index > 0 {
                        index -= 1;
                        oracle.remove(index);
                    }
                }
                Op::Left if doc.block_count() > 0 => {
                    let moved = cursor.move_cursor(&doc, NavigationDirection::Left);
                    if index > 0 {
                        prop_assert_eq!(moved, Move::Left);
                        index -= 1;
                    } else {
                        prop_assert_eq!(moved, Move::Start);
                    }
                }
                Op::Right if doc.block_count() > 0 => {
                    let moved = cursor.move_cursor(&doc, NavigationDirection::Right);
                    if index < oracle.len() {
                        prop_assert_eq!(moved, Move::Right);
                        index += 1;
                    } else {
                        prop_assert_eq!(moved, Move::End);
                    }
                }
                _ => {}
            }
            let expected: String = oracle.iter().collect();
            prop_assert_eq!(doc.text(), expected);
            if doc.block_count() > 0 {
                prop_assert_eq!(doc.absolute_position(cursor.block_cursor()), Some(index));
            }
        }
    }

    /// Stepping visits every slot: `len` steps plus one per joined boundary
    /// lead from the head to the end, and as many steps back return.
    #[test]
    fn traversal_is_complete(doc in mixed_document()) {
        prop_assume!(doc.block_count() > 0);
        let steps = doc.len() + joined_boundaries(&doc);
        let mut cursor = BlockCursor::begin(&doc);

        for _ in 0..steps {
            prop_assert!(!cursor.at_end(&doc));
            prop_assert_ne!(cursor.step_forward(&doc), Step::Stuck);
        }
        prop_assert!(cursor.at_end(&doc));
        prop_assert_eq!(cursor.step_forward(&doc), Step::Stuck);

        for _ in 0..steps {
            prop_assert_ne!(cursor.step_back(&doc), Step::Stuck);
        }
        prop_assert!(cursor.at_begin());
    }

    /// Text cursor moves merge joined slots: exactly `len` moves cross the
    /// document each way, one text position at a time.
    #[test]
    fn text_cursor_moves_once_per_character(doc in mixed_document()) {
        prop_assume!(doc.block_count() > 0);
        let mut cursor = TextCursor::new(BlockCursor::begin(&doc));

        for expected in 1..=doc.len() {
            prop_assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Right), Move::Right);
            prop_assert_eq!(doc.absolute_position(cursor.block_cursor()), Some(expected));
            prop_assert_eq!(cursor.on_screen_position(), expected);
        }
        prop_assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Right), Move::End);

        for expected in (0..doc.len()).rev() {
            prop_assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Left), Move::Left);
            prop_assert_eq!(doc.absolute_position(cursor.block_cursor()), Some(expected));
        }
        prop_assert_eq!(cursor.move_cursor(&doc, NavigationDirection::Left), Move::Start);
        prop_assert!(cursor.block_cursor().at_begin());
    }

    /// Plain paragraphs have no joined boundaries.
    #[test]
    fn paragraph_traversal_takes_len_steps(text in paragraph()) {
        prop_assume!(!text.is_empty());
        let doc = TextDocument::from_text(&text, TextFormat::default());
        prop_assert_eq!(joined_boundaries(&doc), 0);
        let mut cursor = BlockCursor::begin(&doc);
        cursor.advance(&doc, doc.len());
        prop_assert!(cursor.at_end(&doc));
    }

    /// Every in-document offset maps to a cursor and back.
    #[test]
    fn absolute_positions_round_trip(doc in mixed_document()) {
        for position in 0..doc.len() {
            let cursor = doc.block_cursor(position);
            prop_assert_eq!(doc.absolute_position(&cursor), Some(position));
        }
    }
}

// ============================================================================
// Word-wrap Properties
// ============================================================================

proptest! {
    /// No line is wider than the layout width, and the lines consume the
    /// whole document.
    #[test]
    fn lines_fit_width_and_cover_text(text in paragraph(), width in 1u32..30) {
        let doc = TextDocument::from_text(&text, TextFormat::default());
        let lines = layout(&doc, width);

        for line in lines.iter() {
            prop_assert!(line.width() <= width,
                "line {:?} is {} wide, limit {}", line.text(), line.width(), width);
        }
        let consumed: usize = lines.iter().map(TextLine::len).sum();
        prop_assert_eq!(consumed, doc.len());
        prop_assert_eq!(lines.stop(), LinesDrawStop::OutOfText);
    }

    /// A word longer than the line is cut one short of the fit and dashed.
    #[test]
    fn long_words_are_dashed(word in "[a-z]{1,60}", width in 2u32..20) {
        prop_assume!(word.len() > width as usize);
        let doc = TextDocument::from_text(&word, TextFormat::default());
        let lines = layout(&doc, width);

        let first = lines.first().expect("a long word yields lines");
        prop_assert!(first.flags().contains(LineBreak::DASH));
        prop_assert_eq!(first.len(), width as usize - 1);
        prop_assert!(first.text().ends_with('-'));
        prop_assert_eq!(first.text().chars().count(), width as usize);
    }
}
