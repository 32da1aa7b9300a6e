//! Document editing and layout performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use blocktext::text::LayoutArea;
use blocktext::{
    BlockCursor, CellFont, EditorOptions, FontRegistry, Lines, NavigationDirection, TextDocument,
    TextEditor, TextFormat,
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const PARAGRAPH: &str = "The quick brown fox jumps over the lazy dog. \
    Pack my box with five dozen liquor jugs. \
    How vexingly quick daft zebras jump!\n";

fn fonts() -> FontRegistry {
    FontRegistry::with_font(CellFont::new(8, 16))
}

fn document_ops(c: &mut Criterion) {
    let text = PARAGRAPH.repeat(50);

    c.bench_function("document_from_text_50_paragraphs", |b| {
        b.iter(|| TextDocument::from_text(black_box(&text), TextFormat::default()));
    });

    let doc = TextDocument::from_text(&text, TextFormat::default());
    c.bench_function("document_text", |b| {
        b.iter(|| black_box(&doc).text());
    });

    c.bench_function("document_block_cursor_middle", |b| {
        let middle = doc.len() / 2;
        b.iter(|| black_box(&doc).block_cursor(black_box(middle)));
    });

    c.bench_function("block_cursor_walk_whole_document", |b| {
        b.iter(|| {
            let mut cursor = BlockCursor::begin(&doc);
            cursor.advance(&doc, black_box(doc.len()));
            cursor
        });
    });
}

fn layout_ops(c: &mut Criterion) {
    let fonts = fonts();
    let short = TextDocument::from_text(PARAGRAPH, TextFormat::default());
    let long = TextDocument::from_text(&PARAGRAPH.repeat(50), TextFormat::default());

    c.bench_function("lines_draw_paragraph", |b| {
        b.iter(|| {
            let mut lines = Lines::new();
            lines.draw(black_box(&short), &fonts, LayoutArea::unbounded_height(320), 16);
            lines
        });
    });

    c.bench_function("lines_draw_50_paragraphs", |b| {
        b.iter(|| {
            let mut lines = Lines::new();
            lines.draw(black_box(&long), &fonts, LayoutArea::unbounded_height(320), 16);
            lines
        });
    });

    c.bench_function("lines_draw_window_480x600", |b| {
        let area = LayoutArea {
            max_width: 480,
            max_height: 600,
            x: 0,
            y: 0,
        };
        b.iter(|| {
            let mut lines = Lines::new();
            lines.draw(black_box(&long), &fonts, area, 16);
            lines
        });
    });
}

fn editor_ops(c: &mut Criterion) {
    c.bench_function("editor_type_sentence", |b| {
        b.iter(|| {
            let mut editor = TextEditor::new_with_options(fonts(), EditorOptions::default());
            for ch in black_box("The quick brown fox jumps over the lazy dog.").chars() {
                let _ = editor.add_char(ch);
            }
            editor
        });
    });

    let mut editor = TextEditor::new_with_options(fonts(), EditorOptions::default());
    editor.set_text(&PARAGRAPH.repeat(5));
    c.bench_function("editor_navigate_up_down", |b| {
        b.iter(|| {
            editor.navigate(black_box(NavigationDirection::Up));
            editor.navigate(black_box(NavigationDirection::Down));
        });
    });
}

criterion_group!(benches, document_ops, layout_ops, editor_ops);
criterion_main!(benches);
