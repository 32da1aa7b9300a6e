//! Rich text markup loader.
//!
//! Markup is a fragment of XML whose elements restyle the text inside them:
//!
//! - `<text>` takes `font`, `size`, `weight`, `color` and `align` attributes;
//! - `<b>` is short for `<text weight="bold">`;
//! - `<br/>` and `<p>` break the line;
//! - `<token>name</token>` is replaced by the value registered for `name`.
//!
//! Fonts are chosen by [`FontFace`] (family, size and weight) and resolved to a
//! [`FontId`] through the faces registered on the [`RichTextParser`].
//!
//! # Examples
//!
//! ```
//! use blocktext::{FontFace, FontId, FontWeight, TextFormat};
//! use blocktext::text::RichTextParser;
//!
//! let regular = FontFace::new("sans", 12, FontWeight::Regular);
//! let parser = RichTextParser::new(TextFormat::default(), regular.clone())
//!     .with_face(regular.with_weight(FontWeight::Bold), FontId(1))
//!     .with_token("$NAME", "Ada");
//!
//! let rich = parser.parse("Hi <b><token>$NAME</token></b><br/>bye").unwrap();
//! assert_eq!(rich.document.text(), "Hi Ada\nbye");
//! assert_eq!(rich.document.blocks()[1].format().font, FontId(1));
//! ```

use std::collections::HashMap;

use roxmltree::{Document, Node};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::font::FontId;

use super::block::{BlockEnd, TextBlock};
use super::block_cursor::BlockCursor;
use super::document::TextDocument;
use super::format::TextFormat;
use super::geometry::HorizontalAlign;

/// Stroke weight of a font face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Regular,
    Light,
    Bold,
}

/// Font as markup names it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontFace {
    pub family: String,
    pub size: u32,
    pub weight: FontWeight,
}

impl FontFace {
    #[must_use]
    pub fn new(family: impl Into<String>, size: u32, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
        }
    }

    #[must_use]
    pub fn with_family(self, family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_size(self, size: u32) -> Self {
        Self { size, ..self }
    }

    #[must_use]
    pub fn with_weight(self, weight: FontWeight) -> Self {
        Self { weight, ..self }
    }
}

/// Parsed markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RichText {
    pub document: TextDocument,
    /// Last `align` attribute met, if any.
    pub alignment: Option<HorizontalAlign>,
}

/// Turns markup into a [`TextDocument`].
#[derive(Clone, Debug, Default)]
pub struct RichTextParser {
    base_format: TextFormat,
    base_face: FontFace,
    faces: HashMap<FontFace, FontId>,
    tokens: HashMap<String, String>,
}

const ROOT: &str = "text";

impl RichTextParser {
    /// Parser whose unstyled text uses `base_format`, described by `base_face`.
    #[must_use]
    pub fn new(base_format: TextFormat, base_face: FontFace) -> Self {
        let mut faces = HashMap::new();
        faces.insert(base_face.clone(), base_format.font);
        Self {
            base_format,
            base_face,
            faces,
            tokens: HashMap::new(),
        }
    }

    /// Register the font id that renders `face`.
    #[must_use]
    pub fn with_face(mut self, face: FontFace, font: FontId) -> Self {
        self.faces.insert(face, font);
        self
    }

    /// Register the replacement for `<token>name</token>`.
    #[must_use]
    pub fn with_token(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.tokens.insert(name.into(), value.to_string());
        self
    }

    /// Parse `markup` into blocks.
    ///
    /// Whitespace-only text between elements is dropped. Malformed XML fails
    /// with [`Error::Markup`]; unknown attributes and bad attribute values only
    /// log a warning.
    pub fn parse(&self, markup: &str) -> Result<RichText> {
        if markup.is_empty() {
            return Ok(RichText::default());
        }
        let wrapped = format!("<{ROOT}>{markup}</{ROOT}>");
        let xml = Document::parse(&wrapped).map_err(|err| {
            emit_log(LogLevel::Error, &format!("markup rejected: {err}"));
            Error::Markup(err.to_string())
        })?;

        let mut walker = Walker {
            parser: self,
            blocks: Vec::new(),
            alignment: None,
            add_empty_line: false,
            in_token: false,
        };
        let style = Style {
            format: self.base_format,
            face: self.base_face.clone(),
        };
        walker.walk(xml.root_element(), &style);

        let mut document = TextDocument::new();
        let mut cursor = BlockCursor::npos();
        for block in walker.blocks {
            cursor.add_text_block(&mut document, block);
        }
        emit_log(
            LogLevel::Debug,
            &format!("markup parsed into {} blocks", document.block_count()),
        );
        Ok(RichText {
            document,
            alignment: walker.alignment,
        })
    }

    fn resolve(&self, face: &FontFace, fallback: FontId) -> FontId {
        if let Some(&font) = self.faces.get(face) {
            return font;
        }
        emit_log(
            LogLevel::Warn,
            &format!(
                "no font registered for {} {} {:?}, keeping font {}",
                face.family, face.size, face.weight, fallback.0
            ),
        );
        fallback
    }
}

#[derive(Clone, Debug)]
struct Style {
    format: TextFormat,
    face: FontFace,
}

struct Walker<'p> {
    parser: &'p RichTextParser,
    blocks: Vec<TextBlock>,
    alignment: Option<HorizontalAlign>,
    add_empty_line: bool,
    in_token: bool,
}

impl Walker<'_> {
    fn walk(&mut self, node: Node<'_, '_>, style: &Style) {
        for child in node.children() {
            if child.is_text() {
                self.push_text(child.text().unwrap_or_default(), style);
                continue;
            }
            if !child.is_element() {
                continue;
            }
            match child.tag_name().name() {
                ROOT => {
                    let mut local = style.clone();
                    for attribute in child.attributes() {
                        self.apply(&mut local, attribute.name(), attribute.value());
                    }
                    self.walk(child, &local);
                }
                "b" => {
                    let mut local = style.clone();
                    self.apply(&mut local, "weight", "bold");
                    self.walk(child, &local);
                }
                "br" | "p" => {
                    self.enter_newline();
                    self.walk(child, style);
                    self.leave_newline(style);
                }
                "token" => {
                    self.in_token = true;
                    self.walk(child, style);
                    self.in_token = false;
                }
                other => {
                    emit_log(LogLevel::Debug, &format!("markup element <{other}> ignored"));
                    self.walk(child, style);
                }
            }
        }
    }

    fn apply(&mut self, style: &mut Style, name: &str, value: &str) {
        let mut face = style.face.clone();
        let valid = match name {
            "align" => {
                let (align, valid) = match value {
                    "left" => (HorizontalAlign::Left, true),
                    "center" => (HorizontalAlign::Center, true),
                    "right" => (HorizontalAlign::Right, true),
                    _ => (HorizontalAlign::Left, false),
                };
                self.alignment = Some(align);
                valid
            }
            "color" => match value.parse::<u8>() {
                Ok(intensity) if intensity <= Color::MAX => {
                    style.format.color = Color::new(intensity, 0);
                    true
                }
                _ => {
                    style.format.color = Color::BLACK;
                    false
                }
            },
            "font" => {
                face = face.with_family(value);
                true
            }
            "size" => match value.parse::<u32>() {
                Ok(size) => {
                    face = face.with_size(size);
                    true
                }
                Err(_) => false,
            },
            "weight" => {
                let (weight, valid) = match value {
                    "regular" => (FontWeight::Regular, true),
                    "light" => (FontWeight::Light, true),
                    "bold" => (FontWeight::Bold, true),
                    _ => (FontWeight::Regular, false),
                };
                face = face.with_weight(weight);
                valid
            }
            _ => {
                emit_log(LogLevel::Warn, &format!("unknown markup attribute {name:?}"));
                return;
            }
        };
        if !valid {
            emit_log(
                LogLevel::Warn,
                &format!("bad value {value:?} for markup attribute {name}, default used"),
            );
        }
        if face != style.face {
            style.format.font = self.parser.resolve(&face, style.format.font);
            style.face = face;
        }
    }

    fn push_text(&mut self, data: &str, style: &Style) {
        if data.trim().is_empty() {
            return;
        }
        let parser = self.parser;
        let data = if self.in_token {
            let name = data.trim();
            let Some(value) = parser.tokens.get(name) else {
                emit_log(LogLevel::Warn, &format!("no value for token {name:?}"));
                return;
            };
            value.as_str()
        } else {
            data
        };

        let mut pieces = data.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            let end = if pieces.peek().is_some() {
                BlockEnd::Newline
            } else {
                BlockEnd::None
            };
            self.blocks.push(TextBlock::with_end(piece, style.format, end));
        }
    }

    /// A break right after text ends that text's line; a break at the start
    /// or after another break adds an empty line.
    fn enter_newline(&mut self) {
        match self.blocks.last_mut() {
            Some(last) if last.end() != BlockEnd::Newline => {
                last.set_end(BlockEnd::Newline);
                self.add_empty_line = false;
            }
            _ => self.add_empty_line = true,
        }
    }

    fn leave_newline(&mut self, style: &Style) {
        let line_open = self
            .blocks
            .last()
            .is_some_and(|last| last.end() != BlockEnd::Newline);
        if self.add_empty_line && !line_open {
            self.blocks.push(TextBlock::empty(style.format));
        }
        self.add_empty_line = false;
        if let Some(last) = self.blocks.last_mut() {
            last.set_end(BlockEnd::Newline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sans() -> FontFace {
        FontFace::new("sans", 12, FontWeight::Regular)
    }

    fn parser() -> RichTextParser {
        RichTextParser::new(TextFormat::default(), sans())
            .with_face(sans().with_weight(FontWeight::Bold), FontId(1))
            .with_face(sans().with_size(20), FontId(2))
            .with_face(FontFace::new("serif", 12, FontWeight::Light), FontId(3))
    }

    fn texts(doc: &TextDocument) -> Vec<(String, BlockEnd)> {
        doc.blocks().iter().map(|b| (b.text(), b.end())).collect()
    }

    #[test]
    fn test_plain_text() {
        let rich = parser().parse("hello world").unwrap();
        assert_eq!(rich.document.text(), "hello world");
        assert_eq!(rich.document.block_count(), 1);
        assert_eq!(rich.alignment, None);
    }

    #[test]
    fn test_empty_markup() {
        let rich = parser().parse("").unwrap();
        assert_eq!(rich.document.block_count(), 0);
    }

    #[test]
    fn test_bold_short_node() {
        eprintln!("[TEST] <b> switches to the bold face");
        let rich = parser().parse("a<b>bold</b>c").unwrap();
        let fonts: Vec<FontId> = rich
            .document
            .blocks()
            .iter()
            .map(|b| b.format().font)
            .collect();
        assert_eq!(fonts, vec![FontId(0), FontId(1), FontId(0)]);
        assert_eq!(rich.document.text(), "aboldc");
    }

    #[test]
    fn test_text_attributes() {
        let rich = parser()
            .parse(r#"<text size="20" color="9">big</text><text font="serif" weight="light">thin</text>"#)
            .unwrap();
        let blocks = rich.document.blocks();
        assert_eq!(blocks[0].format().font, FontId(2));
        assert_eq!(blocks[0].format().color, Color::new(9, 0));
        assert_eq!(blocks[1].format().font, FontId(3));
        assert_eq!(blocks[1].format().color, Color::BLACK);
    }

    #[test]
    fn test_nested_styles_unwind() {
        let rich = parser()
            .parse(r#"<text color="5">x<b>y</b>z</text>w"#)
            .unwrap();
        let formats: Vec<(FontId, u8)> = rich
            .document
            .blocks()
            .iter()
            .map(|b| (b.format().font, b.format().color.intensity))
            .collect();
        assert_eq!(
            formats,
            vec![(FontId(0), 5), (FontId(1), 5), (FontId(0), 5), (FontId(0), 0)]
        );
    }

    #[test]
    fn test_bad_attribute_values_fall_back() {
        let rich = parser()
            .parse(r#"<text color="99" weight="heavy" size="big" shade="x">t</text>"#)
            .unwrap();
        let block = &rich.document.blocks()[0];
        assert_eq!(block.format().color, Color::BLACK);
        assert_eq!(block.format().font, FontId(0));
    }

    #[test]
    fn test_unregistered_face_keeps_font() {
        let rich = parser().parse(r#"<b>x<text size="99">y</text></b>"#).unwrap();
        assert_eq!(rich.document.blocks()[1].format().font, FontId(1));
    }

    #[test]
    fn test_line_breaks() {
        eprintln!("[TEST] <br/> ends the current line, repeated breaks add empty lines");
        let rich = parser().parse("a<br/>b<br/><br/>c").unwrap();
        assert_eq!(rich.document.text(), "a\nb\n\nc");

        let rich = parser().parse("<br/>x").unwrap();
        assert_eq!(rich.document.text(), "\nx");
    }

    #[test]
    fn test_paragraphs() {
        let rich = parser().parse("<p>one</p><p>two</p>").unwrap();
        assert_eq!(rich.document.text(), "one\ntwo\n");
        assert_eq!(
            texts(&rich.document),
            vec![
                ("one".to_string(), BlockEnd::Newline),
                ("two".to_string(), BlockEnd::Newline),
                (String::new(), BlockEnd::None),
            ]
        );
    }

    #[test]
    fn test_newlines_in_text_split_blocks() {
        let rich = parser().parse("ab\ncd").unwrap();
        assert_eq!(
            texts(&rich.document),
            vec![
                ("ab".to_string(), BlockEnd::Newline),
                ("cd".to_string(), BlockEnd::None),
            ]
        );
    }

    #[test]
    fn test_tokens() {
        let parser = parser().with_token("$COUNT", 3).with_token("$WHO", "you");
        let rich = parser
            .parse("<token>$WHO</token> have <token>$COUNT</token> <token>$NONE</token>new")
            .unwrap();
        assert_eq!(rich.document.text(), "you have 3new");
    }

    #[test]
    fn test_alignment_is_reported() {
        let rich = parser().parse(r#"<text align="center">mid</text>"#).unwrap();
        assert_eq!(rich.alignment, Some(HorizontalAlign::Center));
        let rich = parser().parse(r#"<text align="up">x</text>"#).unwrap();
        assert_eq!(rich.alignment, Some(HorizontalAlign::Left));
    }

    #[test]
    fn test_entities_are_decoded() {
        let rich = parser().parse("a &lt; b &amp; c").unwrap();
        assert_eq!(rich.document.text(), "a < b & c");
    }

    #[test]
    fn test_malformed_markup() {
        let result = parser().parse("<b>open");
        assert!(matches!(result, Err(Error::Markup(_))));
    }
}
