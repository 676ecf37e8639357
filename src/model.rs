//! Data structures describing pages, paragraphs and text styles.
//!
//! The types in this module carry no reference to the rendering crate so the
//! flow logic can be exercised against any [`PageRenderer`] implementation.
//! All lengths are millimetres measured from the top-left corner of the page.
//!
//! [`PageRenderer`]: crate::renderer::PageRenderer

use crate::config::{FontChoice, LayoutConfig};

/// Horizontal alignment of text inside its cell.
///
/// Applied per wrapped line by [`crate::wrap::layout_cell`]; `Justified`
/// spreads the inter-word space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
    /// Fully justified lines.
    Justified,
}

/// Font, size and fixed line height used to place a block of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutStyle {
    pub font: FontChoice,
    pub size_pt: u8,
    pub bold: bool,
    pub alignment: Alignment,
    /// Height of one line in millimetres.
    pub line_height: f64,
}

impl LayoutStyle {
    /// Body text style.
    ///
    /// The line height is `72 / size * (size / 16)`, a constant per style rather
    /// than a measurement of the font.
    pub fn body(font: FontChoice, size_pt: u8) -> Self {
        let size = f64::from(size_pt.max(1));
        Self {
            font,
            size_pt,
            bold: false,
            alignment: Alignment::Left,
            line_height: 72.0 / size * (size / 16.0),
        }
    }

    /// Bold heading style with a line height of `72 / size`.
    pub fn heading(font: FontChoice, size_pt: u8) -> Self {
        Self {
            font,
            size_pt,
            bold: true,
            alignment: Alignment::Left,
            line_height: 72.0 / f64::from(size_pt.max(1)),
        }
    }

    /// Sets the alignment and returns the updated style.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Overrides the line height and returns the updated style.
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

}

/// A page being filled, together with its write cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    width: f64,
    height: f64,
    margin_horizontal: f64,
    margin_vertical: f64,
    cursor_y: f64,
    number: usize,
}

impl Page {
    /// Creates page number 1 with the cursor on the top margin.
    pub fn new(width: f64, height: f64, margin_horizontal: f64, margin_vertical: f64) -> Self {
        Self {
            width,
            height,
            margin_horizontal,
            margin_vertical,
            cursor_y: margin_vertical,
            number: 1,
        }
    }

    /// Creates the first page described by `config`.
    pub fn from_config(config: &LayoutConfig) -> Self {
        let (width, height) = config.paper_size_mm();
        Self::new(
            width,
            height,
            config.margin_horizontal,
            config.margin_vertical,
        )
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn margin_horizontal(&self) -> f64 {
        self.margin_horizontal
    }

    pub fn margin_vertical(&self) -> f64 {
        self.margin_vertical
    }

    /// Current vertical write position.
    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    /// 1-based number of the page currently being filled.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.width - self.margin_horizontal * 2.0
    }

    /// Space left below the cursor: `height - 2 * margin_vertical - cursor_y`.
    ///
    /// The top margin is counted twice (once here, once inside `cursor_y`),
    /// which keeps a margin-sized safety band at the bottom of every page.
    pub fn available_height(&self) -> f64 {
        self.height - self.margin_vertical * 2.0 - self.cursor_y
    }

    /// Whether the cursor still sits on the top margin.
    pub fn at_top(&self) -> bool {
        self.cursor_y <= self.margin_vertical
    }

    /// Moves the cursor down by `delta`.
    pub fn advance(&mut self, delta: f64) {
        self.cursor_y += delta;
    }

    /// Moves the cursor to an absolute position.
    pub fn set_cursor_y(&mut self, y: f64) {
        self.cursor_y = y;
    }

    /// Starts the next page: the cursor returns to the top margin.
    pub fn break_page(&mut self) {
        self.cursor_y = self.margin_vertical;
        self.number += 1;
    }
}

/// One block of text between blank lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The explicit lines of the paragraph.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Number of explicit lines; an empty paragraph has none.
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }
}

impl From<&str> for Paragraph {
    fn from(text: &str) -> Self {
        Paragraph::new(text)
    }
}

impl From<String> for Paragraph {
    fn from(text: String) -> Self {
        Paragraph::new(text)
    }
}

/// Separator between paragraphs in source text.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Splits a text block into paragraphs on blank-line boundaries.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    text.split(PARAGRAPH_SEPARATOR).map(Paragraph::from).collect()
}

/// Converts CRLF line endings to LF so blank-line separators are recognised
/// in text written on Windows.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Joins paragraphs back with blank lines; the inverse of [`split_paragraphs`].
pub fn join_paragraphs(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(Paragraph::text)
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// A point on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where a block of text goes: top-left corner, cell width and line height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub line_height: f64,
    /// Draw a rectangle around the rendered block.
    pub border: bool,
}

impl TextFrame {
    pub fn new(x: f64, y: f64, width: f64, line_height: f64) -> Self {
        Self {
            x,
            y,
            width,
            line_height,
            border: false,
        }
    }

    /// Sets the border flag and returns the updated frame.
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }
}

/// Where an image goes: top-left corner and rendered width.
///
/// The height follows from the image's aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}
