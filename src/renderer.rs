//! The page-rendering capability the flow draws through.
//!
//! [`PageRenderer`] is the seam between layout decisions and the library that
//! produces PDF bytes. Coordinates are absolute millimetres from the top-left
//! corner of the current page; the flow owns the cursor and passes explicit
//! positions to every call.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use log::trace;

use crate::config::Orientation;
use crate::elements::scaled_height;
use crate::error::Result;
use crate::model::{ImageFrame, LayoutStyle, Point, TextFrame};
use crate::wrap::wrap_text;

/// Primitive drawing operations on a paged document.
pub trait PageRenderer {
    /// Places `content` as a multi-line cell and returns the height it occupies.
    fn place_text(&mut self, frame: TextFrame, content: &str, style: &LayoutStyle) -> Result<f64>;

    /// Draws a straight line of the given thickness.
    fn draw_line(&mut self, from: Point, to: Point, thickness: f64) -> Result<()>;

    /// Places `image`, decoded from `path`, and returns its rendered height.
    fn place_image(&mut self, path: &Path, image: DynamicImage, frame: ImageFrame) -> Result<f64>;

    /// Finishes the current page and starts a new one.
    fn start_new_page(&mut self, orientation: Orientation) -> Result<()>;

    /// Number of pages started so far, the current one included.
    fn page_count(&self) -> usize;

    /// Writes the finished document to `writer`.
    fn serialize<W: Write>(self, writer: W) -> Result<()>
    where
        Self: Sized;
}

/// A primitive call captured by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOp {
    Text {
        page: usize,
        frame: TextFrame,
        content: String,
        style: LayoutStyle,
        height: f64,
    },
    Line {
        page: usize,
        from: Point,
        to: Point,
        thickness: f64,
    },
    Image {
        page: usize,
        path: PathBuf,
        frame: ImageFrame,
        height: f64,
    },
    NewPage {
        orientation: Orientation,
    },
}

/// In-memory renderer that records every call instead of drawing.
///
/// Text is wrapped only on explicit newlines unless a character width is set
/// with [`RecordingRenderer::with_char_width`], in which case every glyph is
/// assumed to have that width. `serialize` writes a plain-text listing of the
/// recorded operations, which makes the renderer usable for dry runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    ops: Vec<RenderOp>,
    pages: usize,
    char_width: Option<f64>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            pages: 1,
            char_width: None,
        }
    }

    /// Enables width-based wrapping with a fixed glyph width in millimetres.
    pub fn with_char_width(mut self, char_width: f64) -> Self {
        self.char_width = Some(char_width);
        self
    }

    /// All recorded operations in call order.
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Number of page breaks requested so far.
    pub fn page_breaks(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RenderOp::NewPage { .. }))
            .count()
    }

    /// Recorded text placements as `(page, y, content)`.
    pub fn texts(&self) -> Vec<(usize, f64, &str)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::Text {
                    page,
                    frame,
                    content,
                    ..
                } => Some((*page, frame.y, content.as_str())),
                _ => None,
            })
            .collect()
    }

    fn line_count(&self, frame: &TextFrame, content: &str) -> usize {
        match self.char_width {
            Some(char_width) => {
                wrap_text(content, frame.width, |s| s.chars().count() as f64 * char_width).len()
            }
            None => content.lines().count().max(1),
        }
    }
}

impl PageRenderer for RecordingRenderer {
    fn place_text(&mut self, frame: TextFrame, content: &str, style: &LayoutStyle) -> Result<f64> {
        let height = self.line_count(&frame, content) as f64 * frame.line_height;
        trace!("record text at y={:.2} height={:.2}", frame.y, height);
        self.ops.push(RenderOp::Text {
            page: self.pages,
            frame,
            content: content.to_owned(),
            style: *style,
            height,
        });
        Ok(height)
    }

    fn draw_line(&mut self, from: Point, to: Point, thickness: f64) -> Result<()> {
        self.ops.push(RenderOp::Line {
            page: self.pages,
            from,
            to,
            thickness,
        });
        Ok(())
    }

    fn place_image(&mut self, path: &Path, image: DynamicImage, frame: ImageFrame) -> Result<f64> {
        let height = scaled_height(&image, frame.width);
        self.ops.push(RenderOp::Image {
            page: self.pages,
            path: path.to_path_buf(),
            frame,
            height,
        });
        Ok(height)
    }

    fn start_new_page(&mut self, orientation: Orientation) -> Result<()> {
        self.pages += 1;
        self.ops.push(RenderOp::NewPage { orientation });
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn serialize<W: Write>(self, mut writer: W) -> Result<()> {
        for op in &self.ops {
            match op {
                RenderOp::Text {
                    page,
                    frame,
                    content,
                    height,
                    ..
                } => writeln!(
                    writer,
                    "p{page} text y={:.2} h={height:.2} {content:?}",
                    frame.y
                )?,
                RenderOp::Line {
                    page,
                    from,
                    to,
                    thickness,
                } => writeln!(
                    writer,
                    "p{page} line ({:.2},{:.2})-({:.2},{:.2}) w={thickness}",
                    from.x, from.y, to.x, to.y
                )?,
                RenderOp::Image {
                    page, path, height, ..
                } => writeln!(writer, "p{page} image {} h={height:.2}", path.display())?,
                RenderOp::NewPage { orientation } => writeln!(writer, "new page {orientation}")?,
            }
        }
        writer.flush()?;
        Ok(())
    }
}
