//! [`PageRenderer`] implementation on top of `genpdf`.

use std::io::Write;
use std::path::Path;

use genpdf::fonts::{Font, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::Size;
use image::DynamicImage;
use log::{debug, info};

use crate::config::{FontChoice, LayoutConfig, Orientation};
use crate::elements::{mm_from_f64, mm_to_f64, scaled_image, CanvasOp, PageCanvas};
use crate::error::{FlowError, Result};
use crate::fonts;
use crate::model::{ImageFrame, LayoutStyle, Point, TextFrame};
use crate::renderer::PageRenderer;
use crate::wrap::layout_cell;

const MM_PER_PT: f64 = 25.4 / 72.0;

/// Renders pages into a `genpdf::Document`.
///
/// The document's default font family is the arial stand-in; the courier
/// family is loaded the first time a style asks for it. Paper size and
/// orientation are fixed when the renderer is created.
pub struct GenpdfRenderer {
    document: genpdf::Document,
    canvas: PageCanvas,
    orientation: Orientation,
    pages: usize,
    mono: Option<FontFamily<Font>>,
    cell_padding: f64,
    line_width: f64,
}

impl GenpdfRenderer {
    /// Creates a renderer for the paper, orientation and title in `config`.
    pub fn new(config: &LayoutConfig) -> Result<Self> {
        let default_family = fonts::font_family(FontChoice::Arial).map_err(FlowError::FontLoad)?;
        let mut document = genpdf::Document::new(default_family);

        let (width, height) = config.paper_size_mm();
        document.set_paper_size(Size::new(mm_from_f64(width), mm_from_f64(height)));
        document.set_title(config.title.clone());
        debug!(
            "genpdf document {}x{} mm ({} {})",
            width, height, config.page_format, config.orientation
        );

        Ok(Self {
            document,
            canvas: PageCanvas::new(),
            orientation: config.orientation,
            pages: 1,
            mono: None,
            cell_padding: config.cell_padding,
            line_width: config.line_width,
        })
    }

    fn font_family(&mut self, choice: FontChoice) -> Result<Option<FontFamily<Font>>> {
        match choice {
            FontChoice::Arial => Ok(None),
            FontChoice::Courier => {
                if let Some(family) = self.mono {
                    return Ok(Some(family));
                }
                let data = fonts::font_family(FontChoice::Courier).map_err(FlowError::FontLoad)?;
                let family = self.document.add_font_family(data);
                self.mono = Some(family);
                Ok(Some(family))
            }
        }
    }

    fn text_style(&mut self, style: &LayoutStyle) -> Result<Style> {
        let mut text_style = Style::new();
        if let Some(family) = self.font_family(style.font)? {
            text_style.set_font_family(family);
        }
        text_style.set_font_size(style.size_pt);
        if style.bold {
            text_style.set_bold();
        }
        Ok(text_style)
    }

    fn finish_page(&mut self) {
        let canvas = std::mem::take(&mut self.canvas);
        if canvas.is_empty() {
            debug!("page {} finished blank", self.pages);
        } else {
            debug!("page {} finished with {} operations", self.pages, canvas.len());
        }
        self.document.push(canvas);
    }
}

/// Top of the glyph box for a line, roughly centred in its cell.
fn text_top(line_y: f64, line_height: f64, size_pt: u8) -> f64 {
    line_y + (line_height - f64::from(size_pt) * MM_PER_PT) / 2.0
}

impl PageRenderer for GenpdfRenderer {
    fn place_text(&mut self, frame: TextFrame, content: &str, style: &LayoutStyle) -> Result<f64> {
        let text_style = self.text_style(style)?;
        let font_cache = self.document.font_cache();
        let layout = layout_cell(
            &frame,
            content,
            style.alignment,
            self.cell_padding,
            |s: &str| mm_to_f64(StyledString::new(s.to_owned(), text_style).width(font_cache)),
        );

        for run in layout.runs {
            let top = text_top(run.position.y, frame.line_height, style.size_pt);
            self.canvas.push(CanvasOp::Text {
                position: Point::new(run.position.x, top),
                text: run.text,
                style: text_style,
            });
        }
        if let Some(points) = layout.border {
            self.canvas.push(CanvasOp::Line {
                points,
                thickness: self.line_width,
            });
        }
        Ok(layout.height)
    }

    fn draw_line(&mut self, from: Point, to: Point, thickness: f64) -> Result<()> {
        self.canvas.push(CanvasOp::Line {
            points: vec![from, to],
            thickness,
        });
        Ok(())
    }

    fn place_image(&mut self, path: &Path, image: DynamicImage, frame: ImageFrame) -> Result<f64> {
        let (image, height) = scaled_image(image, frame.width).map_err(|source| FlowError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        self.canvas.push(CanvasOp::Image {
            position: Point::new(frame.x, frame.y),
            image,
        });
        Ok(height)
    }

    fn start_new_page(&mut self, orientation: Orientation) -> Result<()> {
        if orientation != self.orientation {
            return Err(FlowError::OrientationChange {
                current: self.orientation,
                requested: orientation,
            });
        }
        self.finish_page();
        self.pages += 1;
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn serialize<W: Write>(mut self, writer: W) -> Result<()> {
        self.finish_page();
        info!("rendering {} page(s)", self.pages);
        self.document.render(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::text_top;

    #[test]
    fn body_text_sits_inside_its_cell() {
        let top = text_top(10.0, 4.5, 10);
        assert!(top > 10.0 && top < 11.0);
    }
}
