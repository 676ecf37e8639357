//! `genpdf` elements used by the genpdf backend.
//!
//! `genpdf` lays out elements one after another down the page. The flow in
//! this crate makes its own pagination decisions instead, so every page is
//! collected into a single [`PageCanvas`] whose operations carry absolute
//! positions. A canvas always consumes its whole page, which makes `genpdf`
//! start a fresh page for the next canvas.
//!
//! The module also hosts the image helpers shared by the flow and the renderers.

use std::path::Path;

use image::GenericImageView;
use log::trace;

use genpdf::elements::Image;
use genpdf::error::{Context as _, Error};
use genpdf::style::{LineStyle, Style};
use genpdf::{render, Element, Mm, Position, RenderResult, Scale, Size};

use crate::model::Point;

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn position(point: Point) -> Position {
    Position::new(mm_from_f64(point.x), mm_from_f64(point.y))
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Height in millimetres of `image` drawn `width_mm` wide, keeping its aspect ratio.
pub fn scaled_height(image: &image::DynamicImage, width_mm: f64) -> f64 {
    let (px_width, px_height) = image.dimensions();
    if px_width == 0 {
        return 0.0;
    }
    width_mm * f64::from(px_height) / f64::from(px_width)
}

/// Converts a decoded image into a `genpdf` image scaled to `width_mm`,
/// returning it with its rendered height.
pub fn scaled_image(dynamic: image::DynamicImage, width_mm: f64) -> Result<(Image, f64), Error> {
    let height = scaled_height(&dynamic, width_mm);
    let natural_width = mm_to_f64(estimated_image_size(&dynamic, DEFAULT_IMAGE_DPI).width);
    let mut image = Image::from_dynamic_image(dynamic)?;
    if natural_width > f64::EPSILON {
        let scale = width_mm / natural_width;
        image.set_scale(Scale::new(scale, scale));
    }
    Ok((image, height))
}

/// A drawing operation positioned relative to the top-left corner of the page.
pub enum CanvasOp {
    /// A single line of text; `position` is the top of the line box.
    Text {
        position: Point,
        text: String,
        style: Style,
    },
    /// A polyline through `points`.
    Line { points: Vec<Point>, thickness: f64 },
    /// An already scaled image whose top-left corner sits at `position`.
    Image { position: Point, image: Image },
}

/// All content of one page.
#[derive(Default)]
pub struct PageCanvas {
    ops: Vec<CanvasOp>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: CanvasOp) {
        self.ops.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

impl Element for PageCanvas {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        for op in &mut self.ops {
            match op {
                CanvasOp::Text {
                    position: at,
                    text,
                    style: text_style,
                } => {
                    let printed = area.print_str(
                        &context.font_cache,
                        position(*at),
                        style.and(*text_style),
                        text.as_str(),
                    )?;
                    if !printed {
                        trace!("clipped text line at y={:.2}", at.y);
                    }
                }
                CanvasOp::Line { points, thickness } => {
                    let line_style = LineStyle::new().with_thickness(mm_from_f64(*thickness));
                    area.draw_line(
                        points.iter().copied().map(position).collect::<Vec<_>>(),
                        line_style,
                    );
                }
                CanvasOp::Image { position: at, image } => {
                    let mut image_area = area.clone();
                    image_area.add_offset(position(*at));
                    image.render(context, image_area, style)?;
                }
            }
        }

        let mut result = RenderResult::default();
        result.size = area.size();
        Ok(result)
    }
}
