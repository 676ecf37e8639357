//! Draws a text box made of box-drawing characters on an A5 page.

use std::path::Path;

use crate::backend::GenpdfRenderer;
use crate::config::{FontChoice, LayoutConfig, PageFormat};
use crate::error::Result;
use crate::model::{LayoutStyle, TextFrame};
use crate::renderer::PageRenderer;

const BOX_INNER_WIDTH: usize = 51;

/// Surrounds `lines` with a box, centring each line in `inner_width` columns.
pub fn boxed(lines: &[&str], inner_width: usize) -> String {
    let rule = "─".repeat(inner_width);
    let mut rows = vec![format!("┌{rule}┐"), format!("│{}│", " ".repeat(inner_width))];
    for line in lines {
        let len = line.chars().count().min(inner_width);
        let left = (inner_width - len) / 2;
        let right = inner_width - len - left;
        let text: String = line.chars().take(len).collect();
        rows.push(format!("│{}{}{}│", " ".repeat(left), text, " ".repeat(right)));
    }
    rows.push(format!("│{}│", " ".repeat(inner_width)));
    rows.push(format!("└{rule}┘"));
    rows.join("\n")
}

/// Places the box in the top-left corner of the page, ignoring the margins.
pub fn draw<R: PageRenderer>(renderer: &mut R, page_width: f64) -> Result<f64> {
    let style = LayoutStyle::body(FontChoice::Courier, 12);
    let frame = TextFrame::new(0.0, 0.0, page_width, style.line_height);
    renderer.place_text(
        frame,
        &boxed(&["TEST STRING IN", "A BOX."], BOX_INNER_WIDTH),
        &style,
    )
}

/// Renders the box on an A5 page and writes it to `output`.
pub fn run(output: &Path) -> Result<()> {
    let config = LayoutConfig::new()
        .with_page_format(PageFormat::A5)
        .with_title("Boxed text");
    let (page_width, _) = config.paper_size_mm();
    let mut renderer = GenpdfRenderer::new(&config)?;
    draw(&mut renderer, page_width)?;
    renderer.serialize(std::io::BufWriter::new(std::fs::File::create(output)?))
}
