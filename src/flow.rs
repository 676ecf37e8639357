//! Document flow: the cursor-driven builder and its page-break estimator.
//!
//! [`DocumentFlow`] owns a [`PageRenderer`] and the [`Page`] being filled.
//! Every operation places content at the cursor, asks the renderer how tall
//! the result is and moves the cursor down by that amount. The only layout
//! decision taken here is whether a paragraph should start on a new page; see
//! [`needs_page_break`].

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info};

use crate::config::{FontChoice, LayoutConfig};
use crate::elements::{decode_image_from_path, scaled_height};
use crate::error::{FlowError, Result};
use crate::model::{ImageFrame, LayoutStyle, Page, Paragraph, Point, TextFrame};
use crate::renderer::PageRenderer;

/// Whether the paragraph at `index` must be moved to a new page.
///
/// A paragraph breaks when its estimated height exceeds the space left on the
/// page, except for the first paragraph of a sequence, which is always placed
/// where it is. A paragraph taller than a whole page is therefore never pushed
/// around forever; it overflows the page instead.
pub fn needs_page_break(required_height: f64, available_height: f64, index: usize) -> bool {
    index != 0 && required_height > available_height
}

/// Where one paragraph ended up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphPlacement {
    /// A page break was inserted right before the paragraph.
    pub page_break_before: bool,
    /// Page number the paragraph starts on.
    pub page: usize,
    /// Cursor position the paragraph was rendered at.
    pub y: f64,
    /// Height estimated before rendering.
    pub required_height: f64,
    /// Height reported by the renderer.
    pub rendered_height: f64,
}

/// Outcome of [`DocumentFlow::place_paragraphs`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowReport {
    pub placements: Vec<ParagraphPlacement>,
}

impl FlowReport {
    /// Number of page breaks inserted in front of paragraphs.
    pub fn page_breaks(&self) -> usize {
        self.placements
            .iter()
            .filter(|placement| placement.page_break_before)
            .count()
    }
}

/// Builds a document by placing content at a moving cursor.
pub struct DocumentFlow<R: PageRenderer> {
    renderer: R,
    page: Page,
    config: LayoutConfig,
}

impl<R: PageRenderer> DocumentFlow<R> {
    /// Starts a document on its first page with the cursor on the top margin.
    pub fn new(renderer: R, config: LayoutConfig) -> Self {
        let page = Page::from_config(&config);
        Self {
            renderer,
            page,
            config,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Body text style for `font` at the configured text size and alignment.
    pub fn body_style(&self, font: FontChoice) -> LayoutStyle {
        LayoutStyle::body(font, self.config.text_size_pt).with_alignment(self.config.alignment)
    }

    fn body_line_height(&self) -> f64 {
        self.body_style(self.config.font).line_height
    }

    fn text_frame(&self, line_height: f64) -> TextFrame {
        TextFrame::new(
            self.page.margin_horizontal(),
            self.page.cursor_y(),
            self.page.content_width(),
            line_height,
        )
    }

    /// Starts a new page when `required` does not fit below the cursor, unless
    /// the cursor is already at the top of a page.
    fn make_room(&mut self, required: f64) -> Result<()> {
        if !self.page.at_top() && required > self.page.available_height() {
            debug!(
                "{:.2} mm needed, {:.2} mm left on page {}",
                required,
                self.page.available_height(),
                self.page.number()
            );
            self.add_page()?;
        }
        Ok(())
    }

    /// Places a block outside the paragraph estimator, breaking the page first
    /// when its explicit lines do not fit.
    fn place_fitted_block(&mut self, content: &str, style: &LayoutStyle, border: bool) -> Result<f64> {
        self.make_room(estimated_height(content, style.line_height))?;
        self.place_block(content, style, border)
    }

    fn place_block(&mut self, content: &str, style: &LayoutStyle, border: bool) -> Result<f64> {
        let frame = self.text_frame(style.line_height).with_border(border);
        let height = self.renderer.place_text(frame, content, style)?;
        self.page.advance(height);
        Ok(height)
    }

    /// Advances the cursor by one empty line of `line_height`.
    fn blank_line(&mut self, line_height: f64) {
        self.page.advance(line_height);
    }

    /// Finishes the current page and continues at the top of the next one.
    pub fn add_page(&mut self) -> Result<()> {
        self.renderer.start_new_page(self.config.orientation)?;
        self.page.break_page();
        info!("started page {}", self.page.number());
        Ok(())
    }

    /// Writes a bold document title followed by one and a half title lines of space.
    pub fn write_title(&mut self, text: &str) -> Result<()> {
        let style = LayoutStyle::heading(self.config.font, self.config.title_size_pt);
        self.place_fitted_block(text, &style, false)?;
        self.page.advance(style.line_height * 1.5);
        Ok(())
    }

    /// Writes a bold section title followed by half a section line of space.
    pub fn write_section_title(&mut self, text: &str) -> Result<()> {
        let style = LayoutStyle::heading(self.config.font, self.config.section_title_size_pt);
        self.place_fitted_block(text, &style, false)?;
        self.page.advance(style.line_height * 0.5);
        Ok(())
    }

    /// Writes one block of body text, optionally framed, followed by an empty line.
    pub fn write_paragraph(&mut self, text: &str, border: bool, font: FontChoice) -> Result<()> {
        let style = self.body_style(font);
        self.place_fitted_block(text, &style, border)?;
        self.blank_line(style.line_height);
        Ok(())
    }

    /// Places paragraphs in body style, breaking pages in front of those that do not fit.
    pub fn write_paragraphs(&mut self, paragraphs: &[Paragraph], font: FontChoice) -> Result<FlowReport> {
        let style = self.body_style(font);
        self.place_paragraphs(paragraphs, &style)
    }

    /// Places each paragraph at the cursor, inserting a page break first when
    /// its estimated height exceeds the space left on the page.
    ///
    /// The estimate is `style.line_height * line_count`; after rendering, the
    /// cursor moves by the rendered height plus one empty line.
    pub fn place_paragraphs(&mut self, paragraphs: &[Paragraph], style: &LayoutStyle) -> Result<FlowReport> {
        let mut report = FlowReport::default();

        for (index, paragraph) in paragraphs.iter().enumerate() {
            let line_count = paragraph.line_count();
            let required_height = style.line_height * line_count as f64;
            let available_height = self.page.available_height();
            debug!(
                "{}: {} lines y={:.2} mm required={:.2} mm available={:.2} mm",
                index,
                line_count,
                self.page.cursor_y(),
                required_height,
                available_height
            );

            let page_break_before = needs_page_break(required_height, available_height, index);
            if page_break_before {
                self.add_page()?;
            }

            let y = self.page.cursor_y();
            let rendered_height = self.place_block(paragraph.text(), style, false)?;
            self.blank_line(style.line_height);

            report.placements.push(ParagraphPlacement {
                page_break_before,
                page: self.page.number(),
                y,
                required_height,
                rendered_height,
            });
        }

        Ok(report)
    }

    /// Draws a full-width rule just above the cursor, then moves down one line.
    pub fn hr(&mut self, thickness: f64) -> Result<()> {
        let line_height = self.body_line_height();
        self.make_room(line_height)?;
        let y = self.page.cursor_y() - line_height / 8.0;
        let left = self.page.margin_horizontal();
        let right = self.page.width() - self.page.margin_horizontal();
        self.renderer
            .draw_line(Point::new(left, y), Point::new(right, y), thickness)?;
        self.blank_line(line_height);
        Ok(())
    }

    /// Draws a rule inset by twice the margin, padded by an empty line on each side.
    pub fn sub_hr(&mut self, thickness: f64) -> Result<()> {
        let line_height = self.body_line_height();
        self.make_room(line_height * 2.0)?;
        let y = self.page.cursor_y() + line_height;
        let inset = self.page.margin_horizontal() * 2.0;
        self.blank_line(line_height);
        self.renderer.draw_line(
            Point::new(inset, y),
            Point::new(self.page.width() - inset, y),
            thickness,
        )?;
        self.blank_line(line_height);
        Ok(())
    }

    /// Rule with the configured default line width.
    pub fn default_hr(&mut self) -> Result<()> {
        self.hr(self.config.line_width)
    }

    /// Places an image at the left margin, `width` wide (the content width when
    /// `None`). The page breaks first when the image does not fit below the
    /// cursor, unless the cursor is already at the top of a page.
    pub fn place_image(&mut self, path: impl AsRef<Path>, width: Option<f64>) -> Result<f64> {
        let path = path.as_ref();
        let width = width.unwrap_or_else(|| self.page.content_width());

        let image = decode_image_from_path(path).map_err(|source| FlowError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        self.make_room(scaled_height(&image, width))?;

        let frame = ImageFrame {
            x: self.page.margin_horizontal(),
            y: self.page.cursor_y(),
            width,
        };
        let height = self.renderer.place_image(path, image, frame)?;
        self.page.advance(height);
        Ok(height)
    }

    /// Serializes the document into `writer`.
    pub fn output<W: Write>(self, writer: W) -> Result<()> {
        info!("writing document with {} page(s)", self.renderer.page_count());
        self.renderer.serialize(writer)
    }

    /// Serializes the document and writes it to `path`.
    ///
    /// The document is rendered in memory first, so a rendering failure
    /// leaves no file behind.
    pub fn output_to_file(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        self.output(&mut bytes)?;
        fs::write(path, &bytes)?;
        info!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Height of `content` at one `line_height` per explicit line, at least one line.
fn estimated_height(content: &str, line_height: f64) -> f64 {
    line_height * content.lines().count().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::split_paragraphs;
    use crate::renderer::RecordingRenderer;

    fn lines(count: usize) -> Paragraph {
        Paragraph::new(vec!["line"; count].join("\n"))
    }

    fn fifteen_mm_margins() -> DocumentFlow<RecordingRenderer> {
        let config = LayoutConfig::default().with_margins(15.0, 15.0);
        DocumentFlow::new(RecordingRenderer::new(), config)
    }

    fn style_7_2() -> LayoutStyle {
        LayoutStyle::body(FontChoice::Arial, 10).with_line_height(7.2)
    }

    #[test]
    fn first_paragraph_never_breaks() {
        assert!(!needs_page_break(1000.0, 10.0, 0));
        assert!(needs_page_break(1000.0, 10.0, 1));
        assert!(!needs_page_break(10.0, 10.0, 3));
    }

    #[test]
    fn five_lines_fit_after_twenty_millimetres() {
        let mut flow = fifteen_mm_margins();
        flow.page.set_cursor_y(20.0);
        let style = style_7_2();
        assert!((flow.page().available_height() - 247.0).abs() < 1e-9);
        assert!(!needs_page_break(style.line_height * 5.0, flow.page().available_height(), 1));

        let report = flow.place_paragraphs(&[lines(5), lines(5)], &style).unwrap();
        assert_eq!(report.page_breaks(), 0);
        assert!((report.placements[1].y - (20.0 + 6.0 * 7.2)).abs() < 1e-9);
    }

    #[test]
    fn forty_lines_break_unless_first() {
        let style = style_7_2();

        let mut flow = fifteen_mm_margins();
        flow.page.set_cursor_y(20.0);
        let report = flow.place_paragraphs(&[lines(40)], &style).unwrap();
        assert_eq!(report.page_breaks(), 0);
        assert_eq!(flow.page().number(), 1);

        let mut flow = fifteen_mm_margins();
        flow.page.set_cursor_y(20.0);
        let report = flow
            .place_paragraphs(&[Paragraph::new(""), lines(40)], &style)
            .unwrap();
        assert_eq!(report.page_breaks(), 1);
        assert!(report.placements[1].page_break_before);
        assert_eq!(report.placements[1].page, 2);
        assert_eq!(report.placements[1].y, 15.0);
        assert_eq!(flow.renderer().page_breaks(), 1);
    }

    #[test]
    fn cursor_advances_by_rendered_height_plus_blank_line() {
        let mut flow = fifteen_mm_margins();
        let style = style_7_2();
        flow.place_paragraphs(&[lines(3)], &style).unwrap();
        assert!((flow.page().cursor_y() - (15.0 + 4.0 * 7.2)).abs() < 1e-9);
    }

    #[test]
    fn page_breaks_match_overflowing_paragraphs() {
        let text = (0..12)
            .map(|i| vec!["x"; 3 + (i * 7) % 11].join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let paragraphs = split_paragraphs(&text);
        let style = LayoutStyle::body(FontChoice::Courier, 10);

        let mut flow = DocumentFlow::new(RecordingRenderer::new(), LayoutConfig::default());
        let mut expected = 0;
        let mut shadow = flow.page().clone();
        for (index, paragraph) in paragraphs.iter().enumerate() {
            let required = style.line_height * paragraph.line_count() as f64;
            if index != 0 && required > shadow.available_height() {
                expected += 1;
                shadow.break_page();
            }
            shadow.advance(required + style.line_height);
        }

        let report = flow.place_paragraphs(&paragraphs, &style).unwrap();
        assert!(expected > 0);
        assert_eq!(report.page_breaks(), expected);
        assert_eq!(flow.renderer().page_count(), expected + 1);
    }

    #[test]
    fn title_and_rules_move_the_cursor() {
        let mut flow = DocumentFlow::new(RecordingRenderer::new(), LayoutConfig::default());
        flow.write_title("Title").unwrap();
        // 3 mm title line plus 1.5 lines of spacing
        assert!((flow.page().cursor_y() - (10.0 + 3.0 + 4.5)).abs() < 1e-9);

        let before = flow.page().cursor_y();
        flow.hr(1.0).unwrap();
        assert!((flow.page().cursor_y() - (before + 4.5)).abs() < 1e-9);

        let before = flow.page().cursor_y();
        flow.sub_hr(0.2).unwrap();
        assert!((flow.page().cursor_y() - (before + 9.0)).abs() < 1e-9);
    }

    /// Renderer whose serialization writes a partial header and then fails.
    struct FailingRenderer(RecordingRenderer);

    impl PageRenderer for FailingRenderer {
        fn place_text(&mut self, frame: TextFrame, content: &str, style: &LayoutStyle) -> Result<f64> {
            self.0.place_text(frame, content, style)
        }

        fn draw_line(&mut self, from: Point, to: Point, thickness: f64) -> Result<()> {
            self.0.draw_line(from, to, thickness)
        }

        fn place_image(
            &mut self,
            path: &Path,
            image: image::DynamicImage,
            frame: ImageFrame,
        ) -> Result<f64> {
            self.0.place_image(path, image, frame)
        }

        fn start_new_page(&mut self, orientation: crate::config::Orientation) -> Result<()> {
            self.0.start_new_page(orientation)
        }

        fn page_count(&self) -> usize {
            self.0.page_count()
        }

        fn serialize<W: Write>(self, mut writer: W) -> Result<()> {
            writer.write_all(b"%PDF-1.3")?;
            Err(FlowError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "render failed",
            )))
        }
    }

    #[test]
    fn failed_render_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let mut flow = DocumentFlow::new(
            FailingRenderer(RecordingRenderer::new()),
            LayoutConfig::default(),
        );
        flow.write_paragraph("text", false, FontChoice::Arial).unwrap();

        assert!(flow.output_to_file(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn body_text_uses_the_configured_alignment() {
        use crate::model::Alignment;
        use crate::renderer::RenderOp;

        let config = LayoutConfig::default().with_alignment(Alignment::Center);
        let mut flow = DocumentFlow::new(RecordingRenderer::new(), config);
        flow.write_paragraph("centred", false, FontChoice::Arial).unwrap();
        flow.write_title("Title").unwrap();

        let alignments: Vec<Alignment> = flow
            .renderer()
            .ops()
            .iter()
            .filter_map(|op| match op {
                RenderOp::Text { style, .. } => Some(style.alignment),
                _ => None,
            })
            .collect();
        assert_eq!(alignments, vec![Alignment::Center, Alignment::Left]);

        let flow = DocumentFlow::new(RecordingRenderer::new(), LayoutConfig::default());
        assert_eq!(flow.body_style(FontChoice::Courier).alignment, Alignment::Justified);
    }
}
