//! A short multi-section document exercising every flow operation.

use std::path::Path;

use crate::backend::GenpdfRenderer;
use crate::config::{FontChoice, LayoutConfig};
use crate::demos::wrap::read_input;
use crate::error::Result;
use crate::flow::DocumentFlow;
use crate::model::split_paragraphs;
use crate::renderer::PageRenderer;

const INTRO_PARAGRAPH: &str = "This sample document is laid out by DocumentFlow,
which places text at a cursor and leaves the drawing to a renderer.

The renderer used here writes through genpdf.";

const CODE_PARAGRAPH: &str = "fn needs_page_break(required: f64, available: f64, index: usize) -> bool {
    index != 0 && required > available
}";

const CONCLUSION_PARAGRAPH: &str = "Paragraphs are separated by a blank line. Before each one is placed, its height is estimated from its line count and a fixed line height, and compared with the space left on the page.

When it does not fit, the page is finished and the paragraph starts at the top of the next one. The first paragraph of a sequence is always placed where the cursor is, so an oversized block cannot push itself from page to page.

Everything else (font metrics, embedding, the PDF object graph) is handled by genpdf and printpdf.";

/// Optional appendix appended on a page of its own.
pub struct Appendix<'a> {
    pub title: &'a str,
    pub text: &'a str,
}

/// Lays out the sample document on `flow`.
pub fn build<R: PageRenderer>(flow: &mut DocumentFlow<R>, appendix: Option<Appendix<'_>>) -> Result<()> {
    flow.write_title("Test Title")?;
    flow.hr(1.0)?;

    flow.write_paragraph(INTRO_PARAGRAPH, true, FontChoice::Arial)?;
    flow.write_paragraph(CODE_PARAGRAPH, false, FontChoice::Courier)?;
    flow.write_paragraph("The cursor now sits below the code block.", false, FontChoice::Arial)?;

    flow.default_hr()?;
    flow.write_section_title("Conclusion")?;
    flow.write_paragraphs(&split_paragraphs(CONCLUSION_PARAGRAPH), FontChoice::Arial)?;

    if let Some(appendix) = appendix {
        flow.add_page()?;
        flow.write_title("Appendices")?;
        flow.hr(1.0)?;
        flow.write_section_title(appendix.title)?;
        flow.write_paragraphs(&split_paragraphs(appendix.text), FontChoice::Courier)?;
    }

    Ok(())
}

/// Renders the sample document to `output`, with the text file at
/// `appendix_path` as an appendix when given.
pub fn run(output: &Path, appendix_path: Option<&Path>) -> Result<()> {
    let appendix_text = appendix_path.map(read_input).transpose()?;
    let appendix_title = appendix_path
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let config = LayoutConfig::from_env()?.with_title("Sample document");
    let renderer = GenpdfRenderer::new(&config)?;
    let mut flow = DocumentFlow::new(renderer, config);

    let appendix = appendix_text.as_deref().map(|text| Appendix {
        title: &appendix_title,
        text,
    });
    build(&mut flow, appendix)?;
    flow.output_to_file(output)
}
