//! Flows a plain-text file into a PDF, one paragraph per blank-line block.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::backend::GenpdfRenderer;
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::flow::{DocumentFlow, FlowReport};
use crate::model::{normalize_line_endings, split_paragraphs};
use crate::renderer::PageRenderer;

/// File written when no output path is configured.
pub const DEFAULT_OUTPUT: &str = "wrapped.pdf";
/// Environment variable overriding [`DEFAULT_OUTPUT`].
pub const OUTPUT_ENV: &str = "PDF_FLOW_OUTPUT";

/// Output path from `PDF_FLOW_OUTPUT`, or `wrapped.pdf`.
pub fn output_path() -> PathBuf {
    env::var_os(OUTPUT_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

/// Reads a text file, converting CRLF line endings to LF.
pub fn read_input(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(normalize_line_endings(&text))
}

/// Places every paragraph of `text` in the configured body font.
pub fn build<R: PageRenderer>(flow: &mut DocumentFlow<R>, text: &str) -> Result<FlowReport> {
    let font = flow.config().font;
    let style = flow.body_style(font);
    info!(
        "font {} {} pt, cell height {} mm",
        font, style.size_pt, style.line_height
    );

    let paragraphs = split_paragraphs(text);
    let report = flow.write_paragraphs(&paragraphs, font)?;
    info!(
        "{} paragraph(s) on {} page(s), {} page break(s)",
        paragraphs.len(),
        flow.renderer().page_count(),
        report.page_breaks()
    );
    Ok(report)
}

/// Reads `input`, lays it out with `config` and writes the PDF to `output`.
///
/// The input is read before fonts are loaded or the output is created, so a
/// missing input file leaves no output behind.
pub fn run(input: &Path, output: &Path, config: LayoutConfig) -> Result<FlowReport> {
    let text = read_input(input)?;
    let renderer = GenpdfRenderer::new(&config)?;
    let mut flow = DocumentFlow::new(renderer, config);
    let report = build(&mut flow, &text)?;
    flow.output_to_file(output)?;
    Ok(report)
}
