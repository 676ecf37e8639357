use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use pdf_flow::demos::wrap;
use pdf_flow::{FontChoice, LayoutConfig};

/// Flows a plain-text file into a PDF, starting a new page whenever the next
/// paragraph would not fit.
///
/// Paragraphs are separated by a blank line. The PDF is written to
/// `wrapped.pdf` unless `PDF_FLOW_OUTPUT` names another path. The page format
/// (`PDF_FLOW_PAGE_FORMAT`: A4 or A5), orientation (`PDF_FLOW_ORIENTATION`)
/// and font (`PDF_FLOW_FONT`: arial or courier) are read from the environment;
/// fonts are looked up in `PDF_FLOW_FONTS_DIR` first.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Text file to lay out.
    #[arg(value_name = "INPUT.TXT")]
    input: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), pdf_flow::FlowError> {
    let config = LayoutConfig::new()
        .with_font(FontChoice::Courier)
        .with_title("Wrapped text")
        .with_env_overrides()?;
    let output = wrap::output_path();
    let report = wrap::run(&cli.input, &output, config)?;
    log::info!(
        "{} paragraph(s), {} page break(s)",
        report.placements.len(),
        report.page_breaks()
    );
    println!("Generated {}", output.display());
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
