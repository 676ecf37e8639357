use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let appendix = std::env::args_os().nth(1).map(PathBuf::from);
    pdf_flow::demos::run_sample_document("docbuilder.pdf".as_ref(), appendix.as_deref())?;
    println!("Generated docbuilder.pdf");
    Ok(())
}
