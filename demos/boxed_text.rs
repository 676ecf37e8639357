use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    pdf_flow::demos::run_boxed_text("output.pdf".as_ref())?;
    println!("Generated output.pdf");
    Ok(())
}
