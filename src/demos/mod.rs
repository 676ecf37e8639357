//! Document programs built on [`DocumentFlow`](crate::flow::DocumentFlow).
//!
//! Each program is split into a renderer-agnostic `build`/`draw` function and
//! a `run` function that renders through `genpdf` and writes a file.

pub mod boxed_text;
pub mod sample_document;
pub mod wrap;

pub use boxed_text::run as run_boxed_text;
pub use sample_document::run as run_sample_document;
pub use wrap::run as run_wrap;
