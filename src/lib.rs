//! Cursor-driven PDF document flow on top of `genpdf`.
//!
//! A [`DocumentFlow`] places titles, paragraphs, rules and images at a moving
//! cursor and decides, paragraph by paragraph, whether to start a new page
//! first. Drawing goes through the [`PageRenderer`] trait: [`GenpdfRenderer`]
//! produces the PDF, [`RecordingRenderer`] records the calls for tests and dry
//! runs.

pub mod backend;
pub mod config;
pub mod demos;
pub mod elements;
pub mod error;
pub mod flow;
pub mod fonts;
pub mod model;
pub mod renderer;
pub mod wrap;

pub use backend::GenpdfRenderer;
pub use config::{FontChoice, LayoutConfig, Orientation, PageFormat};
pub use error::{FlowError, Result};
pub use flow::{needs_page_break, DocumentFlow, FlowReport, ParagraphPlacement};
pub use model::{
    join_paragraphs, normalize_line_endings, split_paragraphs, Alignment, ImageFrame, LayoutStyle,
    Page, Paragraph, Point, TextFrame,
};
pub use renderer::{PageRenderer, RecordingRenderer, RenderOp};
