//! Layout configuration.
//!
//! Every constant that shapes a document (paper, margins, font sizes, rule
//! thickness) lives in [`LayoutConfig`] and is handed to the flow at
//! construction time. Selectors arriving as strings (from the environment or
//! the command line) are parsed with [`FromStr`] and rejected with a
//! configuration error before any output is produced.

use std::env;
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::{FlowError, Result};
use crate::model::Alignment;

/// Environment variable selecting the page format (`A4` or `A5`).
pub const PAGE_FORMAT_ENV: &str = "PDF_FLOW_PAGE_FORMAT";
/// Environment variable selecting the orientation (`P` or `L`).
pub const ORIENTATION_ENV: &str = "PDF_FLOW_ORIENTATION";
/// Environment variable selecting the body font family (`arial` or `courier`).
pub const FONT_ENV: &str = "PDF_FLOW_FONT";

/// The two supported paper formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageFormat {
    /// ISO A4, 210 × 297 mm.
    #[default]
    A4,
    /// ISO A5, 148 × 210 mm.
    A5,
}

impl PageFormat {
    /// Portrait dimensions as `(width, height)` in millimetres.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::A5 => (148.0, 210.0),
        }
    }

    /// Dimensions in millimetres for the given orientation.
    pub fn oriented_mm(self, orientation: Orientation) -> (f64, f64) {
        let (width, height) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }
}

impl FromStr for PageFormat {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "a5" => Ok(PageFormat::A5),
            _ => Err(FlowError::UnsupportedPageFormat(s.to_owned())),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFormat::A4 => f.write_str("A4"),
            PageFormat::A5 => f.write_str("A5"),
        }
    }
}

/// Page orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "portrait" => Ok(Orientation::Portrait),
            "l" | "landscape" => Ok(Orientation::Landscape),
            _ => Err(FlowError::UnsupportedOrientation(s.to_owned())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("portrait"),
            Orientation::Landscape => f.write_str("landscape"),
        }
    }
}

/// The two supported font families.
///
/// `Arial` maps to a proportional sans-serif family and `Courier` to a
/// monospaced one; see [`crate::fonts`] for the files backing each.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontChoice {
    #[default]
    Arial,
    Courier,
}

impl FromStr for FontChoice {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arial" => Ok(FontChoice::Arial),
            "courier" => Ok(FontChoice::Courier),
            _ => Err(FlowError::UnsupportedFont(s.to_owned())),
        }
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontChoice::Arial => f.write_str("arial"),
            FontChoice::Courier => f.write_str("courier"),
        }
    }
}

/// Layout constants for one document, all lengths in millimetres.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub page_format: PageFormat,
    pub orientation: Orientation,
    pub margin_horizontal: f64,
    pub margin_vertical: f64,
    pub title_size_pt: u8,
    pub section_title_size_pt: u8,
    pub text_size_pt: u8,
    /// Default stroke width for rules.
    pub line_width: f64,
    /// Horizontal inset of text inside its cell.
    pub cell_padding: f64,
    /// Body font family.
    pub font: FontChoice,
    /// Alignment of body text inside its cell.
    pub alignment: Alignment,
    /// Document title written to the PDF metadata.
    pub title: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_format: PageFormat::A4,
            orientation: Orientation::Portrait,
            margin_horizontal: 10.0,
            margin_vertical: 10.0,
            title_size_pt: 24,
            section_title_size_pt: 18,
            text_size_pt: 10,
            line_width: 0.2,
            cell_padding: 1.0,
            font: FontChoice::Arial,
            alignment: Alignment::Justified,
            title: "pdf_flow document".to_owned(),
        }
    }
}

impl LayoutConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration overlaid with the `PDF_FLOW_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Applies the `PDF_FLOW_*` environment variables present in the environment.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(value) = env_value(PAGE_FORMAT_ENV) {
            self.page_format = value.parse()?;
        }
        if let Some(value) = env_value(ORIENTATION_ENV) {
            self.orientation = value.parse()?;
        }
        if let Some(value) = env_value(FONT_ENV) {
            self.font = value.parse()?;
        }
        debug!(
            "layout config: format={} orientation={} font={}",
            self.page_format, self.orientation, self.font
        );
        Ok(self)
    }

    /// Sets the page format and returns the updated configuration.
    pub fn with_page_format(mut self, page_format: PageFormat) -> Self {
        self.page_format = page_format;
        self
    }

    /// Parses `selector` as a page format; unknown formats are a configuration error.
    pub fn with_page_format_str(self, selector: &str) -> Result<Self> {
        Ok(self.with_page_format(selector.parse()?))
    }

    /// Sets the orientation and returns the updated configuration.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets both margins and returns the updated configuration.
    pub fn with_margins(mut self, horizontal: f64, vertical: f64) -> Self {
        self.margin_horizontal = horizontal;
        self.margin_vertical = vertical;
        self
    }

    /// Sets the body text alignment and returns the updated configuration.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the body font family and returns the updated configuration.
    pub fn with_font(mut self, font: FontChoice) -> Self {
        self.font = font;
        self
    }

    /// Sets the document title and returns the updated configuration.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Paper size in millimetres after applying the orientation.
    pub fn paper_size_mm(&self) -> (f64, f64) {
        self.page_format.oriented_mm(self.orientation)
    }
}

fn env_value(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}
