//! Error type shared by the flow, the renderers and the demo programs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::Orientation;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors produced while configuring, laying out or writing a document.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The page format selector is not one of the supported sizes.
    #[error("unsupported page format '{0}' (expected A4 or A5)")]
    UnsupportedPageFormat(String),

    /// The font family selector is not one of the supported families.
    #[error("unsupported font family '{0}' (expected arial or courier)")]
    UnsupportedFont(String),

    /// The orientation selector is neither portrait nor landscape.
    #[error("unsupported page orientation '{0}' (expected P or L)")]
    UnsupportedOrientation(String),

    /// The backend uses one paper size for the whole document.
    #[error("cannot switch page orientation from {current} to {requested} within one document")]
    OrientationChange {
        /// Orientation the document was created with.
        current: Orientation,
        /// Orientation requested for the new page.
        requested: Orientation,
    },

    /// Font files could not be located or parsed.
    #[error("failed to load fonts")]
    FontLoad(#[source] genpdf::error::Error),

    /// An image could not be opened or decoded.
    #[error("failed to load image {}", path.display())]
    Image {
        /// Location of the offending image.
        path: PathBuf,
        /// Underlying decoding error.
        #[source]
        source: genpdf::error::Error,
    },

    /// `genpdf` failed while building or writing the document.
    #[error(transparent)]
    Render(#[from] genpdf::error::Error),

    /// Reading the input or writing the output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}
