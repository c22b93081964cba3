//! Export of annotated scenes.
//!
//! # Pipeline Position
//!
//! ```text
//! Scene file
//!     ↓ load
//! Scene (selection)
//!     ↓ annotate (classify → measure → plan → synthesize → visibility)
//! Scene (selection + annotations + hidden set)
//!     ↓ export (this module)
//! SVG document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::render`] and [`svg::save`]

/// SVG export backend.
pub mod svg;

use std::io;

use thiserror::Error;

/// Errors that can occur during export.
///
/// Converts into [`CalliperError::Export`] at the crate boundary.
///
/// [`CalliperError::Export`]: crate::CalliperError::Export
#[derive(Debug, Error)]
pub enum ExportError {
    /// A rendering or conversion failure described by the message.
    #[error("Render error: {0}")]
    Render(String),

    /// An I/O error encountered while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
