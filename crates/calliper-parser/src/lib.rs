//! # Calliper Parser
//!
//! Parser for SVG path data (the `d` attribute of `<path>` elements). The
//! output is a [`PathGeometry`] of absolute anchor points grouped into
//! subpaths, ready for shape classification.
//!
//! Malformed input produces a [`ParseError`] carrying one [`Diagnostic`]
//! per problem found, each with an [`ErrorCode`] and a labelled [`Span`]
//! into the source text.
//!
//! ## Usage
//!
//! ```
//! # use calliper_parser::{parse_path_data, ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let geometry = parse_path_data("M 0 0 L 10 0 L 10 10")?;
//!     assert_eq!(geometry.anchor_count(), 3);
//!     Ok(())
//! }
//! ```
//!
//! [`Diagnostic`]: error::Diagnostic
//! [`ErrorCode`]: error::ErrorCode

mod command;
pub mod error;
mod path_data;
mod resolve;
mod span;

pub use error::ParseError;
pub use span::Span;

use calliper_core::element::PathGeometry;
use log::debug;

/// Parse SVG path data into absolute path geometry.
///
/// Supports every SVG 1.1 path command in absolute and relative form,
/// implicit command repetition and the compact number syntax.
///
/// # Errors
///
/// Returns a [`ParseError`] with every diagnostic found when the data is
/// empty, does not begin with a moveto, or contains malformed commands.
pub fn parse_path_data(source: &str) -> Result<PathGeometry, ParseError> {
    let commands = path_data::parse_commands(source)?;
    let geometry = resolve::resolve(&commands);

    debug!(
        commands = commands.len(),
        anchors = geometry.anchor_count();
        "Parsed path data"
    );

    Ok(geometry)
}
