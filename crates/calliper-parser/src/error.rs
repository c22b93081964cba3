//! Error and diagnostic system for the path data parser.
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with an optional error code, labelled
//! source spans and help text. All diagnostics produced while parsing one
//! path are wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use calliper_parser::error::{Diagnostic, ErrorCode};
//! # use calliper_parser::Span;
//! let diag = Diagnostic::error("expected a coordinate")
//!     .with_code(ErrorCode::E002)
//!     .with_label(Span::new(4..7), "not a number")
//!     .with_secondary_label(Span::new(0..1), "command starts here")
//!     .with_help("each `L` command takes an x and a y coordinate");
//! assert_eq!(diag.to_string(), "error[E002]: expected a coordinate");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
