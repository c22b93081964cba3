//! Error types for Calliper operations.
//!
//! This module provides the main error type [`CalliperError`] which wraps
//! the conditions that abort a whole run (I/O, malformed scene files,
//! invalid configuration, export failures), and the per-object outcomes
//! [`SkipReason`] and [`Warning`] that never abort a batch.

use std::io;

use thiserror::Error;

use calliper_parser::error::{ParseError, Severity};

use crate::{export::ExportError, measure::Orientation};

/// The main error type for Calliper operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the path data diagnostics together with the
/// scene file text they point into, so front ends can render labelled
/// source snippets.
#[derive(Debug, Error)]
pub enum CalliperError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl CalliperError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{name}` must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid color for `{name}`: {reason}")]
    InvalidColor { name: &'static str, reason: String },

    #[error("invalid stroke style for `{name}`: {reason}")]
    InvalidStrokeStyle { name: &'static str, reason: String },

    #[error("document scale must be positive and finite, got {0}")]
    InvalidScale(f64),
}

/// Why a selected element produced no annotation.
///
/// A skipped element is reported but left untouched: it is never hidden.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("unsupported element type `{kind}`")]
    UnsupportedShape { kind: String },

    #[error("degenerate geometry with {distinct} distinct vertices")]
    DegenerateGeometry { distinct: usize },
}

impl SkipReason {
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// Advisory conditions reported next to a successful annotation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    /// The measured extent is zero, or rounds to zero at the configured precision.
    #[error("{} measurement is zero", orientation.name())]
    ZeroMeasurement { orientation: Orientation },

    /// The leader line sits closer to the shape than the tight threshold.
    #[error("{} leader is only {distance} px from the shape", orientation.name())]
    TightLayout {
        orientation: Orientation,
        distance: f64,
    },
}

impl Warning {
    pub fn severity(&self) -> Severity {
        Severity::Warning
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            Self::ZeroMeasurement { orientation } | Self::TightLayout { orientation, .. } => {
                *orientation
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = ConfigError::OutOfRange {
            name: "precision",
            value: 30.0,
            min: 1.0,
            max: 24.0,
        };
        assert_eq!(err.to_string(), "`precision` must be within 1..=24, got 30");
    }

    #[test]
    fn test_outcome_severities() {
        let skip = SkipReason::UnsupportedShape {
            kind: "text".to_string(),
        };
        assert!(skip.severity().is_error());
        assert_eq!(skip.to_string(), "unsupported element type `text`");

        let warning = Warning::TightLayout {
            orientation: Orientation::Vertical,
            distance: 0.5,
        };
        assert!(warning.severity().is_warning());
        assert_eq!(warning.orientation(), Orientation::Vertical);
        assert_eq!(
            warning.to_string(),
            "vertical leader is only 0.5 px from the shape"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: CalliperError = ConfigError::InvalidScale(0.0).into();
        assert!(matches!(err, CalliperError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: document scale must be positive and finite, got 0"
        );
    }
}
