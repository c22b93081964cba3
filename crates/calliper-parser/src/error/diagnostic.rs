//! The core diagnostic type.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E005]: invalid arc flag
///   --> plate.toml:12:21
///    |
/// 12 | d = "M 0 0 A 5 5 0 2 1 10 0"
///    |                    ^ flags must be `0` or `1`
///    |
///    = help: write the large-arc and sweep flags as single `0` or `1` digits
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the primary label, if any.
    pub fn primary_label(&self) -> Option<&Label> {
        self.labels.iter().find(|label| label.is_primary())
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Returns a copy with every label moved right by `offset` bytes.
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            labels: self.labels.iter().map(|label| label.shifted(offset)).collect(),
            ..self.clone()
        }
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::error("empty path data");

        assert!(diag.severity().is_error());
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.primary_label().is_none());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_labels() {
        let diag = Diagnostic::error("missing coordinate")
            .with_secondary_label(Span::new(0..1), "command starts here")
            .with_label(Span::new(4..5), "expected a number");

        assert_eq!(diag.labels().len(), 2);
        let primary = diag.primary_label().unwrap();
        assert_eq!(primary.message(), "expected a number");
        assert_eq!(primary.span(), Span::new(4..5));
    }

    #[test]
    fn test_diagnostic_shifted() {
        let diag = Diagnostic::error("bad flag")
            .with_code(ErrorCode::E005)
            .with_label(Span::new(3..4), "here");

        let shifted = diag.shifted(10);
        assert_eq!(shifted.labels()[0].span(), Span::new(13..14));
        assert_eq!(shifted.code(), Some(ErrorCode::E005));
    }

    #[test]
    fn test_diagnostic_display() {
        let with_code = Diagnostic::error("unexpected character `x`").with_code(ErrorCode::E001);
        assert_eq!(with_code.to_string(), "error[E001]: unexpected character `x`");

        let without_code = Diagnostic::warning("path has a single point");
        assert_eq!(without_code.to_string(), "warning: path has a single point");
    }
}
