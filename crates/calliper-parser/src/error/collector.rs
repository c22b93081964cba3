//! Collector for accumulating diagnostics while parsing.

use log::warn;

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so one parse can report every problem in the
/// input instead of stopping at the first.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection, returning `value` when no error was emitted.
    ///
    /// Warnings do not fail the parse; they are logged and dropped.
    pub fn finish<T>(self, value: T) -> Result<T, ParseError> {
        if self.has_errors {
            return Err(ParseError::new(self.diagnostics));
        }
        for diagnostic in &self.diagnostics {
            warn!(message = diagnostic.to_string(); "Path data warning");
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_empty_is_ok() {
        let collector = DiagnosticCollector::new();
        assert_eq!(collector.finish(7).unwrap(), 7);
    }

    #[test]
    fn test_collector_warnings_only_is_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("warning 1"));

        assert!(!collector.has_errors());
        assert!(collector.finish(()).is_ok());
    }

    #[test]
    fn test_collector_keeps_all_diagnostics_on_error() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("unexpected character")
                .with_code(ErrorCode::E001)
                .with_label(Span::new(3..4), "here"),
        );
        collector.emit(Diagnostic::warning("warning"));

        assert!(collector.has_errors());
        let err = collector.finish(()).unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }
}
