//! Collector for accumulating diagnostics while scanning a document.
//!
//! Every directive of a document is checked before the first error is
//! returned, so an author sees all problems at once.

use crate::error::{Diagnostic, ParseError};

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection.
    ///
    /// Returns `Err(ParseError)` with all diagnostics in emission order if
    /// any were emitted.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(self.diagnostics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_new_finish_ok() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_all_diagnostics() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(
            Diagnostic::error("unknown option `colour`")
                .with_code(ErrorCode::E204)
                .with_label(Span::new(10..20), "here"),
        );
        collector.emit(Diagnostic::error("a"));
        collector.emit(Diagnostic::error("b"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.diagnostics()[0].message(), "unknown option `colour`");
        assert_eq!(err.diagnostics()[2].message(), "b");
    }
}
