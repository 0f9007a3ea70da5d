//! The core diagnostic type for the plotly directive error system.

use std::fmt;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    span::Span,
};

/// An error message with source location information.
///
/// # Example
///
/// ```text
/// error[E100]: last line is not an expression
///   |
/// 3 | fig = px.scatter(df)
///   |     ^^^^^^^^^^^^^^^^ expected end of expression
///   |
///   = help: end the snippet with the figure, e.g. `fig`
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use plotly_directive_parser::error::{Diagnostic, ErrorCode};
    /// # use plotly_directive_parser::Span;
    ///
    /// let diag = Diagnostic::error("unknown option `colour`")
    ///     .with_code(ErrorCode::E204)
    ///     .with_label(Span::new(20..28), "not a plotly option");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
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

    /// Move every label `offset` bytes forward.
    ///
    /// Used when a diagnostic produced for a fragment has to point into the
    /// text the fragment was cut from.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.labels = self
            .labels
            .into_iter()
            .map(|label| {
                let span = label.span().shift(offset);
                if label.is_primary() {
                    Label::primary(span, label.message())
                } else {
                    Label::secondary(span, label.message())
                }
            })
            .collect();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
