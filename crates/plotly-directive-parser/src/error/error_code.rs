//! Error codes for the plotly directive diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexical errors inside a code line
//! - `E1xx` - Code rewriting errors
//! - `E2xx` - Directive errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string inside the tail line was opened with a quote but never closed.
    E001,

    // =========================================================================
    // Code Rewriting Errors (E1xx)
    // =========================================================================
    /// Tail is not an expression.
    ///
    /// The last non-blank line of the snippet is a statement (assignment,
    /// control flow, import, ...) instead of an expression that evaluates to
    /// the figure.
    E100,

    /// Empty code block.
    ///
    /// The snippet has no non-blank line to bind.
    E101,

    /// Unbalanced delimiters.
    ///
    /// A parenthesis, bracket or brace in the tail line is never closed, or
    /// is closed by the wrong delimiter.
    E102,

    /// Invalid variable name.
    ///
    /// The name the figure should be bound to is not a Python identifier.
    E103,

    // =========================================================================
    // Directive Errors (E2xx)
    // =========================================================================
    /// Wrong number of camera values.
    ///
    /// A camera needs exactly nine values: eye, center and up vectors.
    E200,

    /// Invalid camera value.
    ///
    /// A camera value is not a finite number.
    E201,

    /// Invalid option value.
    ///
    /// An option value could not be interpreted for that option.
    E202,

    /// Unsupported format.
    ///
    /// A requested output format is not one of `html`, `png`, `pdf`, `svg`
    /// or `jpg`.
    E203,

    /// Unknown option.
    ///
    /// The directive does not accept an option with this name.
    E204,

    /// Invalid directive body.
    ///
    /// The directive needs either inline code or a single script path
    /// argument.
    E205,

    /// Duplicate option.
    ///
    /// The same option was given more than once.
    E206,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E100 => "tail is not an expression",
            ErrorCode::E101 => "empty code block",
            ErrorCode::E102 => "unbalanced delimiters",
            ErrorCode::E103 => "invalid variable name",
            ErrorCode::E200 => "wrong number of camera values",
            ErrorCode::E201 => "invalid camera value",
            ErrorCode::E202 => "invalid option value",
            ErrorCode::E203 => "unsupported format",
            ErrorCode::E204 => "unknown option",
            ErrorCode::E205 => "invalid directive body",
            ErrorCode::E206 => "duplicate option",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E204.to_string(), "E204");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E100.description(), "tail is not an expression");
        assert_eq!(ErrorCode::E200.description(), "wrong number of camera values");
        assert_eq!(ErrorCode::E206.description(), "duplicate option");
    }
}
