//! Error and diagnostic system for the plotly directive parser.
//!
//! Every failure the parser reports is a [`Diagnostic`]: an optional
//! [`ErrorCode`], a message, labeled source spans and help text.
//! One or more diagnostics are returned together as a [`ParseError`].
//!
//! Spans point into the text that was handed to the failing operation: the
//! code block for the rewriting functions, the whole document for
//! [`parse_document`](crate::parse_document).
//!
//! # Example
//!
//! ```
//! # use plotly_directive_parser::error::{Diagnostic, ErrorCode};
//! # use plotly_directive_parser::Span;
//!
//! let diag = Diagnostic::error("last line is not an expression")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(12..21), "assignment")
//!     .with_help("end the snippet with the figure, e.g. `fig`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
