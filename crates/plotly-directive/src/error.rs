//! Error types for plotly directive processing.
//!
//! This module provides the main error type [`PlotlyDirectiveError`] which
//! wraps the error conditions of every stage of rendering a directive.

use std::io;

use thiserror::Error;

use plotly_directive_parser::error::ParseError;

use crate::execute::ExecutionError;

/// The main error type for plotly directive processing.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the diagnostics together with the text their
/// spans point into: the document for directive errors, the snippet for code
/// rewriting errors.
#[derive(Debug, Error)]
pub enum PlotlyDirectiveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::export::Error> for PlotlyDirectiveError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl PlotlyDirectiveError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
