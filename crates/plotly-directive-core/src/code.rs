//! Snippets of plotting code.
//!
//! A [`CodeBlock`] holds the lines of one snippet exactly as the author wrote
//! them, after the directive indentation has been removed.

use std::fmt;

/// An ordered sequence of source lines.
///
/// Lines are stored without their `\n` terminator. A trailing `\r` from
/// Windows line endings is kept as part of the line so the text can be
/// reassembled byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    lines: Vec<String>,
}

impl CodeBlock {
    /// Create a code block from already split lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split `text` on `\n` into a code block.
    ///
    /// A trailing newline does not produce an extra empty line.
    pub fn from_text(text: &str) -> Self {
        let text = text.strip_suffix('\n').unwrap_or(text);
        if text.is_empty() {
            return Self::default();
        }
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Returns the lines of this block.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns `true` if the block has no non-blank line.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Returns the last non-blank line, the tail statement of the block.
    pub fn tail(&self) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(String::as_str)
    }

    /// Join the lines back into source text separated by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl From<&str> for CodeBlock {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}
