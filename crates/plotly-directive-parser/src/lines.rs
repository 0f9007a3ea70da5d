//! Line utilities over raw snippet text.

use crate::tail::Tail;

/// The last non-blank line of a piece of code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LastLine<'src> {
    /// Byte offset of the first character of the line.
    pub(crate) start: usize,
    /// The line, without its `\n` terminator.
    pub(crate) text: &'src str,
}

impl LastLine<'_> {
    /// Byte offset just past the line.
    pub(crate) fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Find the last line of `code` that contains something other than
/// whitespace.
pub(crate) fn last_line(code: &str) -> Option<LastLine<'_>> {
    let mut end = code.len();
    loop {
        let start = code[..end].rfind('\n').map_or(0, |newline| newline + 1);
        let text = &code[start..end];
        if !text.trim().is_empty() {
            return Some(LastLine { start, text });
        }
        if start == 0 {
            return None;
        }
        end = start - 1;
    }
}

/// Remove the final line of `code`.
///
/// Everything before the last `\n` is returned untouched; code without a
/// newline has a single line and yields an empty string.
///
/// ```
/// # use plotly_directive_parser::strip_last_line;
/// assert_eq!(strip_last_line("a = 1\nb = 2\nb"), "a = 1\nb = 2");
/// assert_eq!(strip_last_line("fig"), "");
/// ```
pub fn strip_last_line(code: &str) -> &str {
    code.rfind('\n').map_or("", |newline| &code[..newline])
}

/// Returns `true` if the last non-blank line of `code` calls `.show(...)`.
///
/// The arguments of the call may be anything with balanced delimiters.
/// Only whitespace may follow the closing `)`.
///
/// ```
/// # use plotly_directive_parser::ends_with_show;
/// assert!(ends_with_show("fig = px.line()\nfig.show()\n"));
/// assert!(!ends_with_show("fig"));
/// ```
pub fn ends_with_show(code: &str) -> bool {
    last_line(code)
        .map(|line| Tail::classify(line.text))
        .is_some_and(|tail| tail.is_display_call())
}
