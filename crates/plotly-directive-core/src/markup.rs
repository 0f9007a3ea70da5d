//! reStructuredText block rendering.
//!
//! Rendered figures are spliced back into the document as plain markup text.
//! This module builds that text: generic directive blocks through
//! [`DirectiveBlock`], and the `code-block` listing of a snippet through
//! [`create_code_block`].
//!
//! # Output shape
//!
//! ```text
//! .. <name>:: <arg1> <arg2>
//!    :<key1>: <value1>
//!    :<key2>: <value2>
//!
//!    <content line 1>
//!    <content line 2>
//! ```

use std::fmt;

use indexmap::IndexMap;

/// Indentation unit of directive options and content.
pub const INDENT: &str = "   ";

/// A directive rendered as reStructuredText.
///
/// Options keep their insertion order. Option values are rendered through
/// their [`Display`](fmt::Display) form; an empty value renders as a flag
/// (`:key:`).
///
/// # Example
///
/// ```
/// # use plotly_directive_core::markup::DirectiveBlock;
/// let block = DirectiveBlock::new("image")
///     .with_argument("figures/index-1.png")
///     .with_option("alt", "A scatter plot")
///     .render();
///
/// assert_eq!(block, ".. image:: figures/index-1.png\n   :alt: A scatter plot");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveBlock {
    name: String,
    arguments: Vec<String>,
    options: IndexMap<String, String>,
    content: Vec<String>,
}

impl DirectiveBlock {
    /// Create an empty directive named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a positional argument.
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Append several positional arguments.
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Set an option. Setting an existing key keeps its original position.
    pub fn with_option(mut self, key: impl fmt::Display, value: impl fmt::Display) -> Self {
        self.options.insert(key.to_string(), value.to_string());
        self
    }

    /// Set a valueless flag option.
    pub fn with_flag(self, key: impl fmt::Display) -> Self {
        self.with_option(key, "")
    }

    /// Append content lines. A line containing newlines is split and each
    /// physical line indented on its own.
    pub fn with_content<I, S>(mut self, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.content
            .extend(content.into_iter().map(|line| line.as_ref().to_string()));
        self
    }

    /// Returns the directive name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the options in insertion order.
    pub fn options(&self) -> &IndexMap<String, String> {
        &self.options
    }

    /// Render the directive. The result carries no leading or trailing
    /// whitespace.
    pub fn render(&self) -> String {
        let mut header = format!(".. {}::", self.name);
        if !self.arguments.is_empty() {
            header.push(' ');
            header.push_str(&self.arguments.join(" "));
        }

        let mut lines = vec![header];

        for (key, value) in &self.options {
            let mut value_lines = value.split('\n');
            let first = value_lines.next().unwrap_or_default();
            if first.is_empty() {
                lines.push(format!("{INDENT}:{key}:"));
            } else {
                lines.push(format!("{INDENT}:{key}: {first}"));
            }
            lines.extend(value_lines.map(|line| indent_line(line, &INDENT.repeat(2))));
        }

        lines.push(String::new());

        for entry in &self.content {
            lines.extend(entry.split('\n').map(|line| indent_line(line, INDENT)));
        }

        lines.join("\n").trim().to_string()
    }
}

impl fmt::Display for DirectiveBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render a directive from its parts.
///
/// ```
/// # use indexmap::IndexMap;
/// # use plotly_directive_core::markup::create_directive_block;
/// let options = IndexMap::from([("a", 0), ("b", 1)]);
/// let block = create_directive_block("plotly", &["foo", "bar"], &options, &["print(0)", "print(1)"]);
///
/// assert_eq!(block, ".. plotly:: foo bar\n   :a: 0\n   :b: 1\n\n   print(0)\n   print(1)");
/// ```
pub fn create_directive_block<A, K, V, C>(
    name: &str,
    arguments: &[A],
    options: &IndexMap<K, V>,
    content: &[C],
) -> String
where
    A: AsRef<str>,
    K: fmt::Display,
    V: fmt::Display,
    C: AsRef<str>,
{
    let block = options.iter().fold(
        DirectiveBlock::new(name)
            .with_arguments(arguments.iter().map(|argument| argument.as_ref().to_string())),
        |block, (key, value)| block.with_option(key, value),
    );
    block.with_content(content).render()
}

/// Render `code` as a `code-block` directive in `language`.
///
/// Every line is indented by [`INDENT`]; the result ends with a newline.
pub fn create_code_block(code: &str, language: &str) -> String {
    let mut block = DirectiveBlock::new("code-block");
    if !language.is_empty() {
        block = block.with_argument(language);
    }
    let mut rendered = block.with_content(code.lines()).render();
    rendered.push('\n');
    rendered
}

/// Prefix every non-blank line of `text` with `prefix`.
pub fn indent(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| indent_line(line, prefix))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_line(line: &str, prefix: &str) -> String {
    if line.trim().is_empty() {
        String::new()
    } else {
        format!("{prefix}{line}")
    }
}
