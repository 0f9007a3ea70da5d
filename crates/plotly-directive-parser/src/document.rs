//! Scanner for `plotly` directives in reStructuredText documents.
//!
//! The scanner is line based. It recognizes directive markers
//! (`.. name:: arguments`), reads the option field list and the indented
//! content of every `plotly` directive, and leaves all other text alone.
//! Literal blocks (`code-block` directives and paragraphs ending in `::`)
//! are skipped so that documentation showing the directive itself is not
//! executed.

use log::{debug, trace};
use plotly_directive_core::{code::CodeBlock, markup::DirectiveBlock, options::PlotlyOptions};
use winnow::{
    Parser as _,
    ascii::space1,
    combinator::{delimited, preceded, repeat},
    token::{rest, take_while},
};

use crate::{
    elaborate,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{Span, Spanned},
    tail::{Context, IResult, Input},
};

/// Name of the directive this crate processes.
pub const DIRECTIVE_NAME: &str = "plotly";

/// Option that asks for the directive source to be shown. It is never part
/// of the re-rendered source itself.
pub const INCLUDE_DIRECTIVE_SOURCE: &str = "include-directive-source";

/// Directives whose content is shown verbatim.
const LITERAL_DIRECTIVES: &[&str] = &["code-block", "code", "sourcecode", "literalinclude"];

/// Where the plotting code of a directive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSource {
    /// Code written as the directive content.
    Inline(CodeBlock),
    /// Path of a script given as the directive argument.
    Script(String),
}

/// One `:key: value` field of a directive, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOption {
    pub key: Spanned<String>,
    pub value: Spanned<String>,
}

/// A `plotly` directive found in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotlyBlock {
    span: Span,
    indent: String,
    source: CodeSource,
    options: PlotlyOptions,
    raw_options: Vec<RawOption>,
}

impl PlotlyBlock {
    /// Byte range of the directive in the document, from the start of the
    /// marker line to the end of its last non-blank line.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Indentation in front of the directive marker.
    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn source(&self) -> &CodeSource {
        &self.source
    }

    pub fn options(&self) -> &PlotlyOptions {
        &self.options
    }

    pub fn raw_options(&self) -> &[RawOption] {
        &self.raw_options
    }

    /// Render the directive back to reStructuredText, without the
    /// `include-directive-source` option.
    pub fn directive_source(&self) -> String {
        let mut block = DirectiveBlock::new(DIRECTIVE_NAME);
        if let CodeSource::Script(path) = &self.source {
            block = block.with_argument(path.as_str());
        }
        for option in &self.raw_options {
            if option.key.inner() != INCLUDE_DIRECTIVE_SOURCE {
                block = block.with_option(option.key.inner(), option.value.inner());
            }
        }
        if let CodeSource::Inline(code) = &self.source {
            block = block.with_content(code.lines());
        }
        block.render()
    }
}

/// A physical line of the document.
#[derive(Debug, Clone, Copy)]
struct Line<'src> {
    /// Byte offset of the first character.
    start: usize,
    /// Byte offset past the line terminator.
    end: usize,
    /// The line without its terminator.
    text: &'src str,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Width in bytes of the leading spaces and tabs. Other whitespace is
    /// not indentation.
    fn indentation(&self) -> usize {
        self.text.len() - self.text.trim_start_matches([' ', '\t']).len()
    }

    /// Byte offset in the document of byte `offset` of the line text.
    fn offset(&self, offset: usize) -> usize {
        self.start + offset
    }
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut start = 0;
    source
        .split_inclusive('\n')
        .map(|raw| {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let text = text.strip_suffix('\r').unwrap_or(text);
            let line = Line {
                start,
                end: start + raw.len(),
                text,
            };
            start += raw.len();
            line
        })
        .collect()
}

/// A directive marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker<'src> {
    name: &'src str,
    /// Everything after `::`, untrimmed.
    arguments: &'src str,
}

fn name_segment(input: &mut Input<'_>) -> IResult<()> {
    take_while(1.., |c: char| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'))
        .void()
        .parse_next(input)
}

fn directive_name<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    (name_segment, repeat(0.., (':', name_segment)).map(|()| ()))
        .take()
        .context(Context::Label("directive name"))
        .parse_next(input)
}

fn after_marker<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    rest.verify(|tail: &str| tail.is_empty() || tail.starts_with(char::is_whitespace))
        .parse_next(input)
}

fn marker<'src>(input: &mut Input<'src>) -> IResult<Marker<'src>> {
    (preceded(("..", space1), directive_name), preceded("::", after_marker))
        .map(|(name, arguments)| Marker { name, arguments })
        .parse_next(input)
}

fn field<'src>(input: &mut Input<'src>) -> IResult<(&'src str, &'src str)> {
    (
        delimited(
            ':',
            take_while(1.., |c: char| c != ':' && !c.is_whitespace()),
            ':',
        ),
        after_marker,
    )
        .context(Context::Label("option field"))
        .parse_next(input)
}

/// Parse the text of a line, after its indentation, as a directive marker.
fn parse_marker(text: &str) -> Option<Marker<'_>> {
    let mut input = text;
    marker.parse_next(&mut input).ok()
}

/// Parse the text of a line, after its indentation, as an option field.
fn parse_field(text: &str) -> Option<(&str, &str)> {
    let mut input = text;
    field.parse_next(&mut input).ok()
}

/// Index one past the last non-blank line indented deeper than `indent`
/// that follows `header`.
fn body_end(lines: &[Line<'_>], header: usize, indent: usize) -> usize {
    let mut end = header + 1;
    for (index, line) in lines.iter().enumerate().skip(header + 1) {
        if line.is_blank() {
            continue;
        }
        if line.indentation() <= indent {
            break;
        }
        end = index + 1;
    }
    end
}

/// Trimmed `text` together with its span, given the document offset of
/// `text`.
fn trimmed(text: &str, offset: usize) -> Spanned<String> {
    let leading = text.len() - text.trim_start().len();
    let value = text.trim();
    Spanned::new(
        value.to_string(),
        Span::new(offset + leading..offset + leading + value.len()),
    )
}

/// Find and validate every `plotly` directive of `source`.
///
/// All directives are checked before returning, so the error carries the
/// diagnostics of every invalid directive. Spans point into `source`.
///
/// ```
/// # use plotly_directive_parser::{parse_document, CodeSource};
/// let source = "Intro\n\n.. plotly::\n   :include-source:\n\n   fig = make()\n   fig\n\nOutro\n";
/// let blocks = parse_document(source).unwrap();
///
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].options().include_source, Some(true));
/// assert!(matches!(blocks[0].source(), CodeSource::Inline(_)));
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] with one diagnostic per problem found in the
/// directive options and bodies.
pub fn parse_document(source: &str) -> Result<Vec<PlotlyBlock>, ParseError> {
    let lines = split_lines(source);
    let mut collector = DiagnosticCollector::new();
    let mut blocks = Vec::new();

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        let indent = line.indentation();
        let text = &line.text[indent..];

        match parse_marker(text) {
            Some(marker) if marker.name == DIRECTIVE_NAME => {
                let end = body_end(&lines, index, indent);
                trace!(line = index + 1; "Found plotly directive");
                if let Some(block) = read_block(&lines[index..end], marker, &mut collector) {
                    blocks.push(block);
                }
                index = end;
            }
            Some(marker) if LITERAL_DIRECTIVES.contains(&marker.name) => {
                index = body_end(&lines, index, indent);
            }
            Some(_) => index += 1,
            None if !text.starts_with("..") && text.trim_end().ends_with("::") => {
                index = body_end(&lines, index, indent);
            }
            None => index += 1,
        }
    }

    collector.finish()?;
    debug!(directives = blocks.len(); "Scanned document");
    Ok(blocks)
}

/// Read one directive from its lines; `lines[0]` is the marker line.
fn read_block(
    lines: &[Line<'_>],
    marker: Marker<'_>,
    collector: &mut DiagnosticCollector,
) -> Option<PlotlyBlock> {
    let header = lines[0];
    let indent = header.indentation();
    let span = Span::new(header.start..lines[lines.len() - 1].end);
    let marker_span = Span::new(header.offset(indent)..header.offset(header.text.len()));

    let argument_offset = header.offset(header.text.len() - marker.arguments.len());
    let argument = trimmed(marker.arguments, argument_offset);

    // Field list directly after the marker.
    let mut raw_options: Vec<RawOption> = Vec::new();
    let mut field_indent = None;
    let mut cursor = 1;
    while cursor < lines.len() && !lines[cursor].is_blank() {
        let line = lines[cursor];
        let line_indent = line.indentation();
        let text = &line.text[line_indent..];

        if let Some((key, value)) = parse_field(text) {
            let key_start = line.offset(line_indent + 1);
            let value_offset = line.offset(line.text.len() - value.len());
            raw_options.push(RawOption {
                key: Spanned::new(key.to_string(), Span::new(key_start..key_start + key.len())),
                value: trimmed(value, value_offset),
            });
            field_indent = Some(line_indent);
        } else if let Some(last) = raw_options
            .last_mut()
            .filter(|_| field_indent.is_some_and(|field| line_indent > field))
        {
            // Continuation of a field value.
            let continuation = trimmed(text, line.offset(line_indent));
            let joined = if last.value.inner().is_empty() {
                continuation.inner().clone()
            } else {
                format!("{} {}", last.value.inner(), continuation.inner())
            };
            let value_span = if last.value.inner().is_empty() {
                continuation.span()
            } else {
                last.value.span().union(continuation.span())
            };
            last.value = Spanned::new(joined, value_span);
        } else {
            break;
        }
        cursor += 1;
    }

    let content_lines = &lines[cursor..];
    let code = dedent(content_lines);

    let source = match (argument.inner().is_empty(), code.is_blank()) {
        (false, true) if argument.inner().split_whitespace().count() > 1 => {
            collector.emit(
                Diagnostic::error("plotly directive takes a single script path")
                    .with_code(ErrorCode::E205)
                    .with_label(argument.span(), "more than one argument")
                    .with_help("quote-free paths without spaces are supported"),
            );
            None
        }
        (false, true) => Some(CodeSource::Script(argument.inner().clone())),
        (true, false) => Some(CodeSource::Inline(code)),
        (false, false) => {
            let content_span = content_span(content_lines).unwrap_or(span);
            collector.emit(
                Diagnostic::error("plotly directive has both a script path and inline code")
                    .with_code(ErrorCode::E205)
                    .with_label(argument.span(), "script path given here")
                    .with_secondary_label(content_span, "inline code given here")
                    .with_help("remove either the argument or the content"),
            );
            None
        }
        (true, true) => {
            collector.emit(
                Diagnostic::error("plotly directive has no code")
                    .with_code(ErrorCode::E205)
                    .with_label(marker_span, "directive without content")
                    .with_help("add plotting code as indented content or give a script path"),
            );
            None
        }
    };

    let options = elaborate::plotly_options(&raw_options, collector);

    Some(PlotlyBlock {
        span,
        indent: header.text[..indent].to_string(),
        source: source?,
        options,
        raw_options,
    })
}

fn content_span(lines: &[Line<'_>]) -> Option<Span> {
    let first = lines.iter().find(|line| !line.is_blank())?;
    let last = lines.iter().rev().find(|line| !line.is_blank())?;
    Some(Span::new(
        first.offset(first.indentation())..last.offset(last.text.len()),
    ))
}

/// Strip the common indentation of the non-blank lines. Leading and trailing
/// blank lines are dropped, inner blank lines become empty.
fn dedent(lines: &[Line<'_>]) -> CodeBlock {
    let Some(first) = lines.iter().position(|line| !line.is_blank()) else {
        return CodeBlock::default();
    };
    let last = lines
        .iter()
        .rposition(|line| !line.is_blank())
        .unwrap_or(first);
    let lines = &lines[first..=last];

    let common = lines
        .iter()
        .filter(|line| !line.is_blank())
        .map(Line::indentation)
        .min()
        .unwrap_or(0);

    CodeBlock::new(
        lines
            .iter()
            .map(|line| {
                if line.is_blank() {
                    String::new()
                } else {
                    line.text[common..].to_string()
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotly_directive_core::format::ExportFormat;

    fn parse_one(source: &str) -> PlotlyBlock {
        let mut blocks = parse_document(source).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(blocks.len(), 1, "expected exactly one directive");
        blocks.remove(0)
    }

    fn inline_code(block: &PlotlyBlock) -> &CodeBlock {
        match block.source() {
            CodeSource::Inline(code) => code,
            CodeSource::Script(path) => panic!("expected inline code, got script `{path}`"),
        }
    }

    #[test]
    fn test_document_without_directives() {
        let source = "Title\n=====\n\nSome text.\n\n.. note::\n\n   A note.\n";

        assert!(parse_document(source).unwrap().is_empty());
    }

    #[test]
    fn test_inline_directive() {
        let source = "Text\n\n.. plotly::\n\n   import plotly.express as px\n\n   px.line(x=[1, 2])\n\nAfter\n";

        let block = parse_one(source);

        assert_eq!(
            inline_code(&block).lines(),
            ["import plotly.express as px", "", "px.line(x=[1, 2])"]
        );
        assert_eq!(block.indent(), "");
        let directive = &source[block.span().range()];
        assert!(directive.starts_with(".. plotly::"));
        assert!(directive.ends_with("px.line(x=[1, 2])\n"));
    }

    #[test]
    fn test_script_directive() {
        let source = ".. plotly:: scripts/surface.py\n   :format: png, html\n";

        let block = parse_one(source);

        assert_eq!(block.source(), &CodeSource::Script("scripts/surface.py".to_string()));
        assert_eq!(
            block.options().formats,
            Some(vec![ExportFormat::Png, ExportFormat::Html])
        );
    }

    #[test]
    fn test_nested_directive_keeps_indentation() {
        let source = ".. note::\n\n   .. plotly::\n      :alt: A line\n\n      fig\n\nEnd\n";

        let block = parse_one(source);

        assert_eq!(block.indent(), "   ");
        assert_eq!(block.options().alt.as_deref(), Some("A line"));
        assert_eq!(inline_code(&block).lines(), ["fig"]);
    }

    #[test]
    fn test_option_spans_point_into_document() {
        let source = ".. plotly::\n   :caption: A line\n\n   fig\n";

        let block = parse_one(source);

        let option = &block.raw_options()[0];
        assert_eq!(&source[option.key.span().range()], "caption");
        assert_eq!(&source[option.value.span().range()], "A line");
    }

    #[test]
    fn test_continued_option_value() {
        let source = ".. plotly::\n   :caption: A very\n      long caption\n\n   fig\n";

        let block = parse_one(source);

        assert_eq!(block.options().caption.as_deref(), Some("A very long caption"));
    }

    #[test]
    fn test_literal_blocks_are_skipped() {
        let source = "Use it like this::\n\n   .. plotly::\n\n      fig\n\n.. code-block:: rst\n\n   .. plotly::\n\n      fig\n";

        assert!(parse_document(source).unwrap().is_empty());
    }

    #[test]
    fn test_multiple_directives_in_order() {
        let source = ".. plotly::\n\n   first\n\nText\n\n.. plotly::\n\n   second\n";

        let blocks = parse_document(source).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(inline_code(&blocks[0]).lines(), ["first"]);
        assert_eq!(inline_code(&blocks[1]).lines(), ["second"]);
        assert!(blocks[0].span().end() <= blocks[1].span().start());
    }

    #[test]
    fn test_directive_without_code() {
        let err = parse_document(".. plotly::\n   :alt: nothing\n").unwrap_err();

        assert!(err.has_code(ErrorCode::E205));
    }

    #[test]
    fn test_directive_with_argument_and_content() {
        let err = parse_document(".. plotly:: script.py\n\n   fig\n").unwrap_err();

        assert!(err.has_code(ErrorCode::E205));
        assert_eq!(err.diagnostics()[0].labels().len(), 2);
    }

    #[test]
    fn test_errors_from_all_directives_are_reported() {
        let source = ".. plotly::\n   :colour: red\n\n   fig\n\n.. plotly::\n   :camera: 1 2 3\n\n   fig\n";

        let err = parse_document(source).unwrap_err();

        assert_eq!(err.diagnostics().len(), 2);
        assert!(err.has_code(ErrorCode::E204));
        assert!(err.has_code(ErrorCode::E200));
    }

    #[test]
    fn test_directive_source_excludes_own_option() {
        let source = ".. plotly::\n   :include-directive-source:\n   :alt: A line\n\n   fig = make()\n   fig\n";

        let block = parse_one(source);

        assert_eq!(
            block.directive_source(),
            ".. plotly::\n   :alt: A line\n\n   fig = make()\n   fig"
        );
    }

    #[test]
    fn test_crlf_document() {
        let source = ".. plotly::\r\n   :include-source: yes\r\n\r\n   fig\r\n";

        let block = parse_one(source);

        assert_eq!(block.options().include_source, Some(true));
        assert_eq!(inline_code(&block).lines(), ["fig"]);
    }

    #[test]
    fn test_non_ascii_whitespace_is_not_indentation() {
        let source = ".. plotly::\n\n   a = 1\n\u{a0}\u{a0}fig\n";

        let block = parse_one(source);

        assert_eq!(inline_code(&block).lines(), ["a = 1"]);
        assert!(source[block.span().range()].ends_with("a = 1\n"));
    }

    #[test]
    fn test_non_ascii_whitespace_inside_body_is_kept() {
        let source = ".. plotly::\n\n   a = 1\n   \u{a0}\u{a0}fig\n  \u{3000}\n";

        let block = parse_one(source);

        assert_eq!(inline_code(&block).lines(), ["a = 1", "\u{a0}\u{a0}fig"]);
    }

    #[test]
    fn test_domain_directive_names() {
        assert_eq!(parse_marker(".. py:function:: f()").map(|m| m.name), Some("py:function"));
        assert_eq!(parse_marker(".. plotly::").map(|m| m.name), Some("plotly"));
        assert_eq!(parse_marker(".. plotly::x"), None);
        assert_eq!(parse_marker(".. _label:"), None);
        assert_eq!(parse_marker("..plotly::"), None);
    }
}
