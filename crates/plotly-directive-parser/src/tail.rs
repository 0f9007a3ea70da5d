//! Grammar of the tail line of a plotting snippet.
//!
//! The figure of a snippet is the value of its last line, so that line must
//! be a bare expression. The accepted expressions are deliberately small:
//!
//! ```text
//! tail       := ws expression ws comment? EOF
//! bare       := ws expression ws EOF
//! expression := identifier trailer*
//! trailer    := ws '.' ws identifier      (attribute access)
//!             | ws '(' balanced ')'       (call)
//!             | ws '[' balanced ']'       (subscription)
//! balanced   := (string | '(' balanced ')' | '[' balanced ']' | '{' balanced '}' | other)*
//! ```
//!
//! Call arguments are not parsed; they are matched as balanced text that may
//! contain nested delimiters and string literals.

use winnow::{
    Parser as _,
    ascii::space0,
    combinator::{alt, cut_err, delimited, opt, preceded, repeat},
    error::{ContextError, ErrMode},
    token::{any, none_of, one_of, rest, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Error code of a failure that has a dedicated diagnostic
    Code(ErrorCode),
}

pub(crate) type Input<'src> = &'src str;
pub(crate) type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Reserved words that cannot start an expression.
///
/// `True`, `False` and `None` are keywords too but they are expressions.
const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// One postfix operation applied to an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerKind<'src> {
    /// `.name`
    Attribute(&'src str),
    /// `(arguments)`, holding the raw argument text
    Call(&'src str),
    /// `[index]`, holding the raw index text
    Subscript(&'src str),
}

/// A trailer together with the exact text it was parsed from, including
/// any whitespace in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer<'src> {
    kind: TrailerKind<'src>,
    text: &'src str,
}

impl<'src> Trailer<'src> {
    pub fn kind(&self) -> TrailerKind<'src> {
        self.kind
    }

    pub fn text(&self) -> &'src str {
        self.text
    }
}

/// An expression that can be bound to a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression<'src> {
    text: &'src str,
    head: &'src str,
    trailers: Vec<Trailer<'src>>,
}

impl<'src> Expression<'src> {
    /// Returns the source text of the expression, without surrounding
    /// whitespace or comment.
    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Returns the identifier the expression starts with.
    pub fn head(&self) -> &'src str {
        self.head
    }

    /// Returns the trailers in source order.
    pub fn trailers(&self) -> &[Trailer<'src>] {
        &self.trailers
    }

    /// Returns `true` if the expression ends with a `.show(...)` call.
    pub fn is_display_call(&self) -> bool {
        self.display_receiver().is_some()
    }

    /// Returns the object `.show(...)` is called on, if the expression ends
    /// with such a call.
    ///
    /// For `fig.show(renderer="png")` this is `fig`.
    pub fn display_receiver(&self) -> Option<&'src str> {
        let [.., attribute, call] = self.trailers.as_slice() else {
            return None;
        };
        match (attribute.kind, call.kind) {
            (TrailerKind::Attribute("show"), TrailerKind::Call(_)) => {
                let cut = attribute.text.len() + call.text.len();
                Some(self.text[..self.text.len() - cut].trim_end())
            }
            _ => None,
        }
    }

    /// Returns the text to bind: the receiver of a trailing display call, or
    /// the whole expression otherwise.
    pub fn bindable(&self) -> &'src str {
        self.display_receiver().unwrap_or(self.text)
    }
}

/// Classification of a tail line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tail<'src> {
    /// The line is an expression and can be bound to a variable.
    Assignable(Expression<'src>),
    /// The line is a statement, is blank, or does not parse.
    NotAssignable,
}

impl<'src> Tail<'src> {
    /// Classify a single line of code.
    ///
    /// Only whitespace and a trailing `\r` may surround the expression; a
    /// line with a trailing `#` comment is [`Tail::NotAssignable`].
    pub fn classify(line: &'src str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut input = line;

        match bare_line.parse_next(&mut input) {
            Ok(expression) if input.is_empty() => Tail::Assignable(expression),
            _ => Tail::NotAssignable,
        }
    }

    /// Returns `true` if the line can be bound to a variable.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Tail::Assignable(_))
    }

    /// Returns `true` if the line is an expression ending with a
    /// `.show(...)` call.
    pub fn is_display_call(&self) -> bool {
        match self {
            Tail::Assignable(expression) => expression.is_display_call(),
            Tail::NotAssignable => false,
        }
    }
}

/// Parse a single line as a tail expression.
///
/// Leading and trailing whitespace, a trailing `\r` and a trailing `#`
/// comment are allowed around the expression.
///
/// # Errors
///
/// Returns a [`Diagnostic`] with spans relative to `line`:
/// - [`ErrorCode::E100`] when the line is not an expression
/// - [`ErrorCode::E001`] for an unterminated string literal
/// - [`ErrorCode::E102`] for unbalanced delimiters
pub fn parse_tail(line: &str) -> Result<Expression<'_>, Diagnostic> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut input = line;

    match tail_line.parse_next(&mut input) {
        Ok(expression) if input.is_empty() => Ok(expression),
        Ok(expression) => {
            let offset = line.len() - input.len();
            Err(Diagnostic::error(format!(
                "last line is not an expression: `{}`",
                line.trim()
            ))
            .with_code(ErrorCode::E100)
            .with_label(
                Span::new(offset..line.len()),
                format!("expected end of expression after `{}`", expression.text()),
            )
            .with_help("end the snippet with the figure itself, e.g. `fig`"))
        }
        Err(err) => Err(convert_error(err, line, input.len())),
    }
}

/// Check that `name` is a plain identifier that is not a keyword.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut input = name;
    identifier.parse_next(&mut input).is_ok() && input.is_empty()
}

fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

fn identifier<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .verify(|name: &str| !is_keyword(name))
        .context(Context::Label("identifier"))
        .parse_next(input)
}

/// Body of a string literal up to, but not including, the closing quote.
fn quoted_body<'src>(quote: char) -> impl FnMut(&mut Input<'src>) -> IResult<()> {
    move |input: &mut Input<'src>| {
        repeat(
            0..,
            alt((preceded('\\', any).void(), none_of(['\\', quote]).void())),
        )
        .parse_next(input)
    }
}

fn double_quoted<'src>(input: &mut Input<'src>) -> IResult<()> {
    (
        '"',
        quoted_body('"'),
        cut_err('"').context(Context::Code(ErrorCode::E001)),
    )
        .void()
        .parse_next(input)
}

fn single_quoted<'src>(input: &mut Input<'src>) -> IResult<()> {
    (
        '\'',
        quoted_body('\''),
        cut_err('\'').context(Context::Code(ErrorCode::E001)),
    )
        .void()
        .parse_next(input)
}

fn string_literal<'src>(input: &mut Input<'src>) -> IResult<()> {
    alt((double_quoted, single_quoted))
        .context(Context::Label("string literal"))
        .parse_next(input)
}

fn is_plain(c: char) -> bool {
    !matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '"' | '\'')
}

/// A delimited group whose closing delimiter must match its opening one.
fn group<'src>(open: char, close: char) -> impl FnMut(&mut Input<'src>) -> IResult<()> {
    move |input: &mut Input<'src>| {
        (
            open,
            balanced,
            cut_err(close).context(Context::Code(ErrorCode::E102)),
        )
            .void()
            .parse_next(input)
    }
}

fn balanced_piece<'src>(input: &mut Input<'src>) -> IResult<()> {
    alt((
        string_literal,
        group('(', ')'),
        group('[', ']'),
        group('{', '}'),
        take_while(1.., is_plain).void(),
    ))
    .parse_next(input)
}

fn balanced<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., balanced_piece).parse_next(input)
}

fn enclosed<'src>(open: char, close: char) -> impl FnMut(&mut Input<'src>) -> IResult<&'src str> {
    move |input: &mut Input<'src>| {
        delimited(
            open,
            balanced.take(),
            cut_err(close).context(Context::Code(ErrorCode::E102)),
        )
        .parse_next(input)
    }
}

fn trailer<'src>(input: &mut Input<'src>) -> IResult<Trailer<'src>> {
    alt((
        preceded((space0, '.', space0), cut_err(identifier)).map(TrailerKind::Attribute),
        preceded(space0, enclosed('(', ')')).map(TrailerKind::Call),
        preceded(space0, enclosed('[', ']')).map(TrailerKind::Subscript),
    ))
    .with_taken()
    .map(|(kind, text)| Trailer { kind, text })
    .parse_next(input)
}

fn expression<'src>(input: &mut Input<'src>) -> IResult<Expression<'src>> {
    (identifier, repeat(0.., trailer))
        .with_taken()
        .map(
            |((head, trailers), text): ((&'src str, Vec<Trailer<'src>>), &'src str)| Expression {
                text,
                head,
                trailers,
            },
        )
        .parse_next(input)
}

fn comment<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    preceded('#', rest).parse_next(input)
}

fn tail_line<'src>(input: &mut Input<'src>) -> IResult<Expression<'src>> {
    delimited(space0, expression, (space0, opt(comment))).parse_next(input)
}

fn bare_line<'src>(input: &mut Input<'src>) -> IResult<Expression<'src>> {
    delimited(space0, expression, space0).parse_next(input)
}

/// Convert a winnow error into a diagnostic pointing into `line`.
///
/// `remaining` is the length of the input that was left when the error was
/// raised.
fn convert_error(error: ErrMode<ContextError<Context>>, line: &str, remaining: usize) -> Diagnostic {
    let offset = line.len() - remaining;
    let trimmed_start = line.len() - line.trim_start().len();
    let span = if offset < line.trim_end().len() {
        Span::new(offset.max(trimmed_start)..line.trim_end().len())
    } else {
        Span::new(trimmed_start..line.trim_end().len())
    };
    let statement = line.trim();

    let code = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().find_map(|ctx| match ctx {
            Context::Code(code) => Some(*code),
            Context::Label(_) => None,
        }),
        ErrMode::Incomplete(_) => None,
    };

    match code {
        Some(ErrorCode::E001) => Diagnostic::error("unterminated string literal in last line")
            .with_code(ErrorCode::E001)
            .with_label(span, "string is never closed")
            .with_help("close the string on the same line"),
        Some(ErrorCode::E102) => Diagnostic::error("unbalanced delimiters in last line")
            .with_code(ErrorCode::E102)
            .with_label(span, "delimiter is never closed or closed by the wrong one")
            .with_help("a multi-line call cannot be the last line; assign it and end with the variable"),
        _ => {
            let expected: Vec<String> = match &error {
                ErrMode::Backtrack(e) | ErrMode::Cut(e) => e
                    .context()
                    .filter_map(|ctx| match ctx {
                        Context::Label(label) => Some(format!("expected {label}")),
                        Context::Code(_) => None,
                    })
                    .collect(),
                ErrMode::Incomplete(_) => Vec::new(),
            };
            let message = if expected.is_empty() {
                "not an identifier, attribute access or call".to_string()
            } else {
                expected.join(" → ")
            };

            Diagnostic::error(format!("last line is not an expression: `{statement}`"))
                .with_code(ErrorCode::E100)
                .with_label(span, message)
                .with_help("end the snippet with the figure itself, e.g. `fig`")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Expression<'_> {
        parse_tail(line).unwrap_or_else(|err| panic!("`{line}` should parse: {err}"))
    }

    fn error_code(line: &str) -> Option<ErrorCode> {
        parse_tail(line).expect_err("should not parse").code()
    }

    #[test]
    fn test_identifier() {
        let expr = parse("fig");

        assert_eq!(expr.text(), "fig");
        assert_eq!(expr.head(), "fig");
        assert!(expr.trailers().is_empty());
        assert!(!expr.is_display_call());
    }

    #[test]
    fn test_attribute_chain() {
        let expr = parse("figures.scatter.figure");

        assert_eq!(expr.head(), "figures");
        let kinds: Vec<_> = expr.trailers().iter().map(Trailer::kind).collect();
        assert_eq!(
            kinds,
            [
                TrailerKind::Attribute("scatter"),
                TrailerKind::Attribute("figure")
            ]
        );
    }

    #[test]
    fn test_call_with_nested_arguments() {
        let expr = parse(r#"px.scatter(x=[0, 1, 2], y=(0, 1, 4), labels={"x": "time (s)"})"#);

        assert_eq!(expr.head(), "px");
        assert_eq!(expr.trailers().len(), 2);
        assert_eq!(
            expr.trailers()[1].kind(),
            TrailerKind::Call(r#"x=[0, 1, 2], y=(0, 1, 4), labels={"x": "time (s)"}"#)
        );
    }

    #[test]
    fn test_subscript() {
        let expr = parse("figures[0]");

        assert_eq!(expr.trailers()[0].kind(), TrailerKind::Subscript("0"));
    }

    #[test]
    fn test_surrounding_whitespace_and_comment() {
        let expr = parse("  fig   # the figure\r");

        assert_eq!(expr.text(), "fig");
    }

    #[test]
    fn test_display_call() {
        assert_eq!(parse("fig.show()").display_receiver(), Some("fig"));
        assert_eq!(parse("fig.show(1, a=2)").display_receiver(), Some("fig"));
        assert_eq!(
            parse("px.line(df).show(renderer='png')").display_receiver(),
            Some("px.line(df)")
        );
        assert_eq!(parse("fig . show ()").display_receiver(), Some("fig"));
    }

    #[test]
    fn test_not_display_call() {
        assert!(!parse("fig.show").is_display_call());
        assert!(!parse("show()").is_display_call());
        assert!(!parse("fig.show().update()").is_display_call());
        assert!(!parse("fig.shows()").is_display_call());
    }

    #[test]
    fn test_bindable() {
        assert_eq!(parse("fig.show()").bindable(), "fig");
        assert_eq!(parse("go.Figure(data)").bindable(), "go.Figure(data)");
    }

    #[test]
    fn test_string_containing_delimiters() {
        let expr = parse(r#"fig.update_layout(title="f(x) = [x]")"#);

        assert_eq!(expr.trailers().len(), 2);
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let expr = parse(r#"fig.update_layout(title='it\'s')"#);

        assert_eq!(expr.text(), r#"fig.update_layout(title='it\'s')"#);
    }

    #[test]
    fn test_assignment_is_rejected() {
        let err = parse_tail("fig = px.line()").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert_eq!(err.labels()[0].span(), Span::new(4..15));
    }

    #[test]
    fn test_statements_are_rejected() {
        assert_eq!(error_code("import plotly"), Some(ErrorCode::E100));
        assert_eq!(error_code("return fig"), Some(ErrorCode::E100));
        assert_eq!(error_code("pass"), Some(ErrorCode::E100));
        assert_eq!(error_code("for x in xs:"), Some(ErrorCode::E100));
        assert_eq!(error_code(")"), Some(ErrorCode::E100));
        assert_eq!(error_code("42"), Some(ErrorCode::E100));
        assert_eq!(error_code(""), Some(ErrorCode::E100));
        assert_eq!(error_code("fig."), Some(ErrorCode::E100));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(error_code(r#"fig.show(title="oops)"#), Some(ErrorCode::E001));
    }

    #[test]
    fn test_unbalanced_delimiters() {
        assert_eq!(error_code("px.scatter(df,"), Some(ErrorCode::E102));
        assert_eq!(error_code("fig.show(]"), Some(ErrorCode::E102));
    }

    #[test]
    fn test_classify() {
        assert!(Tail::classify("fig").is_assignable());
        assert!(Tail::classify("fig.show()").is_assignable());
        assert_eq!(Tail::classify("a = 1"), Tail::NotAssignable);
        assert_eq!(Tail::classify("   "), Tail::NotAssignable);
    }

    #[test]
    fn test_classify_rejects_trailing_comment() {
        assert_eq!(Tail::classify("fig  # the figure"), Tail::NotAssignable);
        assert_eq!(Tail::classify("fig.show()  # display"), Tail::NotAssignable);
        assert!(Tail::classify("  fig.show()  \r").is_display_call());
        assert!(!Tail::classify("fig").is_display_call());
    }

    #[test]
    fn test_constants_are_expressions() {
        assert!(Tail::classify("None").is_assignable());
        assert!(Tail::classify("True").is_assignable());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("fig"));
        assert!(is_identifier("_figure_1"));
        assert!(!is_identifier("1fig"));
        assert!(!is_identifier("fig.x"));
        assert!(!is_identifier("class"));
        assert!(!is_identifier(""));
    }
}
