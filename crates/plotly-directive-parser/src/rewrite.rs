//! Source-to-source rewriting of plotting snippets.
//!
//! A snippet ends with the figure it builds, either as a bare expression or
//! as `fig.show()`. Before the snippet is executed its tail is rewritten into
//! an assignment so the figure can be picked up by name, and an optional
//! camera is applied to the bound figure.

use log::{debug, trace};
use plotly_directive_core::camera::{CameraError, CameraSpec};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    lines::last_line,
    span::Span,
    tail::{is_identifier, parse_tail},
};

/// Bind the figure built by `code` to the variable `name`.
///
/// The last non-blank line is replaced by `<name> = <expression>`, keeping
/// its indentation. When that line calls `.show(...)` the call is dropped
/// and its receiver is bound instead. Every other line is returned as is.
///
/// ```
/// # use plotly_directive_parser::assign_last_line_into_variable;
/// let code = assign_last_line_into_variable("a = 1\na", "b").unwrap();
/// assert_eq!(code, "a = 1\nb = a");
///
/// let code = assign_last_line_into_variable("fig = make()\nfig.show()\n", "out").unwrap();
/// assert_eq!(code, "fig = make()\nout = fig\n");
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] whose spans point into `code`:
/// - [`ErrorCode::E103`] if `name` is not an identifier
/// - [`ErrorCode::E101`] if `code` has no non-blank line
/// - [`ErrorCode::E100`], [`ErrorCode::E001`] or [`ErrorCode::E102`] if the
///   last line is not a bindable expression
pub fn assign_last_line_into_variable(code: &str, name: &str) -> Result<String, ParseError> {
    if !is_identifier(name) {
        return Err(Diagnostic::error(format!("`{name}` is not a valid variable name"))
            .with_code(ErrorCode::E103)
            .with_help("use a Python identifier such as `fig`")
            .into());
    }

    let Some(line) = last_line(code) else {
        return Err(Diagnostic::error("code block is empty")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(0..code.len()), "no code to bind")
            .with_help("end the snippet with the figure, e.g. `fig`")
            .into());
    };

    let expression = parse_tail(line.text).map_err(|diag| diag.shifted(line.start))?;
    if expression.is_display_call() {
        debug!(receiver = expression.bindable(); "Dropping display call from last line");
    }

    let indent = &line.text[..line.text.len() - line.text.trim_start().len()];
    let carriage_return = if line.text.ends_with('\r') { "\r" } else { "" };

    let mut rewritten = String::with_capacity(code.len() + name.len() + 3);
    rewritten.push_str(&code[..line.start]);
    rewritten.push_str(indent);
    rewritten.push_str(name);
    rewritten.push_str(" = ");
    rewritten.push_str(expression.bindable());
    rewritten.push_str(carriage_return);
    rewritten.push_str(&code[line.end()..]);

    trace!(variable = name, tail = expression.text(); "Bound last line");
    Ok(rewritten)
}

/// Append a statement that applies `camera` to the figure bound to `name`.
///
/// The statement is added as a new line after `code`.
pub fn inject_camera(code: &str, name: &str, camera: &CameraSpec) -> String {
    let statement = format!(
        "{name}.update_layout(scene_camera={})",
        camera.to_python_dict()
    );

    if code.is_empty() {
        statement
    } else if code.ends_with('\n') {
        format!("{code}{statement}\n")
    } else {
        format!("{code}\n{statement}")
    }
}

/// Append a camera update built from nine raw values.
///
/// The values are the `eye`, `center` and `up` vectors in that order.
///
/// ```
/// # use plotly_directive_parser::set_camera_position;
/// let values = [1.25, 1.25, 1.25, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
/// let code = set_camera_position("fig = make()", "fig", &values).unwrap();
/// assert!(code.ends_with("'up': {'x': 0, 'y': 0, 'z': 1}})"));
/// ```
///
/// # Errors
///
/// Returns [`CameraError::InvalidLength`] unless exactly nine values are
/// given, and [`CameraError::NonFinite`] for `NaN` or infinite values.
pub fn set_camera_position(code: &str, name: &str, camera: &[f64]) -> Result<String, CameraError> {
    let camera = CameraSpec::try_from(camera)?;
    Ok(inject_camera(code, name, &camera))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(result: Result<String, ParseError>) -> String {
        result.unwrap_or_else(|err| panic!("rewrite failed: {err}"))
    }

    fn error_code_of(result: Result<String, ParseError>) -> ErrorCode {
        let err = result.expect_err("rewrite should fail");
        err.diagnostics()[0].code().expect("diagnostic has a code")
    }

    #[test]
    fn test_assign_bare_name() {
        assert_eq!(
            code_of(assign_last_line_into_variable("a = 1\na", "b")),
            "a = 1\nb = a"
        );
    }

    #[test]
    fn test_assign_single_line() {
        assert_eq!(
            code_of(assign_last_line_into_variable("px.line(x=[1, 2])", "fig")),
            "fig = px.line(x=[1, 2])"
        );
    }

    #[test]
    fn test_assign_strips_show_call() {
        let code = "import plotly.graph_objects as go\nfig = go.Figure()\nfig.show(renderer='png')";

        assert_eq!(
            code_of(assign_last_line_into_variable(code, "__fig__")),
            "import plotly.graph_objects as go\nfig = go.Figure()\n__fig__ = fig"
        );
    }

    #[test]
    fn test_assign_keeps_trailing_blank_lines() {
        assert_eq!(
            code_of(assign_last_line_into_variable("fig = f()\nfig\n\n", "out")),
            "fig = f()\nout = fig\n\n"
        );
    }

    #[test]
    fn test_assign_keeps_indentation_and_carriage_return() {
        assert_eq!(
            code_of(assign_last_line_into_variable("if True:\r\n    fig\r\n", "out")),
            "if True:\r\n    out = fig\r\n"
        );
    }

    #[test]
    fn test_assign_drops_trailing_comment() {
        assert_eq!(
            code_of(assign_last_line_into_variable("fig  # the figure", "out")),
            "out = fig"
        );
    }

    #[test]
    fn test_assign_rejects_statement_tail() {
        let err = assign_last_line_into_variable("a = 1\nb = 2", "fig").unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.labels()[0].span(), Span::new(8..11));
    }

    #[test]
    fn test_assign_rejects_control_statement() {
        assert_eq!(
            error_code_of(assign_last_line_into_variable("for x in xs:", "fig")),
            ErrorCode::E100
        );
        assert_eq!(
            error_code_of(assign_last_line_into_variable("import plotly", "fig")),
            ErrorCode::E100
        );
    }

    #[test]
    fn test_assign_rejects_empty_code() {
        assert_eq!(
            error_code_of(assign_last_line_into_variable("", "fig")),
            ErrorCode::E101
        );
        assert_eq!(
            error_code_of(assign_last_line_into_variable("\n   \n", "fig")),
            ErrorCode::E101
        );
    }

    #[test]
    fn test_assign_rejects_unbalanced_tail() {
        assert_eq!(
            error_code_of(assign_last_line_into_variable("fig = f(\n  1,\n)", "out")),
            ErrorCode::E100
        );
        assert_eq!(
            error_code_of(assign_last_line_into_variable("px.line(df,", "out")),
            ErrorCode::E102
        );
    }

    #[test]
    fn test_assign_rejects_invalid_name() {
        assert_eq!(
            error_code_of(assign_last_line_into_variable("fig", "my fig")),
            ErrorCode::E103
        );
        assert_eq!(
            error_code_of(assign_last_line_into_variable("fig", "lambda")),
            ErrorCode::E103
        );
    }

    #[test]
    fn test_set_camera_position() {
        let values: Vec<f64> = (1..=9).map(f64::from).collect();

        let code = set_camera_position("fig = f()", "fig", &values).unwrap();

        assert!(code.contains("fig.update_layout(scene_camera"));
        assert!(code.contains("'eye': {'x': 1, 'y': 2, 'z': 3}"));
        assert!(code.contains("'center': {'x': 4, 'y': 5, 'z': 6}"));
        assert!(code.contains("'up': {'x': 7, 'y': 8, 'z': 9}"));
        assert!(code.starts_with("fig = f()\n"));
    }

    #[test]
    fn test_set_camera_position_rejects_wrong_count() {
        let err = set_camera_position("fig", "fig", &[1.0, 2.0]).unwrap_err();

        assert_eq!(err, CameraError::InvalidLength { count: 2 });
    }

    #[test]
    fn test_inject_camera_line_placement() {
        let camera: CameraSpec = "1 1 1 0 0 0 0 0 1".parse().unwrap();

        let empty = inject_camera("", "fig", &camera);
        assert!(empty.starts_with("fig.update_layout("));
        assert!(!empty.contains('\n'));

        let terminated = inject_camera("out = fig\n", "out", &camera);
        assert!(terminated.starts_with("out = fig\nout.update_layout("));
        assert!(terminated.ends_with(")\n"));
    }
}
