//! Elaboration of raw directive fields into typed [`PlotlyOptions`].
//!
//! Every field is checked and every problem is reported to the collector;
//! invalid fields are left unset.

use std::collections::HashMap;

use log::trace;
use plotly_directive_core::{
    camera::{CameraError, CameraSpec},
    figure::FigureSize,
    format::ExportFormat,
    options::{Align, PlotlyOptions},
};

use crate::{
    document::RawOption,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::Spanned,
};

/// Options accepted by the `plotly` directive.
pub const KNOWN_OPTIONS: &[&str] = &[
    "include-source",
    "include-directive-source",
    "camera",
    "width",
    "height",
    "scale",
    "format",
    "alt",
    "align",
    "class",
    "caption",
];

pub(crate) fn plotly_options(
    raw_options: &[RawOption],
    collector: &mut DiagnosticCollector,
) -> PlotlyOptions {
    let mut options = PlotlyOptions::default();
    let mut seen: HashMap<&str, &RawOption> = HashMap::new();
    let mut width = None;
    let mut height = None;

    for option in raw_options {
        let key = option.key.inner().as_str();
        let value = &option.value;

        if let Some(first) = seen.insert(key, option) {
            collector.emit(
                Diagnostic::error(format!("option `{key}` is given more than once"))
                    .with_code(ErrorCode::E206)
                    .with_label(option.key.span(), "duplicate option")
                    .with_secondary_label(first.key.span(), "first given here"),
            );
            continue;
        }

        trace!(key, value = value.inner().as_str(); "Elaborating option");
        match key {
            "include-source" => options.include_source = flag(value, collector),
            "include-directive-source" => options.include_directive_source = flag(value, collector),
            "camera" => options.camera = camera(value, collector),
            "width" => width = Some((option, pixels(value, collector))),
            "height" => height = Some((option, pixels(value, collector))),
            "scale" => options.scale = scale(value, collector),
            "format" => options.formats = formats(value, collector),
            "alt" => options.alt = Some(value.inner().clone()),
            "align" => match value.inner().parse::<Align>() {
                Ok(align) => options.align = Some(align),
                Err(message) => invalid_value(value, message, collector),
            },
            "class" => {
                options.classes = value
                    .inner()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
            }
            "caption" => options.caption = Some(value.inner().clone()),
            _ => collector.emit(
                Diagnostic::error(format!("unknown option `{key}`"))
                    .with_code(ErrorCode::E204)
                    .with_label(option.key.span(), "unknown option")
                    .with_help(format!("known options are: {}", KNOWN_OPTIONS.join(", "))),
            ),
        }
    }

    match (width, height) {
        (Some((_, Some(width))), Some((_, Some(height)))) => {
            options.size = Some(FigureSize::new(width, height));
        }
        (Some((_, None)), _) | (_, Some((_, None))) | (None, None) => {}
        (Some((given, _)), None) | (None, Some((given, _))) => {
            let missing = if given.key.inner() == "width" {
                "height"
            } else {
                "width"
            };
            collector.emit(
                Diagnostic::error(format!(
                    "option `{}` requires `{missing}`",
                    given.key.inner()
                ))
                .with_code(ErrorCode::E202)
                .with_label(given.key.span(), format!("`{missing}` is missing"))
                .with_help("give both `width` and `height`"),
            );
        }
    }

    options
}

fn invalid_value(
    value: &Spanned<String>,
    message: impl Into<String>,
    collector: &mut DiagnosticCollector,
) {
    collector.emit(
        Diagnostic::error(message)
            .with_code(ErrorCode::E202)
            .with_label(value.span(), "invalid value"),
    );
}

/// A flag option; an empty value means `true`.
fn flag(value: &Spanned<String>, collector: &mut DiagnosticCollector) -> Option<bool> {
    match value.inner().to_ascii_lowercase().as_str() {
        "" | "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        other => {
            invalid_value(
                value,
                format!("invalid boolean `{other}`, expected `true` or `false`"),
                collector,
            );
            None
        }
    }
}

fn camera(value: &Spanned<String>, collector: &mut DiagnosticCollector) -> Option<CameraSpec> {
    match value.inner().parse::<CameraSpec>() {
        Ok(camera) => Some(camera),
        Err(err) => {
            let (code, help) = match err {
                CameraError::InvalidLength { .. } => (
                    ErrorCode::E200,
                    "give eye, center and up vectors: `ex, ey, ez, cx, cy, cz, ux, uy, uz`",
                ),
                CameraError::InvalidNumber { .. } | CameraError::NonFinite { .. } => {
                    (ErrorCode::E201, "camera values must be finite numbers")
                }
            };
            collector.emit(
                Diagnostic::error(err.to_string())
                    .with_code(code)
                    .with_label(value.span(), "invalid camera")
                    .with_help(help),
            );
            None
        }
    }
}

fn pixels(value: &Spanned<String>, collector: &mut DiagnosticCollector) -> Option<u32> {
    match value.inner().parse::<u32>() {
        Ok(pixels) if pixels > 0 => Some(pixels),
        _ => {
            invalid_value(
                value,
                format!("invalid size `{}`, expected a positive integer", value.inner()),
                collector,
            );
            None
        }
    }
}

fn scale(value: &Spanned<String>, collector: &mut DiagnosticCollector) -> Option<f64> {
    match value.inner().parse::<f64>() {
        Ok(scale) if scale.is_finite() && scale > 0.0 => Some(scale),
        _ => {
            invalid_value(
                value,
                format!("invalid scale `{}`, expected a positive number", value.inner()),
                collector,
            );
            None
        }
    }
}

fn formats(
    value: &Spanned<String>,
    collector: &mut DiagnosticCollector,
) -> Option<Vec<ExportFormat>> {
    let parts: Vec<&str> = value
        .inner()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        invalid_value(value, "option `format` needs at least one format", collector);
        return None;
    }

    let mut formats = Vec::with_capacity(parts.len());
    let mut valid = true;
    for part in parts {
        match part.parse::<ExportFormat>() {
            Ok(format) if !formats.contains(&format) => formats.push(format),
            Ok(_) => {}
            Err(err) => {
                valid = false;
                collector.emit(
                    Diagnostic::error(err.to_string())
                        .with_code(ErrorCode::E203)
                        .with_label(value.span(), "unsupported format")
                        .with_help("supported formats are: html, png, pdf, svg, jpg"),
                );
            }
        }
    }

    valid.then_some(formats)
}
