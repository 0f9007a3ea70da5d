//! Typed options of a `plotly` directive.
//!
//! Directive options arrive as raw `:key: value` text; the parser validates
//! them into a [`PlotlyOptions`]. Every field is optional so that unset
//! options fall back to the application configuration.

use std::{fmt, str::FromStr};

use crate::{camera::CameraSpec, figure::FigureSize, format::ExportFormat};

/// Horizontal alignment of a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

impl FromStr for Align {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            other => Err(format!(
                "invalid alignment `{other}`, expected `left`, `center` or `right`"
            )),
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated options of one `plotly` directive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotlyOptions {
    /// Show the plotting code above the figure.
    pub include_source: Option<bool>,
    /// Show the directive itself above the figure.
    pub include_directive_source: Option<bool>,
    /// Camera to inject before the figure is rendered.
    pub camera: Option<CameraSpec>,
    /// Pixel size of static images and of the HTML plot area.
    pub size: Option<FigureSize>,
    /// Scale multiplier of static images.
    pub scale: Option<f64>,
    /// Formats to render, overriding the configured defaults.
    pub formats: Option<Vec<ExportFormat>>,
    pub alt: Option<String>,
    pub align: Option<Align>,
    /// Extra CSS classes for the rendered image.
    pub classes: Vec<String>,
    pub caption: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_from_str() {
        assert_eq!("left".parse::<Align>(), Ok(Align::Left));
        assert_eq!(" center ".parse::<Align>(), Ok(Align::Center));
        assert_eq!("right".parse::<Align>(), Ok(Align::Right));
        assert!("middle".parse::<Align>().is_err());
    }

    #[test]
    fn test_default_options_are_unset() {
        let options = PlotlyOptions::default();

        assert!(options.include_source.is_none());
        assert!(options.camera.is_none());
        assert!(options.formats.is_none());
        assert!(options.classes.is_empty());
    }
}
