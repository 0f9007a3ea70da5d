//! Static image output.

use std::{io::Write as _, path::Path, process::Command};

use log::debug;

use plotly_directive_core::{
    figure::{Figure, FigureSize},
    format::ExportFormat,
};

use super::Error;

/// Renders figures to static image files.
pub trait ImageExporter {
    /// Write `figure` to `path` as `format`.
    ///
    /// `size` and `scale` fall back to the renderer's defaults when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the renderer fails and [`Error::Io`] if
    /// its input cannot be prepared.
    fn export(
        &self,
        figure: &Figure,
        path: &Path,
        format: ExportFormat,
        size: Option<FigureSize>,
        scale: Option<f64>,
    ) -> Result<(), Error>;
}

/// Reads the figure JSON and writes the image with `plotly.io.write_image`.
///
/// Arguments: figure path, output path, format, width, height, scale. Empty
/// size and scale arguments are left to plotly.
const WRITE_IMAGE_SCRIPT: &str = "\
import sys
import plotly.io as pio
figure = pio.read_json(sys.argv[1])
options = {'format': sys.argv[3]}
for key, value in zip(('width', 'height', 'scale'), sys.argv[4:7]):
    if value:
        options[key] = float(value) if key == 'scale' else int(value)
pio.write_image(figure, sys.argv[2], **options)
";

/// Renders static images with plotly's Kaleido engine through Python.
#[derive(Debug, Clone)]
pub struct KaleidoExporter {
    python: String,
}

impl Default for KaleidoExporter {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl KaleidoExporter {
    /// Create an exporter that runs the interpreter `python`.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// Arguments passed to the interpreter, after the figure file.
    fn arguments(
        path: &Path,
        format: ExportFormat,
        size: Option<FigureSize>,
        scale: Option<f64>,
    ) -> Vec<String> {
        let (width, height) = size.map_or((String::new(), String::new()), |size| {
            (size.width.to_string(), size.height.to_string())
        });
        vec![
            path.to_string_lossy().into_owned(),
            format.extension().to_string(),
            width,
            height,
            scale.map(|scale| scale.to_string()).unwrap_or_default(),
        ]
    }
}

impl ImageExporter for KaleidoExporter {
    fn export(
        &self,
        figure: &Figure,
        path: &Path,
        format: ExportFormat,
        size: Option<FigureSize>,
        scale: Option<f64>,
    ) -> Result<(), Error> {
        let mut input = tempfile::Builder::new()
            .prefix("plotly-figure-")
            .suffix(".json")
            .tempfile()?;
        input.write_all(figure.to_json().as_bytes())?;
        input.flush()?;

        debug!(python = self.python.as_str(), format:%; "Rendering static image");
        let output = Command::new(&self.python)
            .arg("-c")
            .arg(WRITE_IMAGE_SCRIPT)
            .arg(input.path())
            .args(Self::arguments(path, format, size, scale))
            .output()
            .map_err(|err| Error::Render(format!("failed to run `{}`: {err}", self.python)))?;

        if !output.status.success() {
            return Err(Error::Render(format!(
                "writing '{}' failed: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}
