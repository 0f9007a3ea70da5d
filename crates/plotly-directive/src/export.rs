//! Persisting figures to disk.
//!
//! This module is the last stage of rendering a directive: the captured
//! [`Figure`] is written to one file per requested format.
//!
//! # Pipeline Position
//!
//! ```text
//! Directive
//!     ↓ rewrite
//! Executable Code
//!     ↓ execute
//! Figure
//!     ↓ export (this module)
//! Figure Files
//! ```
//!
//! # Available Backends
//!
//! - [`html`] - interactive HTML page via [`html::HtmlExporter`]
//! - [`image`] - static images through the [`image::ImageExporter`] seam,
//!   implemented by [`image::KaleidoExporter`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. [`Error`] converts into
//! [`PlotlyDirectiveError::Export`] at the crate boundary.
//!
//! [`PlotlyDirectiveError::Export`]: crate::PlotlyDirectiveError::Export

/// Interactive HTML export backend.
pub mod html;
/// Static image export backend.
pub mod image;

use std::path::Path;

use log::info;

use plotly_directive_core::{
    figure::{Figure, FigureSize},
    format::{ExportFormat, UnsupportedFormat},
};

use html::HtmlExporter;
use image::{ImageExporter, KaleidoExporter};

/// Errors that can occur while persisting a figure.
#[derive(Debug)]
pub enum Error {
    /// The target path has an extension no backend handles.
    UnsupportedFormat(UnsupportedFormat),
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(err) => write!(f, "{err}"),
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedFormat(err) => Some(err),
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<UnsupportedFormat> for Error {
    fn from(err: UnsupportedFormat) -> Self {
        Self::UnsupportedFormat(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Writes figures with the backend matching the target extension.
pub struct FigurePersister {
    html: HtmlExporter,
    images: Box<dyn ImageExporter>,
}

impl Default for FigurePersister {
    fn default() -> Self {
        Self::new(HtmlExporter::default(), KaleidoExporter::default())
    }
}

impl FigurePersister {
    /// Create a persister from an HTML writer and an image exporter.
    pub fn new(html: HtmlExporter, images: impl ImageExporter + 'static) -> Self {
        Self {
            html,
            images: Box::new(images),
        }
    }

    /// Replace the image exporter.
    pub fn with_image_exporter(mut self, images: impl ImageExporter + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    /// Write `figure` to `path`, picking the format from the extension.
    ///
    /// `size` is the pixel size of the plot and `scale` multiplies the
    /// resolution of static images; `None` keeps the plotly defaults. The
    /// file is created or overwritten, its directory must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] before touching the filesystem
    /// if the extension is not `html`, `png`, `pdf`, `svg` or `jpg`.
    pub fn save(
        &self,
        figure: &Figure,
        path: &Path,
        size: Option<FigureSize>,
        scale: Option<f64>,
    ) -> Result<(), Error> {
        let format = ExportFormat::from_path(path)?;

        match format {
            ExportFormat::Html => self.html.write(figure, path, size)?,
            format => self.images.export(figure, path, format, size, scale)?,
        }

        info!(path:? = path, format:%; "Figure saved");
        Ok(())
    }
}

/// Write `figure` to `path` with the default backends.
///
/// HTML pages reference plotly.js from its CDN; static images are rendered by
/// `python3` with the `kaleido` package. See [`FigurePersister::save`].
pub fn save_plotly_figure(
    figure: &Figure,
    path: impl AsRef<Path>,
    size: Option<FigureSize>,
    scale: Option<f64>,
) -> Result<(), Error> {
    FigurePersister::default().save(figure, path.as_ref(), size, scale)
}
