//! Artifact formats a figure can be persisted to.

use std::{fmt, path::Path, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// The format was not one of the supported artifact formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported figure format `{extension}`")]
pub struct UnsupportedFormat {
    pub extension: String,
}

/// Output format of a persisted figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ExportFormat {
    /// Self-contained interactive HTML page.
    Html,
    Png,
    Pdf,
    Svg,
    Jpg,
}

impl ExportFormat {
    /// Every supported format, interactive first.
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Html,
        ExportFormat::Png,
        ExportFormat::Pdf,
        ExportFormat::Svg,
        ExportFormat::Jpg,
    ];

    /// Resolve the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`] when the path has no extension or an
    /// extension outside of the supported set. The extension is matched
    /// case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UnsupportedFormat> {
        let extension = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        extension.parse()
    }

    /// Returns the file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Svg => "svg",
            ExportFormat::Jpg => "jpg",
        }
    }

    /// Returns `true` for formats rendered to a static image.
    pub fn is_static(&self) -> bool {
        !matches!(self, ExportFormat::Html)
    }
}

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == normalized)
            .ok_or_else(|| UnsupportedFormat {
                extension: s.to_string(),
            })
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = UnsupportedFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
