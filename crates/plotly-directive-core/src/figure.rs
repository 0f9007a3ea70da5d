//! Captured plotly figures.
//!
//! Plotting code runs outside of this crate; what comes back is the figure
//! serialized as a plotly JSON document. [`Figure`] is the handle the rest of
//! the pipeline passes around until the figure is persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading a figure document.
#[derive(Debug, Error)]
pub enum FigureError {
    #[error("figure is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("figure document must be a JSON object")]
    NotAnObject,

    #[error("figure document has no `data` array")]
    MissingData,
}

/// A plotly figure document: `{"data": [...], "layout": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Figure {
    document: Value,
}

impl Figure {
    /// Wrap a figure document, checking its basic shape.
    ///
    /// # Errors
    ///
    /// Returns [`FigureError::NotAnObject`] if `document` is not an object and
    /// [`FigureError::MissingData`] if it lacks a `data` array.
    pub fn new(document: Value) -> Result<Self, FigureError> {
        let object = document.as_object().ok_or(FigureError::NotAnObject)?;
        if !object.get("data").is_some_and(Value::is_array) {
            return Err(FigureError::MissingData);
        }
        Ok(Self { document })
    }

    /// Parse a figure from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, FigureError> {
        let document: Value = serde_json::from_str(json)?;
        Self::new(document)
    }

    /// Returns the traces of the figure.
    pub fn data(&self) -> &Value {
        &self.document["data"]
    }

    /// Returns the layout of the figure, `null` when absent.
    pub fn layout(&self) -> &Value {
        &self.document["layout"]
    }

    /// Returns the plot configuration of the figure, `null` when absent.
    pub fn config(&self) -> &Value {
        &self.document["config"]
    }

    /// Returns the whole figure document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Serialize the figure back to compact JSON.
    pub fn to_json(&self) -> String {
        self.document.to_string()
    }
}

impl<'de> Deserialize<'de> for Figure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let document = Value::deserialize(deserializer)?;
        Self::new(document).map_err(serde::de::Error::custom)
    }
}

/// Output size of a rendered figure, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl FigureSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for FigureSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}
