//! Interactive HTML output.
//!
//! A figure is written as a standalone page that draws it with
//! `Plotly.newPlot`. plotly.js is either referenced by URL or inlined.

use std::{
    fs,
    hash::{DefaultHasher, Hash, Hasher},
    path::Path,
};

use log::debug;

use plotly_directive_core::figure::{Figure, FigureSize};

use super::Error;
use crate::config::{DEFAULT_PLOTLYJS_URL, HtmlConfig};

/// Where a page loads plotly.js from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotlyJs {
    /// `<script src="...">` pointing at this URL.
    Url(String),
    /// The bundle source, embedded in every page.
    Inline(String),
}

impl PlotlyJs {
    fn script_tag(&self) -> String {
        match self {
            PlotlyJs::Url(url) => format!(r#"<script src="{url}" charset="utf-8"></script>"#),
            PlotlyJs::Inline(source) => format!(
                "<script type=\"text/javascript\">{}</script>",
                escape_script(source)
            ),
        }
    }
}

/// Writes figures as standalone HTML pages.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    plotlyjs: PlotlyJs,
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self::new(PlotlyJs::Url(DEFAULT_PLOTLYJS_URL.to_string()))
    }
}

impl HtmlExporter {
    pub fn new(plotlyjs: PlotlyJs) -> Self {
        Self { plotlyjs }
    }

    /// Create an exporter from the `[html]` configuration section, reading
    /// the inlined bundle if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the inline bundle cannot be read.
    pub fn from_config(config: &HtmlConfig) -> Result<Self, Error> {
        let plotlyjs = match config.inline_plotlyjs() {
            Some(path) => {
                debug!(path:? = path; "Inlining plotly.js");
                PlotlyJs::Inline(fs::read_to_string(path)?)
            }
            None => PlotlyJs::Url(config.plotlyjs().to_string()),
        };
        Ok(Self::new(plotlyjs))
    }

    /// Render the page of `figure`.
    ///
    /// `div_id` names the element the plot is drawn in. Without `size` the
    /// plot fills the page.
    pub fn render(&self, figure: &Figure, div_id: &str, size: Option<FigureSize>) -> String {
        let (width, height) = match size {
            Some(size) => (format!("{}px", size.width), format!("{}px", size.height)),
            None => ("100%".to_string(), "100vh".to_string()),
        };
        let config = if figure.config().is_null() {
            "{\"responsive\": true}".to_string()
        } else {
            escape_script(&figure.config().to_string())
        };
        let layout = if figure.layout().is_null() {
            "{}".to_string()
        } else {
            escape_script(&figure.layout().to_string())
        };

        format!(
            "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\" />
{script}
</head>
<body style=\"margin: 0;\">
<div id=\"{div_id}\" class=\"plotly-graph-div\" style=\"width: {width}; height: {height};\"></div>
<script type=\"text/javascript\">
Plotly.newPlot(\"{div_id}\", {data}, {layout}, {config});
</script>
</body>
</html>
",
            script = self.plotlyjs.script_tag(),
            data = escape_script(&figure.data().to_string()),
        )
    }

    /// Write the page of `figure` to `path`.
    pub fn write(
        &self,
        figure: &Figure,
        path: &Path,
        size: Option<FigureSize>,
    ) -> Result<(), Error> {
        let page = self.render(figure, &div_id(path), size);
        fs::write(path, page)?;
        Ok(())
    }
}

/// Stable element id derived from the output path.
fn div_id(path: &Path) -> String {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    format!("plotly-{:016x}", hasher.finish())
}

/// Keep embedded text from closing the surrounding `<script>` element.
fn escape_script(text: &str) -> String {
    text.replace("</", "<\\/")
}
