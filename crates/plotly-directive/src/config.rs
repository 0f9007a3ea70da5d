//! Configuration types for rendering plotly directives.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! configuration file only needs the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`RenderConfig`] - Default output formats and source listings.
//! - [`PythonConfig`] - Interpreter used to run plotting code.
//! - [`HtmlConfig`] - Interactive HTML output and its embedding.
//!
//! # Example
//!
//! ```
//! # use plotly_directive::config::AppConfig;
//! # use plotly_directive_core::format::ExportFormat;
//! let config = AppConfig::default();
//! assert_eq!(config.render().formats(), [ExportFormat::Html]);
//! assert_eq!(config.python().executable(), "python3");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use plotly_directive_core::format::ExportFormat;

/// plotly.js bundle referenced by HTML output unless configured otherwise.
pub const DEFAULT_PLOTLYJS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Variable the figure of a snippet is bound to.
pub const DEFAULT_VARIABLE: &str = "__plotly_figure__";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Python configuration section.
    #[serde(default)]
    python: PythonConfig,

    /// HTML configuration section.
    #[serde(default)]
    html: HtmlConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(render: RenderConfig, python: PythonConfig, html: HtmlConfig) -> Self {
        Self {
            render,
            python,
            html,
        }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the Python configuration.
    pub fn python(&self) -> &PythonConfig {
        &self.python
    }

    /// Returns the HTML configuration.
    pub fn html(&self) -> &HtmlConfig {
        &self.html
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.render.formats.is_empty() {
            return Err("`render.formats` must name at least one format".to_string());
        }
        if self.python.executable.trim().is_empty() {
            return Err("`python.executable` must not be empty".to_string());
        }
        if self.render.variable.trim().is_empty() {
            return Err("`render.variable` must not be empty".to_string());
        }
        Ok(())
    }
}

/// Defaults applied to directives that do not set the matching option.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Formats every figure is rendered to.
    formats: Vec<ExportFormat>,

    /// Show the plotting code above each figure.
    include_source: bool,

    /// Show the directive itself above each figure.
    include_directive_source: bool,

    /// Code run before every snippet, e.g. shared imports.
    pre_code: String,

    /// Variable the figure is bound to while the snippet runs.
    variable: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            formats: vec![ExportFormat::Html],
            include_source: false,
            include_directive_source: false,
            pre_code: String::new(),
            variable: DEFAULT_VARIABLE.to_string(),
        }
    }
}

impl RenderConfig {
    /// Creates a new [`RenderConfig`] rendering to `formats`, with the other
    /// settings at their defaults.
    pub fn new(formats: Vec<ExportFormat>) -> Self {
        Self {
            formats,
            ..Self::default()
        }
    }

    /// Sets whether the plotting code is shown.
    pub fn with_include_source(mut self, include_source: bool) -> Self {
        self.include_source = include_source;
        self
    }

    /// Sets whether the directive source is shown.
    pub fn with_include_directive_source(mut self, include_directive_source: bool) -> Self {
        self.include_directive_source = include_directive_source;
        self
    }

    /// Sets the code run before every snippet.
    pub fn with_pre_code(mut self, pre_code: impl Into<String>) -> Self {
        self.pre_code = pre_code.into();
        self
    }

    pub fn formats(&self) -> &[ExportFormat] {
        &self.formats
    }

    pub fn include_source(&self) -> bool {
        self.include_source
    }

    pub fn include_directive_source(&self) -> bool {
        self.include_directive_source
    }

    pub fn pre_code(&self) -> &str {
        &self.pre_code
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

/// Python interpreter settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// Interpreter executable, looked up on `PATH` unless it is a path.
    executable: String,

    /// Directory snippets run in. Defaults to the current directory.
    working_directory: Option<PathBuf>,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            executable: "python3".to_string(),
            working_directory: None,
        }
    }
}

impl PythonConfig {
    /// Creates a new [`PythonConfig`].
    pub fn new(executable: impl Into<String>, working_directory: Option<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_directory,
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }
}

/// Settings of interactive HTML output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// URL of the plotly.js bundle referenced by HTML pages.
    plotlyjs: String,

    /// Local plotly.js bundle to inline instead of referencing
    /// [`plotlyjs`](Self::plotlyjs).
    inline_plotlyjs: Option<PathBuf>,

    /// Width of the `<iframe>` embedding an HTML figure.
    iframe_width: String,

    /// Height of the `<iframe>` embedding an HTML figure.
    iframe_height: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            plotlyjs: DEFAULT_PLOTLYJS_URL.to_string(),
            inline_plotlyjs: None,
            iframe_width: "100%".to_string(),
            iframe_height: "500px".to_string(),
        }
    }
}

impl HtmlConfig {
    pub fn plotlyjs(&self) -> &str {
        &self.plotlyjs
    }

    pub fn inline_plotlyjs(&self) -> Option<&Path> {
        self.inline_plotlyjs.as_deref()
    }

    pub fn iframe_width(&self) -> &str {
        &self.iframe_width
    }

    pub fn iframe_height(&self) -> &str {
        &self.iframe_height
    }
}
