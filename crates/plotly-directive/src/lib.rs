//! Plotly Directive - render plotly figures embedded in reStructuredText.
//!
//! A `plotly` directive holds plotting code. Rendering a document rewrites
//! each snippet so its figure is bound to a variable, runs it, writes the
//! figure in the requested formats and replaces the directive with markup
//! referencing the written files.

pub mod config;
pub mod execute;
pub mod export;

mod error;

pub use plotly_directive_core::{camera, code, figure, format, markup, options};
pub use plotly_directive_parser::{CodeSource, ParseError, PlotlyBlock, parse_document};

pub use error::PlotlyDirectiveError;
pub use export::save_plotly_figure;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use plotly_directive_core::{
    format::ExportFormat,
    markup::{DirectiveBlock, create_code_block, indent},
    options::PlotlyOptions,
};
use plotly_directive_parser::{assign_last_line_into_variable, inject_camera};

use config::AppConfig;
use execute::{PythonRunner, ScriptRunner};
use export::{
    FigurePersister,
    html::HtmlExporter,
    image::{ImageExporter, KaleidoExporter},
};

/// Where the figures of one document go.
///
/// Figure files are named `<stem>-<n>.<ext>`, where `n` counts the
/// directives of the document from 1.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    stem: String,
    source_dir: PathBuf,
    figures_dir: PathBuf,
    figures_link: String,
}

impl DocumentContext {
    /// Create a context writing figures of the document `stem` to
    /// `figures_dir`, linked by the same path.
    pub fn new(stem: impl Into<String>, figures_dir: impl Into<PathBuf>) -> Self {
        let figures_dir = figures_dir.into();
        Self {
            stem: stem.into(),
            source_dir: PathBuf::from("."),
            figures_link: figures_dir.to_string_lossy().into_owned(),
            figures_dir,
        }
    }

    /// Resolve script paths of directives relative to `source_dir`.
    pub fn with_source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = source_dir.into();
        self
    }

    /// Reference figure files as `<figures_link>/<file name>` in the markup.
    pub fn with_figures_link(mut self, figures_link: impl Into<String>) -> Self {
        self.figures_link = figures_link.into();
        self
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn figures_dir(&self) -> &Path {
        &self.figures_dir
    }

    fn file_name(&self, index: usize, format: ExportFormat) -> String {
        format!("{}-{index}.{}", self.stem, format.extension())
    }

    fn link(&self, file_name: &str) -> String {
        let prefix = self.figures_link.trim_end_matches('/');
        if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{prefix}/{file_name}")
        }
    }
}

/// Renders `plotly` directives.
///
/// # Examples
///
/// ```rust,no_run
/// use plotly_directive::{DirectiveProcessor, DocumentContext, config::AppConfig};
///
/// let processor = DirectiveProcessor::new(AppConfig::default())
///     .expect("valid configuration");
/// let context = DocumentContext::new("index", "_build/figures");
///
/// let source = ".. plotly::\n\n   import plotly.express as px\n   px.line(y=[1, 3, 2])\n";
/// let rendered = processor
///     .process_document(source, &context)
///     .expect("Failed to render");
/// ```
pub struct DirectiveProcessor {
    config: AppConfig,
    runner: Box<dyn ScriptRunner>,
    persister: FigurePersister,
}

impl DirectiveProcessor {
    /// Create a processor running snippets with the configured Python
    /// interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`PlotlyDirectiveError::Config`] for unusable settings and an
    /// export error if a configured plotly.js bundle cannot be read.
    pub fn new(config: AppConfig) -> Result<Self, PlotlyDirectiveError> {
        config.validate().map_err(PlotlyDirectiveError::Config)?;

        let python = config.python();
        let mut runner =
            PythonRunner::new(python.executable()).with_pre_code(config.render().pre_code());
        if let Some(directory) = python.working_directory() {
            runner = runner.with_working_directory(directory);
        }

        let persister = FigurePersister::new(
            HtmlExporter::from_config(config.html())?,
            KaleidoExporter::new(python.executable()),
        );

        Ok(Self {
            config,
            runner: Box::new(runner),
            persister,
        })
    }

    /// Replace the script runner.
    pub fn with_runner(mut self, runner: impl ScriptRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Replace the static image exporter.
    pub fn with_image_exporter(mut self, exporter: impl ImageExporter + 'static) -> Self {
        self.persister = self.persister.with_image_exporter(exporter);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Rewrite a snippet for execution: bind its figure to the configured
    /// variable and apply the camera option.
    ///
    /// # Errors
    ///
    /// Returns [`PlotlyDirectiveError::Parse`] with `code` as source if the
    /// last line of the snippet is not a bindable expression.
    pub fn prepare_code(
        &self,
        code: &str,
        options: &PlotlyOptions,
    ) -> Result<String, PlotlyDirectiveError> {
        let variable = self.config.render().variable();

        let bound = assign_last_line_into_variable(code, variable)
            .map_err(|err| PlotlyDirectiveError::new_parse_error(err, code))?;

        let prepared = match &options.camera {
            Some(camera) => {
                debug!(camera:%; "Injecting camera");
                inject_camera(&bound, variable, camera)
            }
            None => bound,
        };
        Ok(prepared)
    }

    /// Render one directive: run its code, write its figures and return the
    /// replacement markup, without indentation.
    ///
    /// `index` numbers the directive within its document, starting at 1.
    pub fn render_block(
        &self,
        block: &PlotlyBlock,
        index: usize,
        context: &DocumentContext,
    ) -> Result<String, PlotlyDirectiveError> {
        let options = block.options();
        let code = match block.source() {
            CodeSource::Inline(code) => code.text(),
            CodeSource::Script(path) => {
                let path = context.source_dir.join(path);
                debug!(path:? = path; "Reading plotting script");
                fs::read_to_string(&path)?
            }
        };

        let prepared = self.prepare_code(&code, options)?;
        let figure = self.runner.run(&prepared, self.config.render().variable())?;

        let formats = options
            .formats
            .as_deref()
            .unwrap_or(self.config.render().formats());

        let mut parts = Vec::new();
        if options
            .include_directive_source
            .unwrap_or(self.config.render().include_directive_source())
        {
            parts.push(create_code_block(&block.directive_source(), "rst"));
        }
        if options
            .include_source
            .unwrap_or(self.config.render().include_source())
        {
            parts.push(create_code_block(&code, "python"));
        }

        for &format in formats {
            let file_name = context.file_name(index, format);
            let path = context.figures_dir.join(&file_name);
            self.persister
                .save(&figure, &path, options.size, options.scale)?;
            parts.push(self.figure_markup(&context.link(&file_name), format, options));
        }

        info!(block = index, formats = formats.len(); "Directive rendered");
        Ok(parts
            .iter()
            .map(|part| part.trim_end())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    /// Markup referencing one written figure file.
    fn figure_markup(&self, link: &str, format: ExportFormat, options: &PlotlyOptions) -> String {
        if !format.is_static() {
            let html = self.config.html();
            let iframe = format!(
                r#"<iframe src="{link}" width="{}" height="{}" frameborder="0"></iframe>"#,
                html.iframe_width(),
                html.iframe_height()
            );
            return DirectiveBlock::new("raw")
                .with_argument("html")
                .with_content([iframe])
                .render();
        }

        let mut block = match &options.caption {
            Some(_) => DirectiveBlock::new("figure"),
            None => DirectiveBlock::new("image"),
        }
        .with_argument(link);
        if let Some(alt) = &options.alt {
            block = block.with_option("alt", alt);
        }
        if let Some(align) = options.align {
            block = block.with_option("align", align);
        }
        if !options.classes.is_empty() {
            block = block.with_option("class", options.classes.join(" "));
        }
        if let Some(caption) = &options.caption {
            block = block.with_content([caption]);
        }
        block.render()
    }

    /// Render every directive of `source` and splice the results in.
    ///
    /// Text outside of directives is kept byte for byte. Rendering stops at
    /// the first directive that fails.
    ///
    /// # Errors
    ///
    /// Returns [`PlotlyDirectiveError::Parse`] with the document as source if
    /// any directive is malformed, and the error of the failing directive
    /// otherwise.
    pub fn process_document(
        &self,
        source: &str,
        context: &DocumentContext,
    ) -> Result<String, PlotlyDirectiveError> {
        info!(document = context.stem(); "Processing document");
        let blocks =
            parse_document(source).map_err(|err| PlotlyDirectiveError::new_parse_error(err, source))?;

        if blocks.is_empty() {
            debug!("No plotly directives found");
            return Ok(source.to_string());
        }

        let mut output = String::with_capacity(source.len());
        let mut cursor = 0;
        for (index, block) in blocks.iter().enumerate() {
            let span = block.span();
            output.push_str(&source[cursor..span.start()]);

            let rendered = self.render_block(block, index + 1, context)?;
            trace!(block = index + 1, rendered:%; "Splicing rendered markup");
            output.push_str(&indent(&rendered, block.indent()));
            if source[..span.end()].ends_with('\n') {
                output.push('\n');
            }
            cursor = span.end();
        }
        output.push_str(&source[cursor..]);

        Ok(output)
    }
}
