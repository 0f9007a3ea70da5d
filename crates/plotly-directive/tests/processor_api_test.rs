//! Integration tests for the DirectiveProcessor API
//!
//! The Python interpreter is replaced by stubs, so these tests only exercise
//! the rewriting, persisting and splicing done on the Rust side.

use std::{cell::RefCell, fs, path::Path, rc::Rc};

use serde_json::json;
use tempfile::TempDir;

use plotly_directive::{
    DirectiveProcessor, DocumentContext, PlotlyDirectiveError,
    config::AppConfig,
    execute::{ExecutionError, ExitStatus, ScriptRunner},
    export::{self, image::ImageExporter},
    figure::{Figure, FigureSize},
    format::ExportFormat,
};
use plotly_directive_parser::ErrorCode;

type Scripts = Rc<RefCell<Vec<String>>>;

/// Records the code it is asked to run and returns a fixed figure.
struct StubRunner {
    scripts: Scripts,
}

impl ScriptRunner for StubRunner {
    fn run(&self, code: &str, variable: &str) -> Result<Figure, ExecutionError> {
        assert_eq!(variable, "__plotly_figure__");
        self.scripts.borrow_mut().push(code.to_string());
        Ok(Figure::new(json!({"data": [{"type": "scatter", "y": [1, 3, 2]}]}))?)
    }
}

/// Fails like a snippet raising an exception.
struct FailingRunner;

impl ScriptRunner for FailingRunner {
    fn run(&self, _code: &str, _variable: &str) -> Result<Figure, ExecutionError> {
        Err(ExecutionError::Failed {
            status: ExitStatus::Code(1),
            stderr: "NameError: name 'px' is not defined".to_string(),
        })
    }
}

/// Writes the format name instead of an image.
struct StubImageExporter;

impl ImageExporter for StubImageExporter {
    fn export(
        &self,
        _figure: &Figure,
        path: &Path,
        format: ExportFormat,
        _size: Option<FigureSize>,
        _scale: Option<f64>,
    ) -> Result<(), export::Error> {
        fs::write(path, format.extension())?;
        Ok(())
    }
}

struct Fixture {
    processor: DirectiveProcessor,
    scripts: Scripts,
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    fn with_config(config: AppConfig) -> Self {
        let scripts = Scripts::default();
        let processor = DirectiveProcessor::new(config)
            .expect("valid configuration")
            .with_runner(StubRunner {
                scripts: Rc::clone(&scripts),
            })
            .with_image_exporter(StubImageExporter);
        let dir = tempfile::tempdir().expect("temp dir");
        Self {
            processor,
            scripts,
            dir,
        }
    }

    fn context(&self) -> DocumentContext {
        DocumentContext::new("index", self.dir.path())
            .with_source_dir(self.dir.path())
            .with_figures_link("_static/figures")
    }

    fn process(&self, source: &str) -> Result<String, PlotlyDirectiveError> {
        self.processor.process_document(source, &self.context())
    }

    fn figure_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).is_file()
    }
}

#[test]
fn test_document_without_directives_is_unchanged() {
    let fixture = Fixture::new();
    let source = "Title\n=====\n\n.. note::\n\n   Nothing to plot.\n";

    let output = fixture.process(source).expect("should process");

    assert_eq!(output, source);
    assert!(fixture.scripts.borrow().is_empty());
}

#[test]
fn test_inline_directive_is_replaced() {
    let fixture = Fixture::new();
    let source = "Intro\n\n.. plotly::\n\n   fig = make()\n   fig.show()\n\nOutro\n";

    let output = fixture.process(source).expect("should process");

    assert_eq!(
        output,
        "Intro\n\n\
         .. raw:: html\n\n   \
         <iframe src=\"_static/figures/index-1.html\" width=\"100%\" height=\"500px\" frameborder=\"0\"></iframe>\n\n\
         Outro\n"
    );
    assert_eq!(
        fixture.scripts.borrow().as_slice(),
        ["fig = make()\n__plotly_figure__ = fig"]
    );
    assert!(fixture.figure_exists("index-1.html"));
}

#[test]
fn test_camera_is_injected() {
    let fixture = Fixture::new();
    let source = ".. plotly::\n   :camera: 1, 2, 3, 4, 5, 6, 7, 8, 9\n\n   surface()\n";

    fixture.process(source).expect("should process");

    let scripts = fixture.scripts.borrow();
    assert_eq!(
        scripts[0],
        "__plotly_figure__ = surface()\n\
         __plotly_figure__.update_layout(scene_camera={'eye': {'x': 1, 'y': 2, 'z': 3}, \
         'center': {'x': 4, 'y': 5, 'z': 6}, 'up': {'x': 7, 'y': 8, 'z': 9}})"
    );
}

#[test]
fn test_static_image_with_caption() {
    let fixture = Fixture::new();
    let source = "\
.. plotly::
   :format: png
   :alt: Three points
   :align: center
   :class: wide
   :caption: Rising then falling

   fig
";

    let output = fixture.process(source).expect("should process");

    assert_eq!(
        output,
        "\
.. figure:: _static/figures/index-1.png
   :alt: Three points
   :align: center
   :class: wide

   Rising then falling
"
    );
    assert!(fixture.figure_exists("index-1.png"));
    assert!(!fixture.figure_exists("index-1.html"));
}

#[test]
fn test_include_source_and_directive_source() {
    let fixture = Fixture::new();
    let source = "\
.. plotly::
   :include-source:
   :include-directive-source:
   :format: svg

   fig = make()
   fig
";

    let output = fixture.process(source).expect("should process");

    assert_eq!(
        output,
        "\
.. code-block:: rst

   .. plotly::
      :include-source:
      :format: svg

      fig = make()
      fig

.. code-block:: python

   fig = make()
   fig

.. image:: _static/figures/index-1.svg
"
    );
}

#[test]
fn test_nested_directive_keeps_indentation() {
    let fixture = Fixture::new();
    let source = ".. note::\n\n   .. plotly::\n      :format: jpg\n\n      fig\n\nAfter\n";

    let output = fixture.process(source).expect("should process");

    assert_eq!(
        output,
        ".. note::\n\n   .. image:: _static/figures/index-1.jpg\n\nAfter\n"
    );
}

#[test]
fn test_directives_are_numbered() {
    let fixture = Fixture::new();
    let source = ".. plotly::\n   :format: png\n\n   a\n\n.. plotly::\n   :format: png, pdf\n\n   b\n";

    fixture.process(source).expect("should process");

    assert!(fixture.figure_exists("index-1.png"));
    assert!(fixture.figure_exists("index-2.png"));
    assert!(fixture.figure_exists("index-2.pdf"));
    assert_eq!(fixture.scripts.borrow().len(), 2);
}

#[test]
fn test_script_argument_is_read_from_source_dir() {
    let fixture = Fixture::new();
    fs::write(
        fixture.dir.path().join("plot.py"),
        "import plotly.express as px\npx.line(y=[1, 2])\n",
    )
    .unwrap();

    fixture
        .process(".. plotly:: plot.py\n   :format: png\n")
        .expect("should process");

    assert_eq!(
        fixture.scripts.borrow()[0],
        "import plotly.express as px\n__plotly_figure__ = px.line(y=[1, 2])\n"
    );
}

#[test]
fn test_malformed_tail_reports_code_source() {
    let fixture = Fixture::new();
    let source = ".. plotly::\n\n   fig = make()\n";

    let err = fixture.process(source).unwrap_err();

    match err {
        PlotlyDirectiveError::Parse { err, src } => {
            assert!(err.has_code(ErrorCode::E100));
            assert_eq!(src, "fig = make()");
        }
        other => panic!("expected parse error, got {other}"),
    }
    assert!(fixture.scripts.borrow().is_empty());
    assert!(!fixture.figure_exists("index-1.html"));
}

#[test]
fn test_invalid_options_report_document_source() {
    let fixture = Fixture::new();
    let source = ".. plotly::\n   :colour: red\n\n   fig\n";

    let err = fixture.process(source).unwrap_err();

    match err {
        PlotlyDirectiveError::Parse { err, src } => {
            assert!(err.has_code(ErrorCode::E204));
            assert_eq!(src, source);
        }
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn test_execution_failure_writes_nothing() {
    let fixture = Fixture::new();
    let processor = DirectiveProcessor::new(AppConfig::default())
        .unwrap()
        .with_runner(FailingRunner);

    let err = processor
        .process_document(".. plotly::\n\n   px.line()\n", &fixture.context())
        .unwrap_err();

    assert!(matches!(
        err,
        PlotlyDirectiveError::Execution(ExecutionError::Failed { .. })
    ));
    assert!(err.to_string().contains("NameError"));
    assert!(!fixture.figure_exists("index-1.html"));
}

#[test]
fn test_config_defaults_apply() {
    let config: AppConfig =
        toml::from_str("[render]\nformats = [\"png\"]\ninclude_source = true\n").unwrap();
    let fixture = Fixture::with_config(config);

    let output = fixture.process(".. plotly::\n\n   fig\n").expect("should process");

    assert_eq!(
        output,
        ".. code-block:: python\n\n   fig\n\n.. image:: _static/figures/index-1.png\n"
    );
}
