//! Execution of rewritten plotting code.
//!
//! Running a snippet is delegated to a [`ScriptRunner`]. The runner receives
//! code whose figure has already been bound to a variable and hands back
//! that figure as a plotly JSON document. [`PythonRunner`] does this with an
//! external Python interpreter.

use std::{
    fmt, fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, trace};
use thiserror::Error;

use plotly_directive_core::figure::{Figure, FigureError};

/// Errors raised while running a snippet.
///
/// Failures of the snippet itself are reported as [`ExecutionError::Failed`]
/// with the interpreter's error output unchanged.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to start `{executable}`: {source}")]
    Spawn {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to prepare script: {0}")]
    Io(#[from] io::Error),

    #[error("script failed ({status}):\n{stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("script did not produce a plotly figure: {0}")]
    InvalidFigure(#[from] FigureError),
}

/// How a script process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Code(i32),
    /// Terminated without an exit code, e.g. by a signal.
    Terminated,
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Code(code) => write!(f, "exit code {code}"),
            ExitStatus::Terminated => write!(f, "terminated"),
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        status.code().map_or(ExitStatus::Terminated, ExitStatus::Code)
    }
}

/// Executes plotting code and captures the figure bound to a variable.
pub trait ScriptRunner {
    /// Run `code` and return the figure bound to `variable`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the code cannot be run, fails, or
    /// does not bind a figure.
    fn run(&self, code: &str, variable: &str) -> Result<Figure, ExecutionError>;
}

/// Assemble the script executed for a snippet.
///
/// The script runs `pre_code`, then `code`, then writes the figure bound to
/// `variable` as JSON to the path given as its first argument.
pub fn build_script(pre_code: &str, code: &str, variable: &str) -> String {
    let mut script = String::new();
    for part in [pre_code, code] {
        if part.trim().is_empty() {
            continue;
        }
        script.push_str(part);
        if !part.ends_with('\n') {
            script.push('\n');
        }
    }
    script.push_str(&format!(
        "\nimport sys as __plotly_sys\n\
         import plotly.io as __plotly_io\n\
         __plotly_io.write_json({variable}, __plotly_sys.argv[1])\n"
    ));
    script
}

/// Runs snippets with an external Python interpreter.
///
/// Each run gets a fresh interpreter, so snippets never share state.
#[derive(Debug, Clone)]
pub struct PythonRunner {
    executable: String,
    working_directory: Option<PathBuf>,
    pre_code: String,
}

impl PythonRunner {
    /// Create a runner for the interpreter `executable`.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            working_directory: None,
            pre_code: String::new(),
        }
    }

    /// Run snippets in `directory` instead of the current directory.
    pub fn with_working_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(directory.into());
        self
    }

    /// Run `pre_code` before every snippet.
    pub fn with_pre_code(mut self, pre_code: impl Into<String>) -> Self {
        self.pre_code = pre_code.into();
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    fn command(&self, script: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command.arg(script).arg(output);
        if let Some(directory) = &self.working_directory {
            command.current_dir(directory);
        }
        command
    }
}

impl ScriptRunner for PythonRunner {
    fn run(&self, code: &str, variable: &str) -> Result<Figure, ExecutionError> {
        let script = build_script(&self.pre_code, code, variable);
        trace!(script:%; "Generated script");

        let mut script_file = tempfile::Builder::new()
            .prefix("plotly-directive-")
            .suffix(".py")
            .tempfile()?;
        script_file.write_all(script.as_bytes())?;
        script_file.flush()?;

        let output_file = tempfile::Builder::new()
            .prefix("plotly-directive-")
            .suffix(".json")
            .tempfile()?;

        debug!(executable = self.executable.as_str(); "Running plotting script");
        let output = self
            .command(script_file.path(), output_file.path())
            .output()
            .map_err(|source| ExecutionError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecutionError::Failed {
                status: output.status.into(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let json = fs::read_to_string(output_file.path())?;
        let figure = Figure::from_json(&json)?;
        debug!(traces = figure.data().as_array().map_or(0, Vec::len); "Captured figure");
        Ok(figure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_script_appends_capture() {
        let script = build_script("", "fig = make()", "fig");

        assert_eq!(
            script,
            "fig = make()\n\n\
             import sys as __plotly_sys\n\
             import plotly.io as __plotly_io\n\
             __plotly_io.write_json(fig, __plotly_sys.argv[1])\n"
        );
    }

    #[test]
    fn test_build_script_runs_pre_code_first() {
        let script = build_script("import numpy as np\n", "out = np.zeros(1)", "out");

        assert!(script.starts_with("import numpy as np\nout = np.zeros(1)\n"));
        assert!(script.ends_with("write_json(out, __plotly_sys.argv[1])\n"));
    }

    #[test]
    fn test_exit_status_display() {
        assert_eq!(ExitStatus::Code(1).to_string(), "exit code 1");
        assert_eq!(ExitStatus::Terminated.to_string(), "terminated");
    }

    #[test]
    fn test_missing_interpreter_is_spawn_error() {
        let runner = PythonRunner::new("plotly-directive-no-such-python");

        let err = runner.run("fig = 1", "fig").unwrap_err();

        match err {
            ExecutionError::Spawn { executable, .. } => {
                assert_eq!(executable, "plotly-directive-no-such-python");
            }
            other => panic!("expected spawn error, got {other}"),
        }
    }
}
