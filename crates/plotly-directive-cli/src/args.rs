//! Command-line argument definitions for the plotly directive CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, where figures are
//! written and linked from, configuration file selection, and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for rendering plotly directives
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input reStructuredText file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the rendered reStructuredText file
    #[arg(short, long, default_value = "out.rst")]
    pub output: String,

    /// Directory figure files are written to
    #[arg(long, default_value = "figures")]
    pub figures_dir: String,

    /// Path prefix figures are referenced by in the output
    /// (defaults to the figures directory)
    #[arg(long)]
    pub figures_link: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
