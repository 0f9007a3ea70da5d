//! CLI logic for rendering plotly directives.
//!
//! This module reads one reStructuredText document, renders its `plotly`
//! directives and writes the resulting document.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use plotly_directive::{DirectiveProcessor, DocumentContext, PlotlyDirectiveError};

/// Run the plotly directive CLI application
///
/// Figures are written to `args.figures_dir`, which is created if missing.
/// Script arguments of directives are resolved relative to the directory of
/// the input file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PlotlyDirectiveError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed directives or plotting code
/// - Plotting code failing to run
/// - Figure export errors
pub fn run(args: &Args) -> Result<(), PlotlyDirectiveError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing document"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    let input = Path::new(&args.input);
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let source_dir = input.parent().unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(&args.figures_dir)?;

    let context = DocumentContext::new(stem, &args.figures_dir)
        .with_source_dir(source_dir)
        .with_figures_link(
            args.figures_link
                .as_deref()
                .unwrap_or(args.figures_dir.as_str()),
        );

    let processor = DirectiveProcessor::new(app_config)?;
    let rendered = processor.process_document(&source, &context)?;

    // Write output file
    fs::write(&args.output, rendered)?;

    info!(output_file = args.output; "Document written successfully");

    Ok(())
}
