//! # Plotly Directive Parser
//!
//! Text analysis for the `plotly` documentation directive:
//!
//! 1. **Scan** - find `plotly` directives in a reStructuredText document and
//!    validate their options ([`parse_document`])
//! 2. **Bind** - rewrite the snippet so its figure is assigned to a variable
//!    ([`assign_last_line_into_variable`])
//! 3. **Camera** - append a 3-D camera update ([`set_camera_position`])
//!
//! Nothing in this crate executes code.
//!
//! ## Usage
//!
//! ```
//! # use plotly_directive_parser::{assign_last_line_into_variable, set_camera_position, ParseError};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let code = "import plotly.express as px\nfig = px.scatter_3d(x=[0], y=[0], z=[0])\nfig.show()";
//!
//!     let code = assign_last_line_into_variable(code, "figure")?;
//!     let code = set_camera_position(&code, "figure", &[2.0, 2.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0])?;
//!
//!     assert!(code.contains("figure = fig\nfigure.update_layout(scene_camera="));
//!     Ok(())
//! }
//! ```

mod document;
mod elaborate;
pub mod error;
mod lines;
mod rewrite;
mod span;
mod tail;

pub use document::{
    CodeSource, DIRECTIVE_NAME, INCLUDE_DIRECTIVE_SOURCE, PlotlyBlock, RawOption, parse_document,
};
pub use elaborate::KNOWN_OPTIONS;
pub use error::{Diagnostic, ErrorCode, ParseError};
pub use lines::{ends_with_show, strip_last_line};
pub use rewrite::{assign_last_line_into_variable, inject_camera, set_camera_position};
pub use span::{Span, Spanned};
pub use tail::{Expression, Tail, Trailer, TrailerKind, parse_tail};
