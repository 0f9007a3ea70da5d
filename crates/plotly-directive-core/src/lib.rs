//! Plotly Directive Core Types and Definitions
//!
//! This crate provides the foundational types shared by the plotly
//! documentation directive. It includes:
//!
//! - **Code**: Snippets of plotting code ([`code::CodeBlock`])
//! - **Camera**: Validated 3-D camera parameters ([`camera::CameraSpec`])
//! - **Figures**: Captured plotly figure documents ([`figure::Figure`])
//! - **Formats**: Supported artifact formats ([`format::ExportFormat`])
//! - **Options**: Typed directive options ([`options::PlotlyOptions`])
//! - **Markup**: reStructuredText block rendering ([`markup`] module)

pub mod camera;
pub mod code;
pub mod figure;
pub mod format;
pub mod markup;
pub mod options;
