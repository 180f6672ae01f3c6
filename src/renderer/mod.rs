//! SVG output for scene graphs
//!
//! Nodes serialize themselves through an [`SvgWriter`], which owns the
//! output buffer, escaping and (optional) indentation.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{escape_xml, SvgWriter};
