//! Map export.
//!
//! - [`svg`] – standalone SVG rendering of a map.

pub mod svg;

pub use svg::{SvgConfig, render_svg};
