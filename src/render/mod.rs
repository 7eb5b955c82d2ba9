//! Renderers that consume a [`SankeyLayout`](crate::layout::SankeyLayout).

pub mod svg;

pub use svg::{SvgOptions, render_svg};
