//! Sankey Layout - WASM Module
//!
//! This module computes layered Sankey flow diagrams: it assigns nodes to
//! columns by longest path, sizes them by throughput and routes every link as
//! a Bezier band. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Per-call flow graph using petgraph's StableGraph
//! - `layout`: Layering, vertical distribution and link geometry
//! - `render`: SVG output for a positioned diagram
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing
//! - `color`: Node color parsing and default color strategies
//! - `error`: The crate-wide error type

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod graph;
pub mod layout;
pub mod render;
pub mod spatial;

pub use color::{ColorScheme, PaletteColors, RandomColors, Rgb};
pub use error::{Result, SankeyError};
pub use graph::{LinkId, LinkSpec, LinkValue, NodeId, NodeRef, NodeSpec};
pub use layout::{LayoutConfig, SankeyInput, SankeyLayout, compute_layout, compute_layout_with};
pub use render::{SvgOptions, render_svg};
pub use spatial::{HitIndex, HitTarget};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    {
        // A second init (e.g. hot reload) already has a logger installed
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

impl From<SankeyError> for JsValue {
    fn from(err: SankeyError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

fn parse_input(input: JsValue) -> std::result::Result<SankeyInput, JsValue> {
    serde_wasm_bindgen::from_value(input).map_err(|err| SankeyError::from(err).into())
}

fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|err| SankeyError::from(err).into())
}

// =========================================================================
// One-shot functions
// =========================================================================

/// Compute a Sankey layout.
///
/// `input` has the shape `{nodes, links, width, height, nodeWidth?,
/// nodePadding?, curvature?, gradientPrefix?}`. Returns the positioned
/// diagram as a plain object, or throws an `Error` describing the first
/// problem found.
#[wasm_bindgen(js_name = computeSankeyLayout)]
pub fn compute_sankey_layout(input: JsValue) -> std::result::Result<JsValue, JsValue> {
    let layout = compute_layout(&parse_input(input)?)?;
    to_js(&layout)
}

/// Compute a layout and render it straight to an SVG string.
#[wasm_bindgen(js_name = renderSankeySvg)]
pub fn render_sankey_svg(input: JsValue) -> std::result::Result<String, JsValue> {
    let layout = compute_layout(&parse_input(input)?)?;
    Ok(render_svg(&layout, &SvgOptions::default()))
}

// =========================================================================
// Diagram handle
// =========================================================================

/// A computed diagram kept on the WASM side for rendering and hover lookups.
///
/// The layout is computed once in the constructor; the hit index is built
/// alongside it so `hitTest` does not rescan every node and link.
#[wasm_bindgen]
pub struct SankeyDiagram {
    layout: SankeyLayout,
    hits: HitIndex,
    svg_options: SvgOptions,
}

#[wasm_bindgen]
impl SankeyDiagram {
    /// Compute the layout for `input` (same shape as `computeSankeyLayout`).
    #[wasm_bindgen(constructor)]
    pub fn new(input: JsValue) -> std::result::Result<SankeyDiagram, JsValue> {
        Ok(Self::from_input(&parse_input(input)?)?)
    }

    /// The positioned diagram as a plain object.
    pub fn layout(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.layout)
    }

    /// Render the diagram as an SVG string.
    pub fn svg(&self) -> String {
        render_svg(&self.layout, &self.svg_options)
    }

    /// Set the opacity used for link bands in `svg()`.
    #[wasm_bindgen(js_name = setLinkOpacity)]
    pub fn set_link_opacity(&mut self, opacity: f64) {
        self.svg_options.link_opacity = opacity.clamp(0.0, 1.0);
    }

    /// Toggle node labels in `svg()`.
    #[wasm_bindgen(js_name = setShowLabels)]
    pub fn set_show_labels(&mut self, show: bool) {
        self.svg_options.show_labels = show;
    }

    /// Get the number of nodes.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.layout.nodes.len() as u32
    }

    /// Get the number of links.
    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.layout.links.len() as u32
    }

    /// Get the number of layers (columns).
    #[wasm_bindgen(js_name = layerCount)]
    pub fn layer_count(&self) -> u32 {
        self.layout.layer_count
    }

    /// What lies under `(x, y)`: `{kind: "node" | "link", index}` or
    /// `undefined`.
    #[wasm_bindgen(js_name = hitTest)]
    pub fn hit_test(&self, x: f64, y: f64) -> std::result::Result<JsValue, JsValue> {
        match self.hits.hit(x, y) {
            Some(target) => to_js(&target),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Tooltip text for a node, `"Name: value"`.
    #[wasm_bindgen(js_name = nodeTooltip)]
    pub fn node_tooltip(&self, index: u32) -> Option<String> {
        self.layout.node_tooltip(NodeId(index))
    }

    /// Tooltip text for a link, `"Source → Target: value"`.
    #[wasm_bindgen(js_name = linkTooltip)]
    pub fn link_tooltip(&self, index: u32) -> Option<String> {
        self.layout.link_tooltip(LinkId(index))
    }
}

impl SankeyDiagram {
    /// Build a diagram without going through `JsValue`.
    pub fn from_input(input: &SankeyInput) -> Result<Self> {
        let layout = compute_layout(input)?;
        let hits = HitIndex::from_layout(&layout);
        Ok(Self {
            layout,
            hits,
            svg_options: SvgOptions::default(),
        })
    }

    /// The positioned diagram.
    pub fn positioned(&self) -> &SankeyLayout {
        &self.layout
    }

    /// Rust-side hit test.
    pub fn target_at(&self, x: f64, y: f64) -> Option<HitTarget> {
        self.hits.hit(x, y)
    }
}
