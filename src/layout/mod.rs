//! Sankey layout engine.
//!
//! Turns node and link descriptors into a positioned diagram in four passes
//! over a freshly built [`FlowGraph`]:
//!
//! 1. **Build:** resolve link endpoints, coerce values, sum in/out flow.
//! 2. **Layer:** longest-path relaxation from zero-inflow nodes
//!    ([`layers`]).
//! 3. **Distribute:** column x-positions and proportional vertical packing
//!    ([`distribute`]).
//! 4. **Links:** thickness, stacked anchors, Bezier paths and strokes
//!    ([`links`]).
//!
//! Each call owns its graph, so concurrent layouts never share state.

pub mod config;
pub mod distribute;
pub mod layers;
pub mod links;
pub mod model;

use log::debug;
use serde::Deserialize;

pub use config::LayoutConfig;
pub use links::OffsetLedger;
pub use model::{
    BezierPath, GradientDef, Point, PositionedLink, PositionedNode, SankeyLayout, Stroke,
};

use crate::color::{ColorScheme, PaletteColors};
use crate::error::Result;
use crate::graph::{FlowGraph, LinkSpec, NodeRef, NodeSpec};

/// Everything needed for one layout: nodes, links and layout parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SankeyInput {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    #[serde(flatten)]
    pub layout: LayoutConfig,
}

impl SankeyInput {
    /// Empty diagram of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_config(LayoutConfig::new(width, height))
    }

    pub fn with_config(layout: LayoutConfig) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            layout,
        }
    }

    /// Append a node.
    pub fn node(mut self, node: NodeSpec) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append a link.
    pub fn link(mut self, source: impl Into<NodeRef>, target: impl Into<NodeRef>, value: f64) -> Self {
        self.links.push(LinkSpec::new(source, target, value));
        self
    }

    /// Parse the JSON input shape (`{nodes, links, width, height, ...}`).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Compute a layout, coloring unstyled nodes from the default palette.
pub fn compute_layout(input: &SankeyInput) -> Result<SankeyLayout> {
    compute_layout_with(input, &mut PaletteColors::default())
}

/// Compute a layout with a caller-supplied color strategy.
pub fn compute_layout_with(input: &SankeyInput, colors: &mut dyn ColorScheme) -> Result<SankeyLayout> {
    let config = &input.layout;
    config.validate()?;

    let mut graph = FlowGraph::build(&input.nodes, &input.links, colors)?;
    let layer_count = layers::assign_layers(&mut graph)?;
    distribute::position_nodes(&mut graph, layer_count, config);
    let (links, gradients) = links::resolve_links(&graph, config);

    let nodes = graph
        .node_ids()
        .map(|id| {
            let node = graph.node(id);
            PositionedNode {
                index: id,
                name: node.name.clone(),
                color: node.color,
                layer: node.layer.unwrap_or_default(),
                value_in: node.value_in,
                value_out: node.value_out,
                x0: node.x0,
                x1: node.x1,
                y0: node.y0,
                y1: node.y1,
                source_links: graph.outgoing(id).to_vec(),
                target_links: graph.incoming(id).to_vec(),
            }
        })
        .collect();

    debug!(
        "sankey layout: {} nodes in {layer_count} layers, {} links, {} gradients",
        graph.node_count(),
        links.len(),
        gradients.len()
    );

    Ok(SankeyLayout {
        width: config.width,
        height: config.height,
        layer_count,
        nodes,
        links,
        gradients,
    })
}
