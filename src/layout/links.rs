//! Link thickness, anchor stacking and curve geometry.
//!
//! Links are processed in input order. Each link's thickness comes from its
//! source node's scale, chosen so that all outgoing bands plus the padding
//! between them exactly fill the source bar. Bands stack downwards on both
//! endpoints; the running offsets live in an [`OffsetLedger`] rather than on
//! the nodes themselves.

use super::config::LayoutConfig;
use super::model::{BezierPath, GradientDef, Point, PositionedLink, Stroke};
use crate::graph::{FlowGraph, LinkId, NodeId};

/// Running stack offsets per node, one for each side.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetLedger {
    out_offsets: Vec<f64>,
    in_offsets: Vec<f64>,
    padding: f64,
}

impl OffsetLedger {
    /// Zeroed offsets for `node_count` nodes.
    pub fn new(node_count: usize, padding: f64) -> Self {
        Self {
            out_offsets: vec![0.0; node_count],
            in_offsets: vec![0.0; node_count],
            padding,
        }
    }

    /// Reserve a band of `thickness` on `node`'s right edge and return its
    /// offset from the node's top.
    pub fn take_out(&mut self, node: NodeId, thickness: f64) -> f64 {
        Self::take(&mut self.out_offsets[node.index()], thickness, self.padding)
    }

    /// Reserve a band of `thickness` on `node`'s left edge and return its
    /// offset from the node's top.
    pub fn take_in(&mut self, node: NodeId, thickness: f64) -> f64 {
        Self::take(&mut self.in_offsets[node.index()], thickness, self.padding)
    }

    fn take(offset: &mut f64, thickness: f64, padding: f64) -> f64 {
        let start = *offset;
        *offset += thickness + padding;
        start
    }

    pub fn out_offset(&self, node: NodeId) -> f64 {
        self.out_offsets[node.index()]
    }

    pub fn in_offset(&self, node: NodeId) -> f64 {
        self.in_offsets[node.index()]
    }
}

/// Pixels per unit of flow for links leaving `node`.
///
/// Zero when the node has no outgoing flow or when padding alone exceeds its
/// height.
pub fn link_width_scale(graph: &FlowGraph, node: NodeId, padding: f64) -> f64 {
    let flow = graph.node(node);
    let outgoing = graph.outgoing(node).len();
    if outgoing == 0 || flow.value_out <= 0.0 {
        return 0.0;
    }
    let usable = flow.height() - padding * (outgoing - 1) as f64;
    (usable / flow.value_out).max(0.0)
}

/// Resolve geometry for every link, returning the links and the gradients
/// they reference.
pub fn resolve_links(graph: &FlowGraph, config: &LayoutConfig) -> (Vec<PositionedLink>, Vec<GradientDef>) {
    let scales: Vec<f64> = graph
        .node_ids()
        .map(|id| link_width_scale(graph, id, config.node_padding))
        .collect();

    let mut ledger = OffsetLedger::new(graph.node_count(), config.node_padding);
    let mut links = Vec::with_capacity(graph.link_count());
    let mut gradients = Vec::new();

    for id in graph.link_ids() {
        let flow = graph.link(id);
        let source = graph.node(flow.source);
        let target = graph.node(flow.target);

        let thickness = flow.value * scales[flow.source.index()];
        let sy = source.y0 + ledger.take_out(flow.source, thickness) + thickness / 2.0;
        let ty = target.y0 + ledger.take_in(flow.target, thickness) + thickness / 2.0;

        let path = BezierPath::s_curve(
            Point::new(source.x1, sy),
            Point::new(target.x0, ty),
            config.curvature,
        );

        let stroke = if source.color == target.color {
            Stroke::Solid {
                color: source.color,
            }
        } else {
            let gradient = GradientDef {
                id: gradient_id(&config.gradient_prefix, id),
                link: id,
                x1: source.x1,
                x2: target.x0,
                from: source.color,
                to: target.color,
            };
            let stroke = Stroke::Gradient {
                id: gradient.id.clone(),
            };
            gradients.push(gradient);
            stroke
        };

        links.push(PositionedLink {
            index: id,
            source: flow.source,
            target: flow.target,
            value: flow.value,
            thickness,
            sy,
            ty,
            d: path.to_svg_path(),
            path,
            stroke,
        });
    }

    (links, gradients)
}

fn gradient_id(prefix: &str, link: LinkId) -> String {
    format!("{prefix}-{}", link.raw())
}
