//! Positioned output handed to renderers.
//!
//! Everything here is plain data: a renderer reads node rectangles, link
//! curves and stroke descriptors, and registers the gradient definitions
//! before drawing the links that reference them.

use serde::Serialize;

use crate::color::Rgb;
use crate::error::Result;
use crate::graph::{LinkId, NodeId};

/// Format a coordinate with at most three decimals and no trailing zeros.
pub(crate) fn format_coord(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// A point in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cubic Bezier from a source node's right edge to a target node's left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BezierPath {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl BezierPath {
    /// Horizontal S-curve: the control points sit at `curvature` and
    /// `1 - curvature` of the x-span, level with their endpoints.
    pub fn s_curve(start: Point, end: Point, curvature: f64) -> Self {
        let lerp = |t: f64| start.x + (end.x - start.x) * t;
        Self {
            start,
            control1: Point::new(lerp(curvature), start.y),
            control2: Point::new(lerp(1.0 - curvature), end.y),
            end,
        }
    }

    /// Evaluate the curve at `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }

    /// The curve's y at horizontal position `x`, or `None` outside its span.
    ///
    /// x(t) is monotone for S-curves, so a bisection on t is enough.
    pub fn y_at_x(&self, x: f64) -> Option<f64> {
        let (lo, hi) = if self.start.x <= self.end.x {
            (self.start.x, self.end.x)
        } else {
            (self.end.x, self.start.x)
        };
        if x < lo || x > hi {
            return None;
        }
        if hi - lo < f64::EPSILON {
            return Some(self.start.y);
        }

        let increasing = self.start.x <= self.end.x;
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for _ in 0..48 {
            let mid = (t0 + t1) / 2.0;
            if (self.point_at(mid).x < x) == increasing {
                t0 = mid;
            } else {
                t1 = mid;
            }
        }
        Some(self.point_at((t0 + t1) / 2.0).y)
    }

    /// Axis-aligned bounds of the control polygon, which contain the curve.
    pub fn bounds(&self) -> (Point, Point) {
        let points = [self.start, self.control1, self.control2, self.end];
        let min = points
            .iter()
            .fold(Point::new(f64::INFINITY, f64::INFINITY), |acc, p| {
                Point::new(acc.x.min(p.x), acc.y.min(p.y))
            });
        let max = points
            .iter()
            .fold(Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY), |acc, p| {
                Point::new(acc.x.max(p.x), acc.y.max(p.y))
            });
        (min, max)
    }

    /// SVG path data (`M … C …`).
    pub fn to_svg_path(&self) -> String {
        format!(
            "M{},{}C{},{} {},{} {},{}",
            format_coord(self.start.x),
            format_coord(self.start.y),
            format_coord(self.control1.x),
            format_coord(self.control1.y),
            format_coord(self.control2.x),
            format_coord(self.control2.y),
            format_coord(self.end.x),
            format_coord(self.end.y),
        )
    }
}

/// How a link is stroked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Stroke {
    /// Source and target share a color.
    Solid { color: Rgb },
    /// References a [`GradientDef`] by id.
    Gradient { id: String },
}

impl Stroke {
    /// SVG paint value: a color or a `url(#id)` reference.
    pub fn paint(&self) -> String {
        match self {
            Self::Solid { color } => color.to_hex(),
            Self::Gradient { id } => format!("url(#{id})"),
        }
    }
}

/// Two-stop horizontal gradient spanning a link's x-extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientDef {
    pub id: String,
    pub link: LinkId,
    pub x1: f64,
    pub x2: f64,
    pub from: Rgb,
    pub to: Rgb,
}

/// A node with its final rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub index: NodeId,
    pub name: String,
    pub color: Rgb,
    pub layer: u32,
    pub value_in: f64,
    pub value_out: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    /// Outgoing links, in input order.
    pub source_links: Vec<LinkId>,
    /// Incoming links, in input order.
    pub target_links: Vec<LinkId>,
}

impl PositionedNode {
    #[inline]
    pub fn value(&self) -> f64 {
        self.value_in.max(self.value_out)
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Whether `(x, y)` falls inside the node's rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// A link with its thickness, anchors, curve and stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedLink {
    pub index: LinkId,
    #[serde(rename = "sourceIndex")]
    pub source: NodeId,
    #[serde(rename = "targetIndex")]
    pub target: NodeId,
    pub value: f64,
    pub thickness: f64,
    /// Anchor y on the source's right edge (centre of the band).
    pub sy: f64,
    /// Anchor y on the target's left edge.
    pub ty: f64,
    pub path: BezierPath,
    /// SVG path data for `path`.
    pub d: String,
    pub stroke: Stroke,
}

impl PositionedLink {
    /// Narrowest band drawn, so zero-value links stay visible.
    pub const MIN_STROKE_WIDTH: f64 = 1.0;

    /// Width the band is drawn and hit-tested at.
    #[inline]
    pub fn stroke_width(&self) -> f64 {
        self.thickness.max(Self::MIN_STROKE_WIDTH)
    }
}

/// The complete positioned diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SankeyLayout {
    pub width: f64,
    pub height: f64,
    pub layer_count: u32,
    pub nodes: Vec<PositionedNode>,
    pub links: Vec<PositionedLink>,
    /// Gradients referenced by links, in link order.
    pub gradients: Vec<GradientDef>,
}

impl SankeyLayout {
    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes.get(id.index())
    }

    pub fn link(&self, id: LinkId) -> Option<&PositionedLink> {
        self.links.get(id.index())
    }

    /// Nodes of one layer, top to bottom.
    pub fn nodes_in_layer(&self, layer: u32) -> Vec<&PositionedNode> {
        let mut nodes: Vec<_> = self.nodes.iter().filter(|n| n.layer == layer).collect();
        nodes.sort_by(|a, b| a.y0.total_cmp(&b.y0));
        nodes
    }

    /// Tooltip text for a node: `"Name: value"`.
    pub fn node_tooltip(&self, id: NodeId) -> Option<String> {
        self.node(id).map(|node| format!("{}: {}", node.name, node.value()))
    }

    /// Tooltip text for a link: `"Source → Target: value"`.
    pub fn link_tooltip(&self, id: LinkId) -> Option<String> {
        let link = self.link(id)?;
        let source = self.node(link.source)?;
        let target = self.node(link.target)?;
        Some(format!("{} → {}: {}", source.name, target.name, link.value))
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
