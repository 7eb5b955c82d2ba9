//! R-tree based hit index using the rstar crate.
//!
//! Node rectangles and link bounding boxes go into one tree. A point query
//! returns the candidate boxes, which are then refined:
//! - Nodes win over links (they are drawn on top)
//! - Links must pass within half their drawn width of the curve

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use serde::Serialize;

use crate::graph::{LinkId, NodeId};
use crate::layout::{BezierPath, SankeyLayout};

/// What a pointer position landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum HitTarget {
    Node(NodeId),
    Link(LinkId),
}

/// An axis-aligned box in the index with its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub target: HitTarget,
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl HitBox {
    pub fn new(target: HitTarget, min: [f64; 2], max: [f64; 2]) -> Self {
        Self { target, min, max }
    }
}

impl RTreeObject for HitBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PointDistance for HitBox {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = (self.min[0] - point[0]).max(point[0] - self.max[0]).max(0.0);
        let dy = (self.min[1] - point[1]).max(point[1] - self.max[1]).max(0.0);
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        point[0] >= self.min[0]
            && point[0] <= self.max[0]
            && point[1] >= self.min[1]
            && point[1] <= self.max[1]
    }
}

/// Link curve kept for refining box hits.
#[derive(Debug, Clone, Copy)]
struct LinkShape {
    path: BezierPath,
    half_thickness: f64,
}

/// Spatial index over a positioned diagram.
///
/// Uses an R*-tree so hover lookups stay O(log n) on large diagrams.
pub struct HitIndex {
    tree: RTree<HitBox>,
    links: Vec<LinkShape>,
}

impl HitIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            links: Vec::new(),
        }
    }

    /// Bulk-load every node and link of `layout`.
    pub fn from_layout(layout: &SankeyLayout) -> Self {
        let mut boxes = Vec::with_capacity(layout.nodes.len() + layout.links.len());
        for node in &layout.nodes {
            boxes.push(HitBox::new(
                HitTarget::Node(node.index),
                [node.x0, node.y0],
                [node.x1, node.y1],
            ));
        }

        let mut links = Vec::with_capacity(layout.links.len());
        for link in &layout.links {
            let half_thickness = link.stroke_width() / 2.0;
            let (min, max) = link.path.bounds();
            boxes.push(HitBox::new(
                HitTarget::Link(link.index),
                [min.x, min.y - half_thickness],
                [max.x, max.y + half_thickness],
            ));
            links.push(LinkShape {
                path: link.path,
                half_thickness,
            });
        }

        Self {
            tree: RTree::bulk_load(boxes),
            links,
        }
    }

    /// The topmost node or link under `(x, y)`.
    ///
    /// Nodes take priority; among overlapping links the one drawn last (the
    /// highest index) wins.
    pub fn hit(&self, x: f64, y: f64) -> Option<HitTarget> {
        let mut node: Option<NodeId> = None;
        let mut link: Option<LinkId> = None;

        for candidate in self.tree.locate_all_at_point(&[x, y]) {
            match candidate.target {
                HitTarget::Node(id) => {
                    node = Some(node.map_or(id, |current| current.min(id)));
                }
                HitTarget::Link(id) if self.on_link(id, x, y) => {
                    link = Some(link.map_or(id, |current| current.max(id)));
                }
                HitTarget::Link(_) => {}
            }
        }

        node.map(HitTarget::Node).or(link.map(HitTarget::Link))
    }

    /// All boxes intersecting a rectangle, unrefined.
    pub fn in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<HitTarget> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|hit| hit.target)
            .collect()
    }

    fn on_link(&self, id: LinkId, x: f64, y: f64) -> bool {
        self.links.get(id.index()).is_some_and(|shape| {
            shape
                .path
                .y_at_x(x)
                .is_some_and(|curve_y| (curve_y - y).abs() <= shape.half_thickness)
        })
    }

    /// Get the number of boxes in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for HitIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeSpec;
    use crate::layout::{PositionedLink, SankeyInput, compute_layout};

    fn layout() -> SankeyLayout {
        // C (y 0..67.5) sits above A (y 77.5..100), so both bands into B bend
        let input = SankeyInput::new(200.0, 100.0)
            .node(NodeSpec::named("A"))
            .node(NodeSpec::named("B"))
            .node(NodeSpec::named("C"))
            .link("A", "B", 10.0)
            .link("C", "B", 30.0);
        compute_layout(&input).unwrap()
    }

    #[test]
    fn test_hit_box_distance() {
        let hit = HitBox::new(HitTarget::Node(NodeId(0)), [0.0, 0.0], [10.0, 10.0]);
        assert_eq!(hit.distance_2(&[5.0, 5.0]), 0.0);
        assert_eq!(hit.distance_2(&[13.0, 14.0]), 25.0);
        assert!(hit.contains_point(&[10.0, 0.0]));
        assert!(!hit.contains_point(&[10.1, 0.0]));
    }

    #[test]
    fn test_empty() {
        let index = HitIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.hit(0.0, 0.0), None);
    }

    #[test]
    fn test_node_hit() {
        let layout = layout();
        let index = HitIndex::from_layout(&layout);
        assert_eq!(index.len(), 5);

        let a = &layout.nodes[0];
        let mid_y = (a.y0 + a.y1) / 2.0;
        assert_eq!(index.hit(10.0, mid_y), Some(HitTarget::Node(NodeId(0))));

        let b = &layout.nodes[1];
        assert_eq!(index.hit(190.0, b.y0 + 1.0), Some(HitTarget::Node(NodeId(1))));
    }

    #[test]
    fn test_link_hit_follows_curve() {
        let layout = layout();
        let index = HitIndex::from_layout(&layout);

        let link = &layout.links[0];
        let on_curve = link.path.y_at_x(40.0).unwrap();
        assert_eq!(index.hit(40.0, on_curve), Some(HitTarget::Link(LinkId(0))));

        // Past the band's edge but still inside its bounding box
        let off_curve = on_curve - link.thickness / 2.0 - 1.0;
        assert!(off_curve > link.path.bounds().0.y - link.thickness / 2.0);
        assert_eq!(index.hit(40.0, off_curve), None);
    }

    #[test]
    fn test_zero_value_link_is_hittable_at_drawn_width() {
        // A -> C carries nothing, so its band runs flat along y = 100
        let input = SankeyInput::new(200.0, 100.0)
            .node(NodeSpec::named("A"))
            .node(NodeSpec::named("B"))
            .node(NodeSpec::named("C"))
            .link("A", "B", 10.0)
            .link("A", "C", 0.0);
        let layout = compute_layout(&input).unwrap();
        let link = &layout.links[1];
        assert_eq!(link.thickness, 0.0);
        assert_eq!(link.stroke_width(), PositionedLink::MIN_STROKE_WIDTH);
        assert_eq!((link.sy, link.ty), (100.0, 100.0));

        let index = HitIndex::from_layout(&layout);
        assert_eq!(index.hit(100.0, 100.3), Some(HitTarget::Link(LinkId(1))));
        assert_eq!(index.hit(100.0, 101.0), None);
    }

    #[test]
    fn test_outside_everything() {
        let index = HitIndex::from_layout(&layout());
        assert_eq!(index.hit(-5.0, -5.0), None);
        assert_eq!(index.hit(500.0, 50.0), None);
    }

    #[test]
    fn test_in_rect() {
        let index = HitIndex::from_layout(&layout());
        let hits = index.in_rect(0.0, 0.0, 5.0, 100.0);
        assert!(hits.contains(&HitTarget::Node(NodeId(0))));
        assert!(hits.contains(&HitTarget::Node(NodeId(2))));
        assert!(!hits.contains(&HitTarget::Node(NodeId(1))));
    }

    #[test]
    fn test_hit_target_serializes_with_kind() {
        let json = serde_json::to_string(&HitTarget::Link(LinkId(3))).unwrap();
        assert_eq!(json, r#"{"kind":"link","index":3}"#);
    }
}
