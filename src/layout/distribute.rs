//! Horizontal columns and vertical packing of nodes.
//!
//! Layers map to evenly spaced columns across the drawing width. Within a
//! layer, nodes are stably sorted by outflow (largest first) and stacked from
//! the top with `node_padding` between them, each taking a share of the
//! remaining height proportional to `max(value_in, value_out)`.

use log::{debug, warn};

use super::config::LayoutConfig;
use crate::graph::{FlowGraph, NodeId};

/// Left edge of a layer's column.
pub fn column_x(layer: u32, layer_count: u32, config: &LayoutConfig) -> f64 {
    if layer_count <= 1 {
        return 0.0;
    }
    let step = (config.width - config.node_width) / f64::from(layer_count - 1);
    f64::from(layer) * step
}

/// Group node ids by layer, each group in input order.
pub fn group_by_layer(graph: &FlowGraph, layer_count: u32) -> Vec<Vec<NodeId>> {
    let mut layers = vec![Vec::new(); layer_count as usize];
    for id in graph.node_ids() {
        if let Some(layer) = graph.node(id).layer {
            layers[layer as usize].push(id);
        }
    }
    layers
}

/// Set `x0/x1/y0/y1` on every layered node.
pub fn position_nodes(graph: &mut FlowGraph, layer_count: u32, config: &LayoutConfig) {
    for (layer, mut ids) in group_by_layer(graph, layer_count).into_iter().enumerate() {
        if ids.is_empty() {
            continue;
        }
        let layer = layer as u32;

        // sort_by is stable, so ties keep input order
        ids.sort_by(|&a, &b| graph.node(b).value_out.total_cmp(&graph.node(a).value_out));

        let x0 = column_x(layer, layer_count, config);
        let heights = layer_heights(graph, &ids, config);

        let mut y = 0.0;
        for (&id, height) in ids.iter().zip(heights) {
            let node = graph.node_mut(id);
            node.x0 = x0;
            node.x1 = x0 + config.node_width;
            node.y0 = y;
            node.y1 = y + height;
            y = node.y1 + config.node_padding;
        }
    }
}

/// Bar heights for one layer's nodes, in the order given.
fn layer_heights(graph: &FlowGraph, ids: &[NodeId], config: &LayoutConfig) -> Vec<f64> {
    let gaps = config.node_padding * (ids.len() - 1) as f64;
    let mut available = config.height - gaps;
    if available < 0.0 {
        warn!(
            "padding for {} nodes ({gaps}) exceeds height {}; bars collapse to zero height",
            ids.len(),
            config.height
        );
        available = 0.0;
    }

    let total: f64 = ids.iter().map(|&id| graph.node(id).value()).sum();
    if total > 0.0 {
        ids.iter()
            .map(|&id| graph.node(id).value() / total * available)
            .collect()
    } else {
        debug!("layer of {} nodes carries no flow; splitting height equally", ids.len());
        vec![available / ids.len() as f64; ids.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PaletteColors;
    use crate::graph::{LinkSpec, NodeSpec};
    use crate::layout::layers::assign_layers;

    fn laid_out(node_count: usize, links: &[(usize, usize, f64)], config: &LayoutConfig) -> FlowGraph {
        let nodes: Vec<_> = (0..node_count).map(|_| NodeSpec::default()).collect();
        let links: Vec<_> = links.iter().map(|&(s, t, v)| LinkSpec::new(s, t, v)).collect();
        let mut graph = FlowGraph::build(&nodes, &links, &mut PaletteColors::default()).unwrap();
        let layer_count = assign_layers(&mut graph).unwrap();
        position_nodes(&mut graph, layer_count, config);
        graph
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_column_x() {
        let config = LayoutConfig::new(420.0, 100.0);
        assert_eq!(column_x(0, 1, &config), 0.0);
        assert_eq!(column_x(0, 3, &config), 0.0);
        assert_eq!(column_x(1, 3, &config), 200.0);
        assert_eq!(column_x(2, 3, &config), 400.0);
    }

    #[test]
    fn test_proportional_heights_fill_layer() {
        // Sources 0 (30), 1 (10) into 2
        let config = LayoutConfig::new(200.0, 110.0);
        let g = laid_out(3, &[(0, 2, 30.0), (1, 2, 10.0)], &config);

        let a = g.node(NodeId(0));
        let b = g.node(NodeId(1));
        assert!(close(a.y0, 0.0));
        assert!(close(a.height(), 75.0));
        assert!(close(b.y0, 85.0));
        assert!(close(b.height(), 25.0));
        assert!(close(b.y1, 110.0));

        // Single-node layer takes the full height
        let c = g.node(NodeId(2));
        assert!(close(c.height(), 110.0));
        assert_eq!((c.x0, c.x1), (180.0, 200.0));
    }

    #[test]
    fn test_sorted_by_outflow_descending() {
        let config = LayoutConfig::new(200.0, 100.0);
        let g = laid_out(3, &[(0, 2, 1.0), (1, 2, 5.0)], &config);
        assert!(g.node(NodeId(1)).y0 < g.node(NodeId(0)).y0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let config = LayoutConfig::new(200.0, 100.0);
        let g = laid_out(4, &[(0, 3, 2.0), (1, 3, 2.0), (2, 3, 2.0)], &config);
        assert!(g.node(NodeId(0)).y0 < g.node(NodeId(1)).y0);
        assert!(g.node(NodeId(1)).y0 < g.node(NodeId(2)).y0);
    }

    #[test]
    fn test_heights_use_max_of_in_and_out() {
        // Nodes 1 and 2 each receive 10; node 1 only forwards 4
        let config = LayoutConfig::new(300.0, 100.0).with_node_padding(0.0);
        let g = laid_out(4, &[(0, 1, 10.0), (0, 2, 10.0), (1, 3, 4.0), (2, 3, 10.0)], &config);
        let n1 = g.node(NodeId(1));
        let n2 = g.node(NodeId(2));
        assert_eq!(n1.layer, Some(1));
        assert_eq!(n2.layer, Some(1));
        assert!(close(n1.height(), 50.0));
        assert!(close(n2.height(), 50.0));
        // Larger outflow goes on top
        assert!(close(n2.y0, 0.0));
        assert!(close(n1.y0, 50.0));
    }

    #[test]
    fn test_zero_flow_layer_splits_equally() {
        let config = LayoutConfig::new(100.0, 100.0);
        let g = laid_out(2, &[], &config);
        let a = g.node(NodeId(0));
        let b = g.node(NodeId(1));
        assert!(close(a.height(), 45.0));
        assert!(close(b.height(), 45.0));
        assert!(close(b.y0, 55.0));
        assert!(a.y0.is_finite() && b.y1.is_finite());
    }

    #[test]
    fn test_padding_overflow_collapses_bars() {
        let config = LayoutConfig::new(100.0, 10.0).with_node_padding(20.0);
        let g = laid_out(3, &[(0, 2, 1.0), (1, 2, 1.0)], &config);
        assert_eq!(g.node(NodeId(0)).height(), 0.0);
        assert_eq!(g.node(NodeId(1)).height(), 0.0);
        assert!(g.node(NodeId(1)).y0 > g.node(NodeId(0)).y1);
    }
}
