//! Layer assignment by breadth-first longest-path relaxation.
//!
//! Every node with zero inflow is a source on layer 0. A FIFO queue then
//! relaxes outgoing links so that each target sits at least one layer right
//! of every source feeding it. On a DAG the longest path has at most
//! `node_count - 1` links, so a layer reaching `node_count` proves a cycle.

use std::collections::VecDeque;

use log::debug;

use crate::error::{Result, SankeyError};
use crate::graph::{FlowGraph, NodeId};

/// Assign `layer` on every node and return the number of layers.
///
/// An empty graph has zero layers.
pub fn assign_layers(graph: &mut FlowGraph) -> Result<u32> {
    let node_count = graph.node_count();
    if node_count == 0 {
        return Ok(0);
    }

    let mut layers: Vec<Option<u32>> = vec![None; node_count];
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for id in graph.node_ids() {
        if graph.node(id).is_source() {
            layers[id.index()] = Some(0);
            queue.push_back(id);
        }
    }
    if queue.is_empty() {
        return Err(SankeyError::NoSourceNodes);
    }

    let mut relaxations = 0usize;
    while let Some(id) = queue.pop_front() {
        let next = layers[id.index()].map_or(0, |layer| layer + 1);
        for &link in graph.outgoing(id) {
            let target = graph.link(link).target;
            let slot = &mut layers[target.index()];
            if slot.is_none_or(|layer| layer < next) {
                if next as usize >= node_count {
                    return Err(SankeyError::CyclicFlow {
                        node: target.index(),
                    });
                }
                *slot = Some(next);
                queue.push_back(target);
                relaxations += 1;
            }
        }
    }

    let mut layer_count = 0;
    for id in graph.node_ids() {
        let layer = layers[id.index()].ok_or(SankeyError::UnreachableNode { node: id.index() })?;
        graph.node_mut(id).layer = Some(layer);
        layer_count = layer_count.max(layer + 1);
    }

    debug!("assigned {layer_count} layers after {relaxations} relaxations");
    Ok(layer_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PaletteColors;
    use crate::graph::{LinkSpec, NodeSpec};

    fn graph(node_count: usize, links: &[(usize, usize, f64)]) -> FlowGraph {
        let nodes: Vec<_> = (0..node_count).map(|_| NodeSpec::default()).collect();
        let links: Vec<_> = links
            .iter()
            .map(|&(s, t, v)| LinkSpec::new(s, t, v))
            .collect();
        FlowGraph::build(&nodes, &links, &mut PaletteColors::default()).unwrap()
    }

    fn layer(graph: &FlowGraph, index: u32) -> u32 {
        graph.node(NodeId(index)).layer.unwrap()
    }

    #[test]
    fn test_simple_chain() {
        let mut g = graph(2, &[(0, 1, 10.0)]);
        assert_eq!(assign_layers(&mut g).unwrap(), 2);
        assert_eq!(layer(&g, 0), 0);
        assert_eq!(layer(&g, 1), 1);
    }

    #[test]
    fn test_longest_path_wins() {
        // 0 → 1 → 2 → 3 and a shortcut 0 → 3
        let mut g = graph(4, &[(0, 3, 1.0), (0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        assert_eq!(assign_layers(&mut g).unwrap(), 4);
        assert_eq!(layer(&g, 3), 3);
    }

    #[test]
    fn test_multiple_sources() {
        // 0 → 2, 1 → 3 → 2
        let mut g = graph(4, &[(0, 2, 5.0), (1, 3, 2.0), (3, 2, 2.0)]);
        assert_eq!(assign_layers(&mut g).unwrap(), 3);
        assert_eq!(layer(&g, 0), 0);
        assert_eq!(layer(&g, 1), 0);
        assert_eq!(layer(&g, 3), 1);
        assert_eq!(layer(&g, 2), 2);
    }

    #[test]
    fn test_every_link_moves_right() {
        let links = [
            (0, 2, 3.0),
            (1, 2, 1.0),
            (2, 3, 2.0),
            (2, 4, 2.0),
            (1, 4, 4.0),
            (4, 5, 6.0),
        ];
        let mut g = graph(6, &links);
        assign_layers(&mut g).unwrap();
        for &(s, t, _) in &links {
            assert!(layer(&g, t as u32) >= layer(&g, s as u32) + 1);
        }
    }

    #[test]
    fn test_isolated_node_is_a_source() {
        let mut g = graph(3, &[(0, 1, 1.0)]);
        assert_eq!(assign_layers(&mut g).unwrap(), 2);
        assert_eq!(layer(&g, 2), 0);
    }

    #[test]
    fn test_zero_value_inflow_still_layers_after_source() {
        // Node 1 has only a zero-valued incoming link, so it seeds too
        let mut g = graph(2, &[(0, 1, 0.0)]);
        assert_eq!(assign_layers(&mut g).unwrap(), 2);
        assert_eq!(layer(&g, 1), 1);
    }

    #[test]
    fn test_no_sources() {
        let mut g = graph(2, &[(0, 1, 1.0), (1, 0, 1.0)]);
        assert_eq!(assign_layers(&mut g), Err(SankeyError::NoSourceNodes));
    }

    #[test]
    fn test_cycle_reachable_from_source() {
        // 0 → 1 → 2 → 1
        let mut g = graph(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 1, 1.0)]);
        assert!(matches!(
            assign_layers(&mut g),
            Err(SankeyError::CyclicFlow { .. })
        ));
    }

    #[test]
    fn test_zero_valued_self_loop_terminates() {
        let mut g = graph(1, &[(0, 0, 0.0)]);
        assert!(matches!(
            assign_layers(&mut g),
            Err(SankeyError::CyclicFlow { node: 0 })
        ));
    }

    #[test]
    fn test_unreachable_cycle() {
        // 0 → 1 is fine; 2 ⇄ 3 has inflow but no source
        let mut g = graph(4, &[(0, 1, 1.0), (2, 3, 1.0), (3, 2, 1.0)]);
        assert_eq!(
            assign_layers(&mut g),
            Err(SankeyError::UnreachableNode { node: 2 })
        );
    }

    #[test]
    fn test_empty_graph() {
        let mut g = graph(0, &[]);
        assert_eq!(assign_layers(&mut g), Ok(0));
    }
}
