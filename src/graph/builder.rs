//! FlowGraph - the per-layout graph arena.
//!
//! The FlowGraph stores the diagram topology using petgraph's StableGraph and
//! keeps per-node outgoing/incoming link lists in input order, since link
//! order decides how flows stack against each node.

use std::collections::HashMap;

use log::{debug, warn};
use petgraph::Directed;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};

use super::link::{FlowLink, LinkId, LinkSpec, NodeRef};
use super::node::{FlowNode, NodeId, NodeSpec};
use crate::color::{ColorScheme, Rgb};
use crate::error::{Result, SankeyError};

/// The graph built for a single layout computation.
///
/// This struct manages:
/// - Node and link records via petgraph (arena indexed by NodeId/LinkId)
/// - Outgoing/incoming link lists per node, in input order
///
/// It is rebuilt from scratch on every layout call.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    /// Nodes store their flow record, edges their resolved link.
    graph: StableGraph<FlowNode, FlowLink, Directed>,

    /// Outgoing links per node, in input order
    outgoing: Vec<Vec<LinkId>>,

    /// Incoming links per node, in input order
    incoming: Vec<Vec<LinkId>>,
}

impl FlowGraph {
    /// Resolve node and link descriptors into a graph.
    ///
    /// Nodes without a color take one from `colors`. Duplicate names resolve
    /// to their first occurrence.
    pub fn build(
        nodes: &[NodeSpec],
        links: &[LinkSpec],
        colors: &mut dyn ColorScheme,
    ) -> Result<Self> {
        let mut flow = Self {
            graph: StableGraph::with_capacity(nodes.len(), links.len()),
            outgoing: vec![Vec::new(); nodes.len()],
            incoming: vec![Vec::new(); nodes.len()],
        };

        // Default names are linkable too
        let mut names: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
        for (index, spec) in nodes.iter().enumerate() {
            let color = match &spec.color {
                Some(text) => Rgb::parse_hex(text).ok_or_else(|| SankeyError::InvalidColor {
                    node: index,
                    color: text.clone(),
                })?,
                None => colors.color_for(index),
            };
            let name = spec.name.clone().unwrap_or_else(|| format!("Node {index}"));
            if let Some(&first) = names.get(&name) {
                warn!("duplicate node name {name:?} at {index}; links by name resolve to node {first}");
            } else {
                names.insert(name.clone(), index);
            }
            flow.graph.add_node(FlowNode::new(name, color));
        }

        for (index, spec) in links.iter().enumerate() {
            let source = Self::resolve(&names, &spec.source, index)?;
            let target = Self::resolve(&names, &spec.target, index)?;
            let value = spec.value.coerce().ok_or_else(|| SankeyError::InvalidLinkValue {
                link: index,
                value: spec.value.to_string(),
            })?;
            flow.attach(index, source, target, value)?;
        }

        debug!(
            "built flow graph: {} nodes, {} links",
            flow.node_count(),
            flow.link_count()
        );
        Ok(flow)
    }

    /// Turn a name or raw index into a (not yet bounds-checked) index.
    fn resolve(names: &HashMap<String, usize>, node: &NodeRef, link: usize) -> Result<i64> {
        match node {
            NodeRef::Index(index) => Ok(*index),
            NodeRef::Name(name) => names
                .get(name.as_str())
                .map(|&index| index as i64)
                .ok_or_else(|| SankeyError::UnknownNodeReference {
                    link,
                    name: name.clone(),
                }),
        }
    }

    /// Attach a link to the adjacency lists, validating both endpoints.
    fn attach(&mut self, link: usize, source: i64, target: i64, value: f64) -> Result<()> {
        let source = self.checked_node(link, source)?;
        let target = self.checked_node(link, target)?;

        let id = LinkId::from_index(link);
        self.graph.add_edge(
            NodeIndex::new(source.index()),
            NodeIndex::new(target.index()),
            FlowLink {
                source,
                target,
                value,
            },
        );
        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);

        self.node_mut(source).value_out += value;
        self.node_mut(target).value_in += value;
        Ok(())
    }

    fn checked_node(&self, link: usize, index: i64) -> Result<NodeId> {
        let node_count = self.node_count();
        match usize::try_from(index) {
            Ok(i) if i < node_count => Ok(NodeId::from_index(i)),
            _ => Err(SankeyError::NodeIndexOutOfRange {
                link,
                index,
                node_count,
            }),
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of links.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node identifiers in input order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.node_count()).map(NodeId::from_index)
    }

    /// Link identifiers in input order.
    pub fn link_ids(&self) -> impl Iterator<Item = LinkId> + use<> {
        (0..self.link_count()).map(LinkId::from_index)
    }

    pub fn node(&self, id: NodeId) -> &FlowNode {
        &self.graph[NodeIndex::new(id.index())]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut FlowNode {
        &mut self.graph[NodeIndex::new(id.index())]
    }

    pub fn link(&self, id: LinkId) -> &FlowLink {
        &self.graph[EdgeIndex::new(id.index())]
    }

    /// Outgoing links of a node, in input order.
    pub fn outgoing(&self, id: NodeId) -> &[LinkId] {
        &self.outgoing[id.index()]
    }

    /// Incoming links of a node, in input order.
    pub fn incoming(&self, id: NodeId) -> &[LinkId] {
        &self.incoming[id.index()]
    }
}
