//! Graph data structures and input resolution.
//!
//! This module turns caller-supplied node and link descriptors into an
//! indexed flow graph, using petgraph's StableGraph as the arena and keeping
//! input-ordered adjacency lists alongside it.

mod builder;
mod link;
mod node;

pub use builder::FlowGraph;
pub use link::{FlowLink, LinkId, LinkSpec, LinkValue, NodeRef};
pub use node::{FlowNode, NodeId, NodeSpec};
