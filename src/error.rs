//! Error type for the Sankey layout pipeline.
//!
//! Every failure is reported synchronously to the caller of the layout
//! operation. Nothing is retried internally.

use thiserror::Error;

/// Errors raised while building, laying out or exporting a Sankey diagram.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SankeyError {
    /// A link names a source/target that is not among the node names.
    #[error("link {link} references unknown node `{name}`")]
    UnknownNodeReference { link: usize, name: String },

    /// A link's numeric source/target falls outside `[0, node_count)`.
    #[error("link {link} references node index {index}, but there are {node_count} nodes")]
    NodeIndexOutOfRange {
        link: usize,
        index: i64,
        node_count: usize,
    },

    /// A link value does not coerce to a finite number >= 0.
    #[error("link {link} has invalid value `{value}` (expected a finite number >= 0)")]
    InvalidLinkValue { link: usize, value: String },

    /// No node has zero inflow, so layering has nowhere to start.
    #[error("no node has zero inflow; layering needs at least one source node")]
    NoSourceNodes,

    /// Layer relaxation exceeded its bound, which only happens on a cycle.
    #[error("flow cycle detected while layering node {node}")]
    CyclicFlow { node: usize },

    /// A node has inflow but no path from any source node.
    #[error("node {node} is not reachable from any source node")]
    UnreachableNode { node: usize },

    /// A node color is not `#rgb` or `#rrggbb`.
    #[error("node {node} has invalid color `{color}`")]
    InvalidColor { node: usize, color: String },

    /// A layout parameter is outside its valid range.
    #[error("invalid layout parameter `{name}`: {reason}")]
    InvalidLayoutParameter { name: &'static str, reason: String },

    /// Input or output could not be (de)serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SankeyError>;

impl From<serde_json::Error> for SankeyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for SankeyError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
