//! Node type and related structures.
//!
//! Nodes are the vertical bars of the diagram. Each node has:
//! - A stable identifier (its position in the input list)
//! - A display name and color
//! - Aggregate inflow/outflow
//! - Layer and rectangle, filled in by the layout passes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Stable node identifier.
///
/// This is the node's position in the input list and never changes during a
/// layout run. It wraps a u32 for compact storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Create a NodeId from a list position.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the list position.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Node descriptor as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeSpec {
    /// Display name; defaults to `"Node {index}"`.
    #[serde(default)]
    pub name: Option<String>,
    /// Hex color; defaults to the layout's color scheme.
    #[serde(default)]
    pub color: Option<String>,
}

impl NodeSpec {
    /// A node with a name and a scheme-assigned color.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            color: None,
        }
    }

    /// Set an explicit color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Node record stored in the flow graph while a layout is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub name: String,
    pub color: Rgb,
    /// Sum of incoming link values.
    pub value_in: f64,
    /// Sum of outgoing link values.
    pub value_out: f64,
    /// Horizontal bucket; `None` until layering runs.
    pub layer: Option<u32>,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl FlowNode {
    /// Create an unpositioned node with no flow.
    pub fn new(name: String, color: Rgb) -> Self {
        Self {
            name,
            color,
            value_in: 0.0,
            value_out: 0.0,
            layer: None,
            x0: 0.0,
            x1: 0.0,
            y0: 0.0,
            y1: 0.0,
        }
    }

    /// The flow volume the node's bar is sized by.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value_in.max(self.value_out)
    }

    /// Bar height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Whether the node has no inflow (a layering seed).
    #[inline]
    pub fn is_source(&self) -> bool {
        self.value_in == 0.0
    }
}
