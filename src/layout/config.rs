//! Layout parameters.

use serde::Deserialize;

use crate::error::{Result, SankeyError};

fn default_node_width() -> f64 {
    20.0
}

fn default_node_padding() -> f64 {
    10.0
}

fn default_curvature() -> f64 {
    0.5
}

fn default_gradient_prefix() -> String {
    "sankey-gradient".to_string()
}

/// Configuration for the Sankey layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Drawing width. Required.
    pub width: f64,
    /// Drawing height. Required.
    pub height: f64,
    /// Width of each node bar (default: 20).
    #[serde(default = "default_node_width")]
    pub node_width: f64,
    /// Vertical gap between nodes in a layer, and between links stacked on
    /// a node (default: 10).
    #[serde(default = "default_node_padding")]
    pub node_padding: f64,
    /// Horizontal position of the Bezier control points as a fraction of the
    /// link's x-span (default: 0.5, a symmetric S-curve).
    #[serde(default = "default_curvature")]
    pub curvature: f64,
    /// Prefix for gradient handles; the link index is appended.
    #[serde(default = "default_gradient_prefix")]
    pub gradient_prefix: String,
}

impl LayoutConfig {
    /// Create a configuration for a `width × height` drawing with defaults
    /// for everything else.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            node_width: default_node_width(),
            node_padding: default_node_padding(),
            curvature: default_curvature(),
            gradient_prefix: default_gradient_prefix(),
        }
    }

    pub fn with_node_width(mut self, node_width: f64) -> Self {
        self.node_width = node_width;
        self
    }

    pub fn with_node_padding(mut self, node_padding: f64) -> Self {
        self.node_padding = node_padding;
        self
    }

    pub fn with_curvature(mut self, curvature: f64) -> Self {
        self.curvature = curvature;
        self
    }

    /// Check every parameter's range.
    pub fn validate(&self) -> Result<()> {
        let invalid = |name: &'static str, reason: &str| -> Result<()> {
            Err(SankeyError::InvalidLayoutParameter {
                name,
                reason: reason.to_string(),
            })
        };

        if !(self.width.is_finite() && self.width > 0.0) {
            return invalid("width", "must be a positive finite number");
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return invalid("height", "must be a positive finite number");
        }
        if !(self.node_width.is_finite() && self.node_width >= 0.0 && self.node_width <= self.width) {
            return invalid("nodeWidth", "must be between 0 and width");
        }
        if !(self.node_padding.is_finite() && self.node_padding >= 0.0) {
            return invalid("nodePadding", "must be a finite number >= 0");
        }
        if !(0.0..=1.0).contains(&self.curvature) {
            return invalid("curvature", "must be between 0 and 1");
        }
        if self.gradient_prefix.is_empty() {
            return invalid("gradientPrefix", "must not be empty");
        }
        Ok(())
    }
}
