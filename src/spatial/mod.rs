//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree based index over a positioned diagram so
//! hover and click handlers can map a pointer position to a node or link.

mod rtree;

pub use rtree::{HitBox, HitIndex, HitTarget};
