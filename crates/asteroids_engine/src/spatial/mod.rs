//! Spatial partitioning data structures
//!
//! Square bounding boxes and the per-tick quadtree that indexes them.

mod aabb;
mod quadtree;

pub use aabb::{Aabb, DEFAULT_HALF_EDGE};
pub use quadtree::{NodeIds, NodeIndex, QuadNode, QuadTree, QuadTreeCapacity, Quadrant};

use crate::foundation::memory::MemoryError;

/// Spatial index errors
#[derive(thiserror::Error, Debug)]
pub enum SpatialError {
    /// Depth must be at least one (the root)
    #[error("quadtree max depth must be at least 1")]
    InvalidDepth,

    /// Root half-edge must be positive and finite
    #[error("invalid quadtree half-edge: {0}")]
    InvalidHalfEdge(f32),

    /// Node or id storage could not be carved
    #[error("quadtree storage: {0}")]
    Memory(#[from] MemoryError),
}
