//! Error types. Hand-written `Display`/`Error` impls rather than a
//! derive macro, matching the teacher lineage's own `OpenError`,
//! `InsertError`, and friends in its repository store.

use std::fmt;

/// Failures that can occur while reconstructing a [`crate::pool::Pool`]
/// into a live vector.
#[derive(Debug)]
pub enum PoolError {
    /// The pool's `B`/`BL` do not match this build's fixed branching
    /// factor, so its node shapes cannot be reinterpreted directly.
    IncompatibleBits,
    /// An inner record references a child id absent from both the
    /// leaf and inner tables.
    InvalidNodeId,
    /// A leaf or inner record has more children/values than the
    /// branching factor allows, or an inner record has none.
    InvalidChildrenCount,
    /// The child-id graph contains a cycle, so it cannot be a valid
    /// tree.
    PoolHasCycles,
    /// Siblings under one inner node reconstructed to different
    /// depths.
    SameDepthChildren,
    /// A relaxed node was encountered while loading into a context
    /// that requires strict structure throughout (see
    /// [`crate::pool::load_strict`]).
    RelaxedNodeNotAllowed,
    /// A node's recorded shape violates the strict/relaxed size
    /// invariants (e.g. a "strict" inner node whose non-last child is
    /// not full).
    VectorCorrupted,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::IncompatibleBits => write!(f, "pool branching factor does not match this build"),
            PoolError::InvalidNodeId => write!(f, "pool references a node id that does not exist"),
            PoolError::InvalidChildrenCount => write!(f, "pool node has an invalid child or value count"),
            PoolError::PoolHasCycles => write!(f, "pool node graph contains a cycle"),
            PoolError::SameDepthChildren => write!(f, "pool node's children reconstructed to different depths"),
            PoolError::RelaxedNodeNotAllowed => write!(f, "pool contains a relaxed node where only strict nodes are allowed"),
            PoolError::VectorCorrupted => write!(f, "pool node violates the strict/relaxed size invariants"),
        }
    }
}

impl std::error::Error for PoolError {}
