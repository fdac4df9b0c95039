use std::error::Error;

use crate::graph::Node;

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> Result<(), E>;
}

/// Violations of the structural invariants of [`crate::graph::Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphInvariantError {
    #[error("node {0} appears in an adjacency list but carries no index")]
    UnindexedNode(Node),

    #[error("node indices are not dense and zero-based")]
    NonDenseIndices,

    #[error("adjacency list of node {0} is not sorted by ascending weight")]
    UnsortedAdjacency(Node),

    #[error("more than one edge retained between {0} and {1}")]
    DuplicateEdge(Node, Node),

    #[error("edge {0} is present in only one of the two adjacency maps")]
    AsymmetricEdge(u32),
}
