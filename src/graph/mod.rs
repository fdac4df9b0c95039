pub mod adjacency;
pub mod edge;
pub mod random;
pub mod scc;
pub mod shortest_paths;

pub use adjacency::*;
pub use edge::*;
pub use random::*;
pub use scc::*;
pub use shortest_paths::*;

/// External integer identity of a node, as supplied by the input
pub type Node = u32;

/// Dense zero-based index assigned to a node in first-seen order
pub type NodeIndex = u32;

/// External integer identity of an edge
pub type EdgeName = u32;

pub type NumNodes = u32;
pub type NumEdges = u32;

/// Edge weights and accumulated path/tour weights
pub type Weight = i64;

/// Sentinel distance of an unreachable pair in the shortest-path matrix.
/// Guards in the relaxation ensure it is never an addend.
pub const INFINITY: Weight = Weight::MAX;
