//! Computes a minimum-total-weight set of directed edges whose induced
//! subgraph is a single strongly connected component spanning every node.
//!
//! The crate ships two search strategies: a randomized segment-permutation
//! local search ([`heuristic`]) that quickly produces a good upper bound, and
//! an exhaustive branch-and-bound subset search ([`exact`]) that verifies or
//! improves it. Both operate on the indexed adjacency structure in [`graph`].

pub mod algorithm;
pub mod errors;
pub mod exact;
pub mod graph;
pub mod heuristic;
pub mod io;
pub mod log;
pub mod utils;

pub mod prelude {
    pub use super::algorithm::*;
    pub use super::exact::*;
    pub use super::graph::*;
    pub use super::heuristic::*;
    pub use super::io::*;
    pub use super::utils::*;
}

#[cfg(test)]
mod testing;
