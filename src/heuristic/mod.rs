pub mod segment_permutation;

pub use segment_permutation::*;
