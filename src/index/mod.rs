//! Ordered indices over event keys
//!
//! The multi-index is the storage unit every graph implementation is built
//! from: per dyad, per vertex, or one for the whole graph.

pub mod multi_index;

pub use multi_index::MultiIndex;
