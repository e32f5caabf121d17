//! EventGraph
//!
//! A temporal multigraph: edges are events keyed by an ordered value
//! (usually a timestamp), and any contiguous key interval can be cut out
//! of the graph as a read-only sub-network.
//!
//! # Architecture
//!
//! - [`index::MultiIndex`]: ordered, duplicate-key tolerant index with
//!   shared-storage range views
//! - [`graph::AdjacencyGraph`]: skeleton multigraph for incidence queries
//! - Three interchangeable strategies implementing
//!   [`graph::NavigableGraph`]:
//!   - [`graph::DyadGraph`] indexes edges per vertex pair and type
//!   - [`graph::VertexGraph`] indexes edges per source vertex
//!   - [`graph::FlatGraph`] keeps one index and replays ranges into a new
//!     adjacency graph
//! - [`graph::EventGraph`]: strategy chosen at runtime from
//!   [`config::GraphConfig`]
//! - [`interval`]: interval sequences and multi-resolution binning
//! - [`persistence`]: whole-graph binary snapshots
//!
//! ## Example Usage
//!
//! ```rust
//! use eventgraph::graph::{DyadGraph, NavigableGraph};
//!
//! let mut graph: DyadGraph<u64, &str, ()> = DyadGraph::default();
//! graph.add_edge(1, "alice", "bob").unwrap();
//! graph.add_edge(5, "bob", "carol").unwrap();
//! graph.add_edge(9, "carol", "alice").unwrap();
//!
//! // Duplicate key on the same pair is rejected
//! assert!(!graph.add_edge(1, "alice", "bob").unwrap());
//!
//! let window = graph.sub_network(2, 9);
//! assert_eq!(window.edge_count(), 1);
//! assert_eq!(window.first_key(), Some(2));
//! assert_eq!(graph.tail_network(5).edge_count(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod index;
pub mod interval;
pub mod persistence;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, GraphConfig, SnapshotConfig};

pub use graph::{
    AdjacencyGraph, DyadGraph, DyadKey, EdgeEvent, EdgeIdentity, EdgeRecord, EdgeRef, EdgeType,
    EventGraph, FlatGraph, GraphError, GraphKind, GraphResult, GraphSettings, KeyRange,
    LoadSummary, NavigableGraph, VertexGraph,
};

pub use index::MultiIndex;

pub use interval::{
    ConsecutiveIntervals, ExponentialScales, Increments, Interval, MidpointWindows, TimeStep,
};

pub use persistence::{SnapshotError, SnapshotResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
