//! Temporal multigraph implementation
//!
//! This module implements the event graph data model with:
//! - Directed and undirected multi-edges keyed by an ordered event key
//! - Three interchangeable indexing strategies behind one trait
//! - Read-only interval views (sub-networks) that share edge storage
//! - An adjacency skeleton for incidence and neighbor queries

pub mod adjacency;
pub mod any;
pub mod dyad;
pub mod edge;
pub mod error;
pub mod flat;
pub mod navigable;
pub mod types;
pub mod vertex;

// Re-export main types
pub use adjacency::{AdjacencyGraph, EdgeSlot};
pub use any::EventGraph;
pub use dyad::DyadGraph;
pub use edge::{EdgeEvent, EdgeRecord, EdgeRef};
pub use error::{GraphError, GraphResult};
pub use flat::FlatGraph;
pub use navigable::{EdgeOf, LoadSummary, NavigableGraph};
pub use types::{
    DyadKey, EdgeIdentity, EdgeType, EdgeValue, EventKey, GraphKind, GraphSettings, KeyRange,
    VertexId,
};
pub use vertex::VertexGraph;
