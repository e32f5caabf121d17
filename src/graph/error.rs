//! Graph error types

use thiserror::Error;

/// Errors raised by graph operations
///
/// Duplicate insertions are not errors: they are reported as `Ok(false)`.
/// Collection queries about absent vertices return empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Edge {edge} is already connected to {existing}, cannot reconnect it to {requested}")]
    InconsistentEdgeState {
        edge: String,
        existing: String,
        requested: String,
    },

    #[error("Vertex {0} is not in the graph")]
    VertexNotPresent(String),

    #[error("Edge {0} is not in the graph")]
    EdgeNotPresent(String),

    #[error("Vertex {vertex} is not incident to edge {edge}")]
    NotIncident { vertex: String, edge: String },

    #[error("Bounded views are read-only")]
    ReadOnlyView,
}

pub type GraphResult<T> = Result<T, GraphError>;
