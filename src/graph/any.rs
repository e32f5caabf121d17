//! Runtime choice of indexing strategy
//!
//! [`EventGraph`] wraps the three implementations behind one type so that
//! the strategy can come from configuration. Views of an `EventGraph` keep
//! the variant of the graph they were taken from.

use super::dyad::DyadGraph;
use super::edge::{EdgeRecord, EdgeRef};
use super::error::GraphResult;
use super::flat::FlatGraph;
use super::navigable::NavigableGraph;
use super::types::{EdgeValue, EventKey, GraphKind, GraphSettings, KeyRange, VertexId};
use super::vertex::VertexGraph;

/// Graph whose indexing strategy is chosen at construction
#[derive(Debug, Clone)]
pub enum EventGraph<K, V, E> {
    Dyad(DyadGraph<K, V, E>),
    Vertex(VertexGraph<K, V, E>),
    Flat(FlatGraph<K, V, E>),
}

macro_rules! dispatch {
    ($graph:expr, $inner:ident => $body:expr) => {
        match $graph {
            EventGraph::Dyad($inner) => $body,
            EventGraph::Vertex($inner) => $body,
            EventGraph::Flat($inner) => $body,
        }
    };
}

impl<K: EventKey, V: VertexId, E: EdgeValue> EventGraph<K, V, E> {
    pub fn new(kind: GraphKind, settings: GraphSettings) -> Self {
        match kind {
            GraphKind::Dyad => EventGraph::Dyad(DyadGraph::new(settings)),
            GraphKind::Vertex => EventGraph::Vertex(VertexGraph::new(settings)),
            GraphKind::Flat => EventGraph::Flat(FlatGraph::new(settings)),
        }
    }

    pub fn as_dyad(&self) -> Option<&DyadGraph<K, V, E>> {
        match self {
            EventGraph::Dyad(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_vertex(&self) -> Option<&VertexGraph<K, V, E>> {
        match self {
            EventGraph::Vertex(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_flat(&self) -> Option<&FlatGraph<K, V, E>> {
        match self {
            EventGraph::Flat(g) => Some(g),
            _ => None,
        }
    }
}

impl<K: EventKey, V: VertexId, E: EdgeValue> Default for EventGraph<K, V, E> {
    fn default() -> Self {
        Self::new(GraphKind::default(), GraphSettings::default())
    }
}

impl<K, V, E> From<DyadGraph<K, V, E>> for EventGraph<K, V, E> {
    fn from(graph: DyadGraph<K, V, E>) -> Self {
        EventGraph::Dyad(graph)
    }
}

impl<K, V, E> From<VertexGraph<K, V, E>> for EventGraph<K, V, E> {
    fn from(graph: VertexGraph<K, V, E>) -> Self {
        EventGraph::Vertex(graph)
    }
}

impl<K, V, E> From<FlatGraph<K, V, E>> for EventGraph<K, V, E> {
    fn from(graph: FlatGraph<K, V, E>) -> Self {
        EventGraph::Flat(graph)
    }
}

impl<K: EventKey, V: VertexId, E: EdgeValue> NavigableGraph for EventGraph<K, V, E> {
    type Key = K;
    type Vertex = V;
    type Value = E;

    fn kind(&self) -> GraphKind {
        dispatch!(self, g => g.kind())
    }

    fn settings(&self) -> &GraphSettings {
        dispatch!(self, g => g.settings())
    }

    fn bounds(&self) -> &KeyRange<K> {
        dispatch!(self, g => g.bounds())
    }

    fn add_vertex(&mut self, vertex: V) -> GraphResult<bool> {
        dispatch!(self, g => g.add_vertex(vertex))
    }

    fn remove_vertex(&mut self, vertex: &V) -> GraphResult<bool> {
        dispatch!(self, g => g.remove_vertex(vertex))
    }

    fn add_record(&mut self, record: EdgeRecord<K, V, E>) -> GraphResult<bool> {
        dispatch!(self, g => g.add_record(record))
    }

    fn remove_edge(&mut self, edge: &EdgeRef<K, V, E>) -> GraphResult<bool> {
        dispatch!(self, g => g.remove_edge(edge))
    }

    fn clear(&mut self) -> GraphResult<()> {
        dispatch!(self, g => g.clear())
    }

    fn vertex_count(&self) -> usize {
        dispatch!(self, g => g.vertex_count())
    }

    fn edge_count(&self) -> usize {
        dispatch!(self, g => g.edge_count())
    }

    fn vertices(&self) -> Vec<V> {
        dispatch!(self, g => g.vertices())
    }

    fn edges(&self) -> Vec<EdgeRef<K, V, E>> {
        dispatch!(self, g => g.edges())
    }

    fn contains_vertex(&self, vertex: &V) -> bool {
        dispatch!(self, g => g.contains_vertex(vertex))
    }

    fn contains_edge(&self, edge: &EdgeRef<K, V, E>) -> bool {
        dispatch!(self, g => g.contains_edge(edge))
    }

    fn in_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        dispatch!(self, g => g.in_edges(vertex))
    }

    fn out_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        dispatch!(self, g => g.out_edges(vertex))
    }

    fn incident_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        dispatch!(self, g => g.incident_edges(vertex))
    }

    fn neighbors(&self, vertex: &V) -> Vec<V> {
        dispatch!(self, g => g.neighbors(vertex))
    }

    fn predecessors(&self, vertex: &V) -> Vec<V> {
        dispatch!(self, g => g.predecessors(vertex))
    }

    fn successors(&self, vertex: &V) -> Vec<V> {
        dispatch!(self, g => g.successors(vertex))
    }

    fn find_edge_set(&self, from: &V, to: &V) -> Vec<EdgeRef<K, V, E>> {
        dispatch!(self, g => g.find_edge_set(from, to))
    }

    fn earliest_key(&self) -> Option<K> {
        dispatch!(self, g => g.earliest_key())
    }

    fn latest_key(&self) -> Option<K> {
        dispatch!(self, g => g.latest_key())
    }

    fn first_edge(&self) -> Option<EdgeRef<K, V, E>> {
        dispatch!(self, g => g.first_edge())
    }

    fn last_edge(&self) -> Option<EdgeRef<K, V, E>> {
        dispatch!(self, g => g.last_edge())
    }

    fn bounded(&self, range: KeyRange<K>) -> Self {
        match self {
            EventGraph::Dyad(g) => EventGraph::Dyad(g.bounded(range)),
            EventGraph::Vertex(g) => EventGraph::Vertex(g.bounded(range)),
            EventGraph::Flat(g) => EventGraph::Flat(g.bounded(range)),
        }
    }

    fn pairs(&self) -> Vec<(V, V)> {
        dispatch!(self, g => g.pairs())
    }
}
