//! The navigable graph contract
//!
//! Every indexing strategy implements [`NavigableGraph`]. Implementations
//! supply storage, incidence queries and `bounded`; everything else
//! (insert helpers, range shortcuts, degree counts, endpoint lookups) is
//! derived here so analysis code can be written once against the trait.
//!
//! Endpoint and type lookups read the shared edge record, so a view
//! answers them exactly as its parent would, including for parent edges
//! outside the view's range.

use super::edge::{EdgeEvent, EdgeRecord, EdgeRef};
use super::error::{GraphError, GraphResult};
use super::types::{
    DyadKey, EdgeType, EdgeValue, EventKey, GraphKind, GraphSettings, KeyRange, VertexId,
};
use rustc_hash::FxHashSet;
use tracing::warn;

/// Edge handle type of a graph
pub type EdgeOf<G> = EdgeRef<
    <G as NavigableGraph>::Key,
    <G as NavigableGraph>::Vertex,
    <G as NavigableGraph>::Value,
>;

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Events that became new edges
    pub inserted: usize,

    /// Events rejected as duplicates
    pub duplicates: usize,
}

impl LoadSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.duplicates
    }
}

/// Multigraph of keyed events with interval sub-networks
pub trait NavigableGraph: Sized {
    type Key: EventKey;
    type Vertex: VertexId;
    type Value: EdgeValue;

    /// Indexing strategy behind this graph
    fn kind(&self) -> GraphKind;

    fn settings(&self) -> &GraphSettings;

    /// Declared key window; unbounded for a root graph
    fn bounds(&self) -> &KeyRange<Self::Key>;

    /// Add an isolated vertex
    fn add_vertex(&mut self, vertex: Self::Vertex) -> GraphResult<bool>;

    /// Remove a vertex with every edge incident to it
    fn remove_vertex(&mut self, vertex: &Self::Vertex) -> GraphResult<bool>;

    /// Insert an edge, adding missing endpoints
    ///
    /// Returns `Ok(false)` when the pair already holds an edge of the same
    /// type at the same key.
    fn add_record(
        &mut self,
        record: EdgeRecord<Self::Key, Self::Vertex, Self::Value>,
    ) -> GraphResult<bool>;

    fn remove_edge(&mut self, edge: &EdgeOf<Self>) -> GraphResult<bool>;

    /// Remove every vertex and edge
    fn clear(&mut self) -> GraphResult<()>;

    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn vertices(&self) -> Vec<Self::Vertex>;

    fn edges(&self) -> Vec<EdgeOf<Self>>;

    fn contains_vertex(&self, vertex: &Self::Vertex) -> bool;

    fn contains_edge(&self, edge: &EdgeOf<Self>) -> bool;

    fn in_edges(&self, vertex: &Self::Vertex) -> Vec<EdgeOf<Self>>;

    fn out_edges(&self, vertex: &Self::Vertex) -> Vec<EdgeOf<Self>>;

    /// Incoming and outgoing edges, each listed once
    fn incident_edges(&self, vertex: &Self::Vertex) -> Vec<EdgeOf<Self>>;

    fn neighbors(&self, vertex: &Self::Vertex) -> Vec<Self::Vertex>;

    fn predecessors(&self, vertex: &Self::Vertex) -> Vec<Self::Vertex>;

    fn successors(&self, vertex: &Self::Vertex) -> Vec<Self::Vertex>;

    /// Edges leaving `from` (or undirected edges touching it) whose other end is `to`
    fn find_edge_set(&self, from: &Self::Vertex, to: &Self::Vertex) -> Vec<EdgeOf<Self>>;

    /// Smallest key held by any edge
    fn earliest_key(&self) -> Option<Self::Key>;

    /// Largest key held by any edge
    fn latest_key(&self) -> Option<Self::Key>;

    /// An edge holding the smallest key
    fn first_edge(&self) -> Option<EdgeOf<Self>>;

    /// An edge holding the largest key
    fn last_edge(&self) -> Option<EdgeOf<Self>>;

    /// Read-only view of the edges whose key falls in `range`
    ///
    /// The view's bounds are `range` intersected with this graph's bounds,
    /// and its vertices are the endpoints of the edges it holds.
    fn bounded(&self, range: KeyRange<Self::Key>) -> Self;

    /// Distinct vertex pairs joined by at least one edge
    fn pairs(&self) -> Vec<(Self::Vertex, Self::Vertex)> {
        let mut seen = FxHashSet::default();
        self.edges()
            .into_iter()
            .filter(|edge| seen.insert(edge.dyad_key().unordered()))
            .map(|edge| edge.endpoints())
            .collect()
    }

    fn add_edge(&mut self, key: Self::Key, from: Self::Vertex, to: Self::Vertex) -> GraphResult<bool> {
        let edge_type = self.settings().default_edge_type;
        self.add_edge_full(key, from, to, None, edge_type)
    }

    fn add_edge_typed(
        &mut self,
        key: Self::Key,
        from: Self::Vertex,
        to: Self::Vertex,
        edge_type: EdgeType,
    ) -> GraphResult<bool> {
        self.add_edge_full(key, from, to, None, edge_type)
    }

    fn add_edge_with_value(
        &mut self,
        key: Self::Key,
        from: Self::Vertex,
        to: Self::Vertex,
        value: Self::Value,
    ) -> GraphResult<bool> {
        let edge_type = self.settings().default_edge_type;
        self.add_edge_full(key, from, to, Some(value), edge_type)
    }

    fn add_edge_full(
        &mut self,
        key: Self::Key,
        from: Self::Vertex,
        to: Self::Vertex,
        value: Option<Self::Value>,
        edge_type: EdgeType,
    ) -> GraphResult<bool> {
        self.add_record(EdgeRecord {
            key,
            from,
            to,
            value,
            edge_type,
        })
    }

    /// Insert one loader tuple, rejecting missing endpoints
    fn add_event(&mut self, event: EdgeEvent<Self::Key, Self::Vertex, Self::Value>) -> GraphResult<bool> {
        let record = event.into_record(self.settings().default_edge_type)?;
        self.add_record(record)
    }

    /// Insert a sequence of loader tuples
    ///
    /// Stops at the first invalid event; earlier events stay inserted.
    fn add_events<I>(&mut self, events: I) -> GraphResult<LoadSummary>
    where
        I: IntoIterator<Item = EdgeEvent<Self::Key, Self::Vertex, Self::Value>>,
    {
        let mut summary = LoadSummary::default();
        for event in events {
            match self.add_event(event) {
                Ok(true) => summary.inserted += 1,
                Ok(false) => summary.duplicates += 1,
                Err(e) => {
                    warn!(
                        "Bulk load aborted after {} events: {}",
                        summary.total(),
                        e
                    );
                    return Err(e);
                }
            }
        }
        Ok(summary)
    }

    /// Edges with `start <= key < stop`
    fn sub_network(&self, start: Self::Key, stop: Self::Key) -> Self {
        self.bounded(KeyRange::between(start, stop))
    }

    /// Edges with `key < stop`
    fn head_network(&self, stop: Self::Key) -> Self {
        self.bounded(KeyRange::below(stop))
    }

    /// Edges with `key >= start`
    fn tail_network(&self, start: Self::Key) -> Self {
        self.bounded(KeyRange::at_least(start))
    }

    fn lower_bound(&self) -> Option<&Self::Key> {
        self.bounds().lower.as_ref()
    }

    fn upper_bound(&self) -> Option<&Self::Key> {
        self.bounds().upper.as_ref()
    }

    fn is_bounded(&self) -> bool {
        self.bounds().is_bounded()
    }

    /// Lower bound if declared, otherwise the earliest key present
    fn first_key(&self) -> Option<Self::Key> {
        self.lower_bound().cloned().or_else(|| self.earliest_key())
    }

    /// Upper bound if declared, otherwise the latest key present
    fn last_key(&self) -> Option<Self::Key> {
        self.upper_bound().cloned().or_else(|| self.latest_key())
    }

    fn default_edge_type(&self) -> EdgeType {
        self.settings().default_edge_type
    }

    fn degree(&self, vertex: &Self::Vertex) -> usize {
        self.incident_edges(vertex).len()
    }

    fn in_degree(&self, vertex: &Self::Vertex) -> usize {
        self.in_edges(vertex).len()
    }

    fn out_degree(&self, vertex: &Self::Vertex) -> usize {
        self.out_edges(vertex).len()
    }

    fn neighbor_count(&self, vertex: &Self::Vertex) -> usize {
        self.neighbors(vertex).len()
    }

    fn predecessor_count(&self, vertex: &Self::Vertex) -> usize {
        self.predecessors(vertex).len()
    }

    fn successor_count(&self, vertex: &Self::Vertex) -> usize {
        self.successors(vertex).len()
    }

    fn find_edge(&self, from: &Self::Vertex, to: &Self::Vertex) -> Option<EdgeOf<Self>> {
        self.find_edge_set(from, to).into_iter().next()
    }

    /// Whether endpoint and type lookups can answer for `edge`
    ///
    /// A root graph answers for the edges it holds. A view answers for
    /// any edge handed out by its ancestors, whose record it shares, even
    /// when the edge falls outside the view's range.
    fn knows_edge(&self, edge: &EdgeOf<Self>) -> bool {
        self.is_bounded() || self.contains_edge(edge)
    }

    fn endpoints(&self, edge: &EdgeOf<Self>) -> Option<(Self::Vertex, Self::Vertex)> {
        self.knows_edge(edge).then(|| edge.endpoints())
    }

    fn edge_type(&self, edge: &EdgeOf<Self>) -> Option<EdgeType> {
        self.knows_edge(edge).then(|| edge.edge_type)
    }

    /// Source of a directed edge; `None` for undirected or unknown edges
    fn source(&self, edge: &EdgeOf<Self>) -> Option<Self::Vertex> {
        (edge.is_directed() && self.knows_edge(edge)).then(|| edge.from.clone())
    }

    /// Destination of a directed edge; `None` for undirected or unknown edges
    fn dest(&self, edge: &EdgeOf<Self>) -> Option<Self::Vertex> {
        (edge.is_directed() && self.knows_edge(edge)).then(|| edge.to.clone())
    }

    fn is_source(&self, vertex: &Self::Vertex, edge: &EdgeOf<Self>) -> bool {
        self.source(edge).map_or(false, |v| v == *vertex)
    }

    fn is_dest(&self, vertex: &Self::Vertex, edge: &EdgeOf<Self>) -> bool {
        self.dest(edge).map_or(false, |v| v == *vertex)
    }

    /// The endpoint across `edge` from `vertex`
    fn opposite(&self, vertex: &Self::Vertex, edge: &EdgeOf<Self>) -> GraphResult<Self::Vertex> {
        if !self.contains_edge(edge) {
            return Err(GraphError::EdgeNotPresent(format!("{:?}", edge)));
        }
        edge.opposite(vertex)
    }

    fn incident_vertices(&self, edge: &EdgeOf<Self>) -> Vec<Self::Vertex> {
        if !self.contains_edge(edge) {
            return Vec::new();
        }
        if edge.is_loop() {
            vec![edge.from.clone()]
        } else {
            vec![edge.from.clone(), edge.to.clone()]
        }
    }

    /// Number of distinct endpoints: 1 for a self-loop, 2 otherwise
    fn incident_count(&self, edge: &EdgeOf<Self>) -> usize {
        self.incident_vertices(edge).len()
    }

    /// Whether `vertex` is an endpoint of `edge`; both must be present
    fn is_incident(&self, vertex: &Self::Vertex, edge: &EdgeOf<Self>) -> GraphResult<bool> {
        if !self.contains_vertex(vertex) {
            return Err(GraphError::VertexNotPresent(format!("{:?}", vertex)));
        }
        if !self.contains_edge(edge) {
            return Err(GraphError::EdgeNotPresent(format!("{:?}", edge)));
        }
        Ok(edge.is_incident(vertex))
    }

    fn is_neighbor(&self, a: &Self::Vertex, b: &Self::Vertex) -> bool {
        self.neighbors(a).contains(b)
    }

    /// Whether some edge leads from `a` into `b`
    fn is_predecessor(&self, a: &Self::Vertex, b: &Self::Vertex) -> bool {
        self.predecessors(b).contains(a)
    }

    /// Whether some edge leads from `b` into `a`
    fn is_successor(&self, a: &Self::Vertex, b: &Self::Vertex) -> bool {
        self.successors(b).contains(a)
    }

    fn edges_of_type(&self, edge_type: EdgeType) -> Vec<EdgeOf<Self>> {
        self.edges()
            .into_iter()
            .filter(|edge| edge.edge_type == edge_type)
            .collect()
    }

    fn edge_count_of_type(&self, edge_type: EdgeType) -> usize {
        self.edges_of_type(edge_type).len()
    }
}

/// Shared duplicate rule: the dyad already holds an edge at this key
pub(crate) fn holds_key<'a, K, V, E, I>(candidates: I, key: &K, dyad: &DyadKey<V>) -> bool
where
    K: EventKey,
    V: VertexId,
    E: EdgeValue,
    I: IntoIterator<Item = &'a EdgeRef<K, V, E>>,
{
    candidates
        .into_iter()
        .any(|edge| edge.key == *key && edge.dyad_key() == *dyad)
}

/// Reject writes on bounded views
pub(crate) fn ensure_writable<K>(bounds: &KeyRange<K>) -> GraphResult<()> {
    if bounds.is_bounded() {
        Err(GraphError::ReadOnlyView)
    } else {
        Ok(())
    }
}
