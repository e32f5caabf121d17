//! Vertex-indexed graph
//!
//! Each vertex owns a [`MultiIndex`] of the edges it is the source of.
//! Every edge is stored exactly once, under its `from` vertex, and a
//! skeleton graph over the realized edge handles answers incidence,
//! neighbor and degree queries for both endpoints.
//!
//! A sub-network takes a range view of every vertex index and rebuilds
//! the skeleton from the edges in range.

use super::adjacency::AdjacencyGraph;
use super::edge::{EdgeRecord, EdgeRef};
use super::error::GraphResult;
use super::navigable::{ensure_writable, holds_key, NavigableGraph};
use super::types::{EdgeType, EdgeValue, EventKey, GraphKind, GraphSettings, KeyRange, VertexId};
use crate::index::MultiIndex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

type VertexIndex<K, V, E> = MultiIndex<K, EdgeRef<K, V, E>>;

/// Graph with one key index per source vertex
#[derive(Debug, Clone)]
pub struct VertexGraph<K, V, E> {
    /// Vertices and realized edges
    skeleton: AdjacencyGraph<V, EdgeRef<K, V, E>>,

    /// Source vertex -> edges it starts, ordered by key
    indices: FxHashMap<V, VertexIndex<K, V, E>>,

    settings: GraphSettings,
    bounds: KeyRange<K>,
}

impl<K: EventKey, V: VertexId, E: EdgeValue> Default for VertexGraph<K, V, E> {
    fn default() -> Self {
        Self::new(GraphSettings::default())
    }
}

impl<K: EventKey, V: VertexId, E: EdgeValue> VertexGraph<K, V, E> {
    pub fn new(settings: GraphSettings) -> Self {
        Self {
            skeleton: AdjacencyGraph::new(),
            indices: FxHashMap::default(),
            settings,
            bounds: KeyRange::unbounded(),
        }
    }

    /// Edges stored under `vertex`, i.e. those it is the source of, in key order
    pub fn indexed_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        self.indices
            .get(vertex)
            .map(|index| index.values().cloned().collect())
            .unwrap_or_default()
    }

    fn is_duplicate(&self, record: &EdgeRecord<K, V, E>) -> bool {
        let dyad = record.dyad_key();
        let stored_under = |vertex: &V| {
            self.indices
                .get(vertex)
                .map_or(false, |index| holds_key(index.get(&record.key), &record.key, &dyad))
        };
        // An undirected edge may have been stored under either endpoint
        stored_under(&record.from)
            || (record.edge_type == EdgeType::Undirected && stored_under(&record.to))
    }
}

impl<K: EventKey, V: VertexId, E: EdgeValue> NavigableGraph for VertexGraph<K, V, E> {
    type Key = K;
    type Vertex = V;
    type Value = E;

    fn kind(&self) -> GraphKind {
        GraphKind::Vertex
    }

    fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    fn bounds(&self) -> &KeyRange<K> {
        &self.bounds
    }

    fn add_vertex(&mut self, vertex: V) -> GraphResult<bool> {
        ensure_writable(&self.bounds)?;
        Ok(self.skeleton.add_vertex(vertex))
    }

    fn remove_vertex(&mut self, vertex: &V) -> GraphResult<bool> {
        ensure_writable(&self.bounds)?;
        let Some(removed) = self.skeleton.remove_vertex(vertex) else {
            return Ok(false);
        };
        self.indices.remove(vertex);
        for edge in removed {
            if let Some(index) = self.indices.get_mut(&edge.from) {
                index.remove(&edge.key, &edge);
                if index.is_empty() {
                    self.indices.remove(&edge.from);
                }
            }
        }
        Ok(true)
    }

    fn add_record(&mut self, record: EdgeRecord<K, V, E>) -> GraphResult<bool> {
        ensure_writable(&self.bounds)?;
        if self.is_duplicate(&record) {
            trace!("Duplicate edge {:?} at key {:?}", record.dyad_key(), record.key);
            return Ok(false);
        }

        let from = record.from.clone();
        let to = record.to.clone();
        let edge_type = record.edge_type;
        let key = record.key.clone();
        let edge = EdgeRef::new(record, self.settings.identity);

        if !self.skeleton.add_edge(edge.clone(), from.clone(), to, edge_type)? {
            return Ok(false);
        }
        Ok(self.indices.entry(from).or_default().put(key, edge))
    }

    fn remove_edge(&mut self, edge: &EdgeRef<K, V, E>) -> GraphResult<bool> {
        ensure_writable(&self.bounds)?;
        if self.skeleton.remove_edge(edge).is_none() {
            return Ok(false);
        }
        if let Some(index) = self.indices.get_mut(&edge.from) {
            index.remove(&edge.key, edge);
            if index.is_empty() {
                self.indices.remove(&edge.from);
            }
        }
        Ok(true)
    }

    fn clear(&mut self) -> GraphResult<()> {
        ensure_writable(&self.bounds)?;
        self.skeleton.clear();
        self.indices.clear();
        Ok(())
    }

    fn vertex_count(&self) -> usize {
        self.skeleton.vertex_count()
    }

    fn edge_count(&self) -> usize {
        self.skeleton.edge_count()
    }

    fn vertices(&self) -> Vec<V> {
        self.skeleton.vertices().cloned().collect()
    }

    fn edges(&self) -> Vec<EdgeRef<K, V, E>> {
        self.skeleton.edges().map(|(edge, _)| edge.clone()).collect()
    }

    fn contains_vertex(&self, vertex: &V) -> bool {
        self.skeleton.contains_vertex(vertex)
    }

    fn contains_edge(&self, edge: &EdgeRef<K, V, E>) -> bool {
        self.skeleton.contains_edge(edge)
    }

    fn in_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        self.skeleton.in_edges(vertex).cloned().collect()
    }

    fn out_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        self.skeleton.out_edges(vertex).cloned().collect()
    }

    fn incident_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        self.skeleton
            .incident_edges(vertex)
            .into_iter()
            .cloned()
            .collect()
    }

    fn neighbors(&self, vertex: &V) -> Vec<V> {
        self.skeleton.neighbors(vertex)
    }

    fn predecessors(&self, vertex: &V) -> Vec<V> {
        self.skeleton.predecessors(vertex)
    }

    fn successors(&self, vertex: &V) -> Vec<V> {
        self.skeleton.successors(vertex)
    }

    fn find_edge_set(&self, from: &V, to: &V) -> Vec<EdgeRef<K, V, E>> {
        self.skeleton
            .find_edge_set(from, to)
            .into_iter()
            .cloned()
            .collect()
    }

    fn earliest_key(&self) -> Option<K> {
        self.indices
            .values()
            .filter_map(|index| index.first_key())
            .min()
            .cloned()
    }

    fn latest_key(&self) -> Option<K> {
        self.indices
            .values()
            .filter_map(|index| index.last_key())
            .max()
            .cloned()
    }

    fn first_edge(&self) -> Option<EdgeRef<K, V, E>> {
        self.indices
            .values()
            .filter_map(|index| index.first_entry())
            .min_by(|a, b| a.0.cmp(b.0))
            .and_then(|(_, edges)| edges.first().cloned())
    }

    fn last_edge(&self) -> Option<EdgeRef<K, V, E>> {
        self.indices
            .values()
            .filter_map(|index| index.last_entry())
            .max_by(|a, b| a.0.cmp(b.0))
            .and_then(|(_, edges)| edges.last().cloned())
    }

    fn bounded(&self, range: KeyRange<K>) -> Self {
        let bounds = self.bounds.intersect(&range);
        let mut skeleton = AdjacencyGraph::new();
        let mut indices = FxHashMap::default();

        for (vertex, index) in &self.indices {
            let view = index.restrict(&bounds);
            if view.is_empty() {
                continue;
            }
            for edge in view.values() {
                skeleton.attach(edge.clone(), edge.from.clone(), edge.to.clone(), edge.edge_type);
            }
            indices.insert(vertex.clone(), view);
        }

        debug!(
            "Vertex sub-network {:?}: {} vertices, {} edges",
            bounds,
            skeleton.vertex_count(),
            skeleton.edge_count()
        );

        Self {
            skeleton,
            indices,
            settings: self.settings,
            bounds,
        }
    }
}
