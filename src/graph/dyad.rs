//! Dyad-indexed graph
//!
//! Edges are grouped by the vertex pair they connect and their type. Each
//! group (a dyad) owns a [`MultiIndex`] of its edges by key, and a skeleton
//! graph holds one handle per dyad so that incidence and neighbor queries
//! only touch the dyads around a vertex.
//!
//! A sub-network takes a range view of every dyad index; the edge data is
//! shared with the parent and only the skeleton is rebuilt. Dyads with no
//! edge in range are left out of the view.

use super::adjacency::{AdjacencyGraph, FxIndexMap};
use super::edge::{EdgeRecord, EdgeRef};
use super::error::GraphResult;
use super::navigable::{ensure_writable, NavigableGraph};
use super::types::{DyadKey, EdgeValue, EventKey, GraphKind, GraphSettings, KeyRange, VertexId};
use crate::index::MultiIndex;
use tracing::{debug, trace};

type DyadIndex<K, V, E> = MultiIndex<K, EdgeRef<K, V, E>>;

/// Graph with one key index per (vertex pair, edge type)
#[derive(Debug, Clone)]
pub struct DyadGraph<K, V, E> {
    /// Vertices and dyad handles
    skeleton: AdjacencyGraph<V, DyadKey<V>>,

    /// Dyad -> its edges ordered by key
    dyads: FxIndexMap<DyadKey<V>, DyadIndex<K, V, E>>,

    /// Total number of edges across all dyads
    edge_count: usize,

    settings: GraphSettings,
    bounds: KeyRange<K>,
}

impl<K: EventKey, V: VertexId, E: EdgeValue> Default for DyadGraph<K, V, E> {
    fn default() -> Self {
        Self::new(GraphSettings::default())
    }
}

impl<K: EventKey, V: VertexId, E: EdgeValue> DyadGraph<K, V, E> {
    pub fn new(settings: GraphSettings) -> Self {
        Self {
            skeleton: AdjacencyGraph::new(),
            dyads: FxIndexMap::default(),
            edge_count: 0,
            settings,
            bounds: KeyRange::unbounded(),
        }
    }

    /// Number of dyads holding at least one edge
    pub fn dyad_count(&self) -> usize {
        self.dyads.len()
    }

    /// Edges of one dyad in key order
    pub fn dyad_edges(&self, dyad: &DyadKey<V>) -> Vec<EdgeRef<K, V, E>> {
        self.dyads
            .get(dyad)
            .map(|index| index.values().cloned().collect())
            .unwrap_or_default()
    }

    fn collect<'a, I>(&self, handles: I) -> Vec<EdgeRef<K, V, E>>
    where
        I: IntoIterator<Item = &'a DyadKey<V>>,
    {
        handles
            .into_iter()
            .filter_map(|dyad| self.dyads.get(dyad))
            .flat_map(|index| index.values().cloned())
            .collect()
    }
}

impl<K: EventKey, V: VertexId, E: EdgeValue> NavigableGraph for DyadGraph<K, V, E> {
    type Key = K;
    type Vertex = V;
    type Value = E;

    fn kind(&self) -> GraphKind {
        GraphKind::Dyad
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
        for dyad in removed {
            if let Some(index) = self.dyads.swap_remove(&dyad) {
                self.edge_count -= index.len();
            }
        }
        Ok(true)
    }

    fn add_record(&mut self, record: EdgeRecord<K, V, E>) -> GraphResult<bool> {
        ensure_writable(&self.bounds)?;
        let dyad = record.dyad_key();
        if let Some(index) = self.dyads.get(&dyad) {
            if index.contains_key(&record.key) {
                trace!("Duplicate edge {:?} at key {:?}", dyad, record.key);
                return Ok(false);
            }
        }

        if !self.dyads.contains_key(&dyad) {
            self.skeleton.add_edge(
                dyad.clone(),
                record.from.clone(),
                record.to.clone(),
                record.edge_type,
            )?;
            self.dyads.insert(dyad.clone(), MultiIndex::new());
        }

        let key = record.key.clone();
        let edge = EdgeRef::new(record, self.settings.identity);
        let inserted = self
            .dyads
            .get_mut(&dyad)
            .map_or(false, |index| index.put(key, edge));
        if inserted {
            self.edge_count += 1;
        }
        Ok(inserted)
    }

    fn remove_edge(&mut self, edge: &EdgeRef<K, V, E>) -> GraphResult<bool> {
        ensure_writable(&self.bounds)?;
        let dyad = edge.dyad_key();
        let Some(index) = self.dyads.get_mut(&dyad) else {
            return Ok(false);
        };
        if !index.remove(&edge.key, edge) {
            return Ok(false);
        }
        self.edge_count -= 1;

        if index.is_empty() {
            self.dyads.swap_remove(&dyad);
            self.skeleton.remove_edge(&dyad);
        }
        Ok(true)
    }

    fn clear(&mut self) -> GraphResult<()> {
        ensure_writable(&self.bounds)?;
        self.skeleton.clear();
        self.dyads.clear();
        self.edge_count = 0;
        Ok(())
    }

    fn vertex_count(&self) -> usize {
        self.skeleton.vertex_count()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn vertices(&self) -> Vec<V> {
        self.skeleton.vertices().cloned().collect()
    }

    fn edges(&self) -> Vec<EdgeRef<K, V, E>> {
        self.collect(self.dyads.keys())
    }

    fn contains_vertex(&self, vertex: &V) -> bool {
        self.skeleton.contains_vertex(vertex)
    }

    fn contains_edge(&self, edge: &EdgeRef<K, V, E>) -> bool {
        self.dyads
            .get(&edge.dyad_key())
            .map_or(false, |index| index.contains_value(&edge.key, edge))
    }

    fn in_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        self.collect(self.skeleton.in_edges(vertex))
    }

    fn out_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        self.collect(self.skeleton.out_edges(vertex))
    }

    fn incident_edges(&self, vertex: &V) -> Vec<EdgeRef<K, V, E>> {
        self.collect(self.skeleton.incident_edges(vertex))
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
        self.collect(self.skeleton.find_edge_set(from, to))
    }

    fn earliest_key(&self) -> Option<K> {
        self.dyads
            .values()
            .filter_map(|index| index.first_key())
            .min()
            .cloned()
    }

    fn latest_key(&self) -> Option<K> {
        self.dyads
            .values()
            .filter_map(|index| index.last_key())
            .max()
            .cloned()
    }

    fn first_edge(&self) -> Option<EdgeRef<K, V, E>> {
        self.dyads
            .values()
            .filter_map(|index| index.first_entry())
            .min_by(|a, b| a.0.cmp(b.0))
            .and_then(|(_, edges)| edges.first().cloned())
    }

    fn last_edge(&self) -> Option<EdgeRef<K, V, E>> {
        self.dyads
            .values()
            .filter_map(|index| index.last_entry())
            .max_by(|a, b| a.0.cmp(b.0))
            .and_then(|(_, edges)| edges.last().cloned())
    }

    fn bounded(&self, range: KeyRange<K>) -> Self {
        let bounds = self.bounds.intersect(&range);
        let mut skeleton = AdjacencyGraph::new();
        let mut dyads = FxIndexMap::default();
        let mut edge_count = 0;

        for (dyad, index) in &self.dyads {
            let view = index.restrict(&bounds);
            if view.is_empty() {
                continue;
            }
            skeleton.attach(
                dyad.clone(),
                dyad.first().clone(),
                dyad.second().clone(),
                dyad.edge_type(),
            );
            edge_count += view.len();
            dyads.insert(dyad.clone(), view);
        }

        debug!(
            "Dyad sub-network {:?}: {} of {} dyads, {} edges",
            bounds,
            dyads.len(),
            self.dyads.len(),
            edge_count
        );

        Self {
            skeleton,
            dyads,
            edge_count,
            settings: self.settings,
            bounds,
        }
    }

    fn pairs(&self) -> Vec<(V, V)> {
        let mut seen = rustc_hash::FxHashSet::default();
        self.dyads
            .keys()
            .filter(|dyad| seen.insert(dyad.unordered()))
            .map(|dyad| (dyad.first().clone(), dyad.second().clone()))
            .collect()
    }
}
