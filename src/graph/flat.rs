//! Flat-indexed graph
//!
//! One graph-wide [`MultiIndex`] orders every edge by key, next to a
//! conventional adjacency graph of the realized edges. Sub-networks take a
//! range view of the index and replay every edge in range into a fresh
//! adjacency graph, so extraction costs O(M) in the size of the range.

use super::adjacency::AdjacencyGraph;
use super::edge::{EdgeRecord, EdgeRef};
use super::error::GraphResult;
use super::navigable::{ensure_writable, holds_key, NavigableGraph};
use super::types::{EdgeValue, EventKey, GraphKind, GraphSettings, KeyRange, VertexId};
use crate::index::MultiIndex;
use tracing::{debug, trace};

/// Graph with a single key index over all edges
#[derive(Debug, Clone)]
pub struct FlatGraph<K, V, E> {
    /// Key -> edges stored at that key
    index: MultiIndex<K, EdgeRef<K, V, E>>,

    /// Vertices and realized edges
    skeleton: AdjacencyGraph<V, EdgeRef<K, V, E>>,

    settings: GraphSettings,
    bounds: KeyRange<K>,
}

impl<K: EventKey, V: VertexId, E: EdgeValue> Default for FlatGraph<K, V, E> {
    fn default() -> Self {
        Self::new(GraphSettings::default())
    }
}

impl<K: EventKey, V: VertexId, E: EdgeValue> FlatGraph<K, V, E> {
    pub fn new(settings: GraphSettings) -> Self {
        Self {
            index: MultiIndex::new(),
            skeleton: AdjacencyGraph::new(),
            settings,
            bounds: KeyRange::unbounded(),
        }
    }

    /// Every edge in ascending key order
    pub fn edges_by_key(&self) -> Vec<EdgeRef<K, V, E>> {
        self.index.values().cloned().collect()
    }

    /// Edges stored at exactly `key`
    pub fn edges_at(&self, key: &K) -> Vec<EdgeRef<K, V, E>> {
        self.index.get(key).to_vec()
    }
}

impl<K: EventKey, V: VertexId, E: EdgeValue> NavigableGraph for FlatGraph<K, V, E> {
    type Key = K;
    type Vertex = V;
    type Value = E;

    fn kind(&self) -> GraphKind {
        GraphKind::Flat
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
        for edge in removed {
            self.index.remove(&edge.key, &edge);
        }
        Ok(true)
    }

    fn add_record(&mut self, record: EdgeRecord<K, V, E>) -> GraphResult<bool> {
        ensure_writable(&self.bounds)?;
        let dyad = record.dyad_key();
        if holds_key(self.index.get(&record.key), &record.key, &dyad) {
            trace!("Duplicate edge {:?} at key {:?}", dyad, record.key);
            return Ok(false);
        }

        let from = record.from.clone();
        let to = record.to.clone();
        let edge_type = record.edge_type;
        let key = record.key.clone();
        let edge = EdgeRef::new(record, self.settings.identity);

        if !self.skeleton.add_edge(edge.clone(), from, to, edge_type)? {
            return Ok(false);
        }
        Ok(self.index.put(key, edge))
    }

    fn remove_edge(&mut self, edge: &EdgeRef<K, V, E>) -> GraphResult<bool> {
        ensure_writable(&self.bounds)?;
        if self.skeleton.remove_edge(edge).is_none() {
            return Ok(false);
        }
        Ok(self.index.remove(&edge.key, edge))
    }

    fn clear(&mut self) -> GraphResult<()> {
        ensure_writable(&self.bounds)?;
        self.index = MultiIndex::new();
        self.skeleton.clear();
        Ok(())
    }

    fn vertex_count(&self) -> usize {
        self.skeleton.vertex_count()
    }

    fn edge_count(&self) -> usize {
        self.index.len()
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
        self.index.first_key().cloned()
    }

    fn latest_key(&self) -> Option<K> {
        self.index.last_key().cloned()
    }

    fn first_edge(&self) -> Option<EdgeRef<K, V, E>> {
        self.index
            .first_entry()
            .and_then(|(_, edges)| edges.first().cloned())
    }

    fn last_edge(&self) -> Option<EdgeRef<K, V, E>> {
        self.index
            .last_entry()
            .and_then(|(_, edges)| edges.last().cloned())
    }

    fn bounded(&self, range: KeyRange<K>) -> Self {
        let bounds = self.bounds.intersect(&range);
        let index = self.index.restrict(&bounds);
        let mut skeleton = AdjacencyGraph::new();
        for edge in index.values() {
            skeleton.attach(edge.clone(), edge.from.clone(), edge.to.clone(), edge.edge_type);
        }

        debug!(
            "Flat sub-network {:?}: replayed {} edges over {} vertices",
            bounds,
            index.len(),
            skeleton.vertex_count()
        );

        Self {
            index,
            skeleton,
            settings: self.settings,
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeType;

    type Graph = FlatGraph<u64, char, String>;

    #[test]
    fn test_edges_ordered_by_key() {
        let mut g = Graph::default();
        g.add_edge(30, 'a', 'b').unwrap();
        g.add_edge(10, 'b', 'c').unwrap();
        g.add_edge(20, 'c', 'a').unwrap();
        g.add_edge(10, 'a', 'c').unwrap();

        let keys: Vec<u64> = g.edges_by_key().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![10, 10, 20, 30]);
        assert_eq!(g.edges_at(&10).len(), 2);
        assert_eq!(g.first_edge().map(|e| e.from), Some('b'));
        assert_eq!(g.last_edge().map(|e| e.key), Some(30));
    }

    #[test]
    fn test_payload_round_trip() {
        let mut g = Graph::default();
        g.add_edge_with_value(1, 'a', 'b', "call".to_string()).unwrap();
        let edge = g.find_edge(&'a', &'b').unwrap();
        assert_eq!(edge.value.as_deref(), Some("call"));
        assert_eq!(g.edge_type(&edge), Some(EdgeType::Directed));
    }

    #[test]
    fn test_view_replays_edges() {
        let mut g = Graph::default();
        for (k, from, to) in [(1, 'a', 'b'), (2, 'b', 'c'), (3, 'c', 'd'), (4, 'd', 'a')] {
            g.add_edge(k, from, to).unwrap();
        }
        let view = g.sub_network(2, 4);
        assert_eq!(view.edge_count(), 2);
        assert_eq!(view.vertices(), vec!['b', 'c', 'd']);
        assert_eq!(view.edges().len(), view.edge_count());

        let nested = view.tail_network(3);
        assert_eq!(nested.bounds(), &KeyRange::between(3, 4));
        assert_eq!(nested.edge_count(), 1);
    }
}
