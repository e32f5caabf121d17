//! Adjacency skeleton
//!
//! A minimal multigraph that tracks which vertices exist and which edge
//! handles connect them. It knows nothing about keys: the indexed graphs
//! layer their event storage on top of it and use it for incidence,
//! neighbor and degree queries.
//!
//! Parallel edges and self-loops are allowed. Undirected edges are listed
//! as both incoming and outgoing at each endpoint.

use super::error::{GraphError, GraphResult};
use super::types::EdgeType;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use std::fmt::Debug;
use std::hash::Hash;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub(crate) type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Incoming and outgoing edge handles of one vertex
#[derive(Debug, Clone)]
struct Incidence<H> {
    incoming: FxIndexSet<H>,
    outgoing: FxIndexSet<H>,
}

impl<H> Default for Incidence<H> {
    fn default() -> Self {
        Self {
            incoming: FxIndexSet::default(),
            outgoing: FxIndexSet::default(),
        }
    }
}

/// Endpoints and type recorded for an edge handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSlot<V> {
    pub from: V,
    pub to: V,
    pub edge_type: EdgeType,
}

impl<V: PartialEq> EdgeSlot<V> {
    fn same_connection(&self, from: &V, to: &V, edge_type: EdgeType) -> bool {
        if self.edge_type != edge_type {
            return false;
        }
        let same = self.from == *from && self.to == *to;
        match edge_type {
            EdgeType::Directed => same,
            EdgeType::Undirected => same || (self.from == *to && self.to == *from),
        }
    }

    fn opposite<'a>(&'a self, vertex: &V) -> Option<&'a V> {
        if self.from == *vertex {
            Some(&self.to)
        } else if self.to == *vertex {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// Multigraph over vertices `V` and edge handles `H`
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<V, H> {
    /// Vertex -> incident edge handles
    vertices: FxIndexMap<V, Incidence<H>>,

    /// Edge handle -> endpoints
    edges: FxIndexMap<H, EdgeSlot<V>>,
}

impl<V, H> Default for AdjacencyGraph<V, H> {
    fn default() -> Self {
        Self {
            vertices: FxIndexMap::default(),
            edges: FxIndexMap::default(),
        }
    }
}

impl<V, H> AdjacencyGraph<V, H>
where
    V: Eq + Hash + Clone + Debug,
    H: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex, returning false if it was already present
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.vertices.contains_key(&vertex) {
            return false;
        }
        self.vertices.insert(vertex, Incidence::default());
        true
    }

    /// Remove a vertex and every edge incident to it
    ///
    /// Returns the removed edges, or `None` if the vertex was absent.
    pub fn remove_vertex(&mut self, vertex: &V) -> Option<Vec<H>> {
        let incidence = self.vertices.swap_remove(vertex)?;
        let mut incident: FxIndexSet<H> = incidence.incoming;
        incident.extend(incidence.outgoing);

        for edge in &incident {
            if let Some(slot) = self.edges.swap_remove(edge) {
                if let Some(other) = slot.opposite(vertex) {
                    self.detach(other, edge);
                }
            }
        }
        Some(incident.into_iter().collect())
    }

    /// Connect `from` and `to` with `edge`, adding missing endpoints
    ///
    /// Returns false if the edge is already present with the same
    /// endpoints and type. Re-adding a handle with different endpoints is
    /// an [`GraphError::InconsistentEdgeState`].
    pub fn add_edge(&mut self, edge: H, from: V, to: V, edge_type: EdgeType) -> GraphResult<bool> {
        if let Some(slot) = self.edges.get(&edge) {
            if slot.same_connection(&from, &to, edge_type) {
                return Ok(false);
            }
            return Err(GraphError::InconsistentEdgeState {
                edge: format!("{:?}", edge),
                existing: format!("{:?} {} {:?}", slot.from, slot.edge_type, slot.to),
                requested: format!("{:?} {} {:?}", from, edge_type, to),
            });
        }
        self.attach(edge, from, to, edge_type);
        Ok(true)
    }

    /// Insert an edge known to be absent
    pub(crate) fn attach(&mut self, edge: H, from: V, to: V, edge_type: EdgeType) {
        self.add_vertex(from.clone());
        self.add_vertex(to.clone());

        if let Some(incidence) = self.vertices.get_mut(&from) {
            incidence.outgoing.insert(edge.clone());
            if edge_type == EdgeType::Undirected {
                incidence.incoming.insert(edge.clone());
            }
        }
        if let Some(incidence) = self.vertices.get_mut(&to) {
            incidence.incoming.insert(edge.clone());
            if edge_type == EdgeType::Undirected {
                incidence.outgoing.insert(edge.clone());
            }
        }
        self.edges.insert(
            edge,
            EdgeSlot {
                from,
                to,
                edge_type,
            },
        );
    }

    /// Remove an edge, keeping its endpoints
    pub fn remove_edge(&mut self, edge: &H) -> Option<EdgeSlot<V>> {
        let slot = self.edges.swap_remove(edge)?;
        self.detach(&slot.from, edge);
        self.detach(&slot.to, edge);
        Some(slot)
    }

    fn detach(&mut self, vertex: &V, edge: &H) {
        if let Some(incidence) = self.vertices.get_mut(vertex) {
            incidence.incoming.swap_remove(edge);
            incidence.outgoing.swap_remove(edge);
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.vertices.contains_key(vertex)
    }

    pub fn contains_edge(&self, edge: &H) -> bool {
        self.edges.contains_key(edge)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.vertices.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&H, &EdgeSlot<V>)> + '_ {
        self.edges.iter()
    }

    pub fn slot(&self, edge: &H) -> Option<&EdgeSlot<V>> {
        self.edges.get(edge)
    }

    pub fn in_edges(&self, vertex: &V) -> impl Iterator<Item = &H> + '_ {
        self.vertices
            .get(vertex)
            .into_iter()
            .flat_map(|incidence| incidence.incoming.iter())
    }

    pub fn out_edges(&self, vertex: &V) -> impl Iterator<Item = &H> + '_ {
        self.vertices
            .get(vertex)
            .into_iter()
            .flat_map(|incidence| incidence.outgoing.iter())
    }

    /// Incoming and outgoing edges, each listed once
    pub fn incident_edges(&self, vertex: &V) -> Vec<&H> {
        let mut seen: FxIndexSet<&H> = FxIndexSet::default();
        seen.extend(self.in_edges(vertex));
        seen.extend(self.out_edges(vertex));
        seen.into_iter().collect()
    }

    /// Vertices across an incident edge, each listed once
    pub fn neighbors(&self, vertex: &V) -> Vec<V> {
        self.opposites(vertex, self.incident_edges(vertex))
    }

    /// Vertices with an edge into `vertex`
    pub fn predecessors(&self, vertex: &V) -> Vec<V> {
        self.opposites(vertex, self.in_edges(vertex))
    }

    /// Vertices `vertex` has an edge into
    pub fn successors(&self, vertex: &V) -> Vec<V> {
        self.opposites(vertex, self.out_edges(vertex))
    }

    /// Outgoing edges of `from` whose opposite endpoint is `to`
    pub fn find_edge_set(&self, from: &V, to: &V) -> Vec<&H> {
        self.out_edges(from)
            .filter(|edge| {
                self.edges
                    .get(*edge)
                    .and_then(|slot| slot.opposite(from))
                    .map_or(false, |other| other == to)
            })
            .collect()
    }

    fn opposites<'a, I>(&self, vertex: &V, edges: I) -> Vec<V>
    where
        I: IntoIterator<Item = &'a H>,
        H: 'a,
    {
        let mut seen: FxIndexSet<V> = FxIndexSet::default();
        for edge in edges {
            if let Some(other) = self.edges.get(edge).and_then(|slot| slot.opposite(vertex)) {
                seen.insert(other.clone());
            }
        }
        seen.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AdjacencyGraph<u32, &'static str> {
        let mut g = AdjacencyGraph::new();
        g.add_edge("a", 0, 1, EdgeType::Directed).unwrap();
        g.add_edge("b", 1, 2, EdgeType::Undirected).unwrap();
        g.add_edge("c", 0, 1, EdgeType::Directed).unwrap();
        g.add_edge("loop", 2, 2, EdgeType::Directed).unwrap();
        g
    }

    #[test]
    fn test_parallel_edges_and_loops() {
        let g = sample();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 4);

        assert_eq!(g.out_edges(&0).count(), 2);
        assert_eq!(g.in_edges(&1).count(), 3);
        assert_eq!(g.find_edge_set(&0, &1).len(), 2);
        assert!(g.find_edge_set(&1, &0).is_empty());

        // Undirected edge is both incoming and outgoing at each end
        assert!(g.out_edges(&2).any(|e| *e == "b"));
        assert!(g.in_edges(&2).any(|e| *e == "b"));
        assert_eq!(g.find_edge_set(&2, &1), vec![&"b"]);

        assert_eq!(g.successors(&2), vec![1, 2]);
        assert_eq!(g.incident_edges(&2).len(), 2);
    }

    #[test]
    fn test_neighbors() {
        let g = sample();
        assert_eq!(g.neighbors(&1), vec![0, 2]);
        assert_eq!(g.predecessors(&1), vec![0, 2]);
        assert_eq!(g.successors(&1), vec![2]);
        assert!(g.neighbors(&42).is_empty());
    }

    #[test]
    fn test_readd_edge() {
        let mut g = sample();
        assert!(!g.add_edge("a", 0, 1, EdgeType::Directed).unwrap());
        assert!(!g.add_edge("b", 2, 1, EdgeType::Undirected).unwrap());

        let err = g.add_edge("a", 1, 0, EdgeType::Directed).unwrap_err();
        assert!(matches!(err, GraphError::InconsistentEdgeState { .. }));
        assert_eq!(g.edge_count(), 4);

        // Rejected reconnection leaves the recorded endpoints alone
        let slot = g.slot(&"a").unwrap();
        assert_eq!((slot.from, slot.to), (0, 1));
        assert!(g.slot(&"missing").is_none());
    }

    #[test]
    fn test_remove_vertex_drops_incident_edges() {
        let mut g = sample();
        let mut removed = g.remove_vertex(&2).unwrap();
        removed.sort();
        assert_eq!(removed, vec!["b", "loop"]);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 2);
        assert!(g.in_edges(&1).all(|e| *e != "b"));
        assert!(g.remove_vertex(&2).is_none());
    }

    #[test]
    fn test_remove_edge_keeps_vertices() {
        let mut g = sample();
        let slot = g.remove_edge(&"b").unwrap();
        assert_eq!(slot.edge_type, EdgeType::Undirected);
        assert_eq!(g.vertex_count(), 3);
        assert!(g.neighbors(&1).iter().all(|v| *v != 2));
        assert!(g.remove_edge(&"b").is_none());
    }
}
