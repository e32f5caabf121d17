//! Core type definitions for the event graph
//!
//! Keys, vertices and payloads are opaque to the graph. The marker traits
//! below collect the bounds each role needs so that the graph types can be
//! written once for every choice of key, vertex and payload.

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::ops::Bound;

/// Ordered event key (typically a timestamp)
pub trait EventKey: Ord + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> EventKey for T where T: Ord + Hash + Clone + Debug + Send + Sync + 'static {}

/// Opaque vertex identity
pub trait VertexId: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> VertexId for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// Optional payload carried by an edge
pub trait EdgeValue: Eq + Clone + Debug + Send + Sync + 'static {}

impl<T> EdgeValue for T where T: Eq + Clone + Debug + Send + Sync + 'static {}

/// Directedness of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    #[default]
    Directed,
    Undirected,
}

impl EdgeType {
    pub fn is_directed(&self) -> bool {
        matches!(self, EdgeType::Directed)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeType::Directed => write!(f, "directed"),
            EdgeType::Undirected => write!(f, "undirected"),
        }
    }
}

/// How two edge handles are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeIdentity {
    /// Equal when endpoints, key, payload and type are equal
    #[default]
    Value,
    /// Every inserted edge is distinct from every other edge object
    Unique,
}

/// Which indexing strategy backs a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    /// Edges grouped per vertex pair and type
    #[default]
    Dyad,
    /// Edges grouped per source vertex
    Vertex,
    /// One graph-wide index plus a materialized adjacency graph
    Flat,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Dyad => write!(f, "dyad"),
            GraphKind::Vertex => write!(f, "vertex"),
            GraphKind::Flat => write!(f, "flat"),
        }
    }
}

/// Per-graph settings, inherited by every view derived from the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphSettings {
    /// Edge type used when an insertion does not name one
    pub default_edge_type: EdgeType,

    /// Equality mode for edge handles
    pub identity: EdgeIdentity,
}

impl GraphSettings {
    pub fn new(default_edge_type: EdgeType, identity: EdgeIdentity) -> Self {
        Self {
            default_edge_type,
            identity,
        }
    }

    pub fn undirected() -> Self {
        Self {
            default_edge_type: EdgeType::Undirected,
            ..Self::default()
        }
    }
}

/// The vertex pair an edge connects, together with its type
///
/// Directed dyads are ordered: `(a, b)` and `(b, a)` are different.
/// Undirected dyads are unordered, so both orientations compare and hash
/// the same.
#[derive(Clone, Serialize, Deserialize)]
pub struct DyadKey<V> {
    first: V,
    second: V,
    edge_type: EdgeType,
}

impl<V> DyadKey<V> {
    pub fn new(first: V, second: V, edge_type: EdgeType) -> Self {
        Self {
            first,
            second,
            edge_type,
        }
    }

    /// Source endpoint as first recorded
    pub fn first(&self) -> &V {
        &self.first
    }

    /// Destination endpoint as first recorded
    pub fn second(&self) -> &V {
        &self.second
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    pub fn is_loop(&self) -> bool
    where
        V: PartialEq,
    {
        self.first == self.second
    }
}

impl<V: Clone> DyadKey<V> {
    /// Unordered form of this pair, regardless of edge type
    pub fn unordered(&self) -> DyadKey<V> {
        DyadKey::new(self.first.clone(), self.second.clone(), EdgeType::Undirected)
    }
}

impl<V: PartialEq> PartialEq for DyadKey<V> {
    fn eq(&self, other: &Self) -> bool {
        if self.edge_type != other.edge_type {
            return false;
        }
        let same = self.first == other.first && self.second == other.second;
        match self.edge_type {
            EdgeType::Directed => same,
            EdgeType::Undirected => {
                same || (self.first == other.second && self.second == other.first)
            }
        }
    }
}

impl<V: Eq> Eq for DyadKey<V> {}

impl<V: Hash> Hash for DyadKey<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.edge_type.hash(state);
        match self.edge_type {
            EdgeType::Directed => {
                self.first.hash(state);
                self.second.hash(state);
            }
            EdgeType::Undirected => {
                // Orientation-free: combine the two endpoint hashes commutatively
                let a = fx_hash(&self.first);
                let b = fx_hash(&self.second);
                state.write_u64(a.wrapping_add(b));
            }
        }
    }
}

impl<V: Debug> Debug for DyadKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.edge_type {
            EdgeType::Directed => "->",
            EdgeType::Undirected => "--",
        };
        write!(f, "{:?}{}{:?}", self.first, arrow, self.second)
    }
}

fn fx_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Half-open key window `[lower, upper)`; an absent side is unbounded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRange<K> {
    pub lower: Option<K>,
    pub upper: Option<K>,
}

impl<K> Default for KeyRange<K> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<K> KeyRange<K> {
    pub fn new(lower: Option<K>, upper: Option<K>) -> Self {
        Self { lower, upper }
    }

    pub fn unbounded() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// `[lower, upper)`
    pub fn between(lower: K, upper: K) -> Self {
        Self::new(Some(lower), Some(upper))
    }

    /// `[lower, ..)`
    pub fn at_least(lower: K) -> Self {
        Self::new(Some(lower), None)
    }

    /// `(.., upper)`
    pub fn below(upper: K) -> Self {
        Self::new(None, Some(upper))
    }

    /// True iff at least one side is set
    pub fn is_bounded(&self) -> bool {
        self.lower.is_some() || self.upper.is_some()
    }

    /// Bounds suitable for `BTreeMap::range`
    pub fn as_bounds(&self) -> (Bound<&K>, Bound<&K>) {
        let lower = match &self.lower {
            Some(k) => Bound::Included(k),
            None => Bound::Unbounded,
        };
        let upper = match &self.upper {
            Some(k) => Bound::Excluded(k),
            None => Bound::Unbounded,
        };
        (lower, upper)
    }
}

impl<K: Ord + Clone> KeyRange<K> {
    pub fn contains(&self, key: &K) -> bool {
        self.lower.as_ref().map_or(true, |lo| key >= lo)
            && self.upper.as_ref().map_or(true, |hi| key < hi)
    }

    /// True when no key can fall inside the window
    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(lo), Some(hi)) => lo >= hi,
            _ => false,
        }
    }

    /// Window covered by both `self` and `other`
    pub fn intersect(&self, other: &KeyRange<K>) -> KeyRange<K> {
        KeyRange {
            lower: tighter(&self.lower, &other.lower, Ordering::Greater),
            upper: tighter(&self.upper, &other.upper, Ordering::Less),
        }
    }
}

fn tighter<K: Ord + Clone>(a: &Option<K>, b: &Option<K>, prefer: Ordering) -> Option<K> {
    match (a, b) {
        (Some(x), Some(y)) => {
            if x.cmp(y) == prefer {
                Some(x.clone())
            } else {
                Some(y.clone())
            }
        }
        (Some(x), None) => Some(x.clone()),
        (None, Some(y)) => Some(y.clone()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_undirected_dyad_is_orientation_free() {
        let a = DyadKey::new(1, 2, EdgeType::Undirected);
        let b = DyadKey::new(2, 1, EdgeType::Undirected);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_directed_dyad_is_ordered() {
        let a = DyadKey::new(1, 2, EdgeType::Directed);
        let b = DyadKey::new(2, 1, EdgeType::Directed);
        assert_ne!(a, b);
        assert_ne!(a, DyadKey::new(1, 2, EdgeType::Undirected));
    }

    #[test]
    fn test_key_range_contains_is_half_open() {
        let range = KeyRange::between(2, 7);
        assert!(!range.contains(&1));
        assert!(range.contains(&2));
        assert!(range.contains(&6));
        assert!(!range.contains(&7));

        assert!(KeyRange::<i32>::unbounded().contains(&i32::MIN));
        assert!(KeyRange::below(5).contains(&4));
        assert!(!KeyRange::at_least(5).contains(&4));
    }

    #[test]
    fn test_key_range_intersect() {
        let outer = KeyRange::between(2, 10);
        assert_eq!(outer.intersect(&KeyRange::between(0, 5)), KeyRange::between(2, 5));
        assert_eq!(outer.intersect(&KeyRange::at_least(4)), KeyRange::between(4, 10));
        assert_eq!(
            KeyRange::<i32>::unbounded().intersect(&KeyRange::below(3)),
            KeyRange::below(3)
        );
        assert!(outer.intersect(&KeyRange::between(12, 20)).is_empty());
    }

    #[test]
    fn test_bounded_flag() {
        assert!(!KeyRange::<u64>::unbounded().is_bounded());
        assert!(KeyRange::at_least(1u64).is_bounded());
        assert!(KeyRange::below(1u64).is_bounded());
    }
}
