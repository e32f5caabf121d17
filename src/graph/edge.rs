//! Edge records for the event graph
//!
//! An edge is one timestamped event between two vertices. Records are
//! immutable once inserted and are shared between a graph and every view
//! derived from it through [`EdgeRef`].

use super::error::{GraphError, GraphResult};
use super::types::{DyadKey, EdgeIdentity, EdgeType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// One timestamped event between two vertices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord<K, V, E> {
    /// Event key (edge goes FROM `from` TO `to` at this key)
    pub key: K,

    /// Source vertex
    pub from: V,

    /// Destination vertex
    pub to: V,

    /// Optional payload
    pub value: Option<E>,

    /// Directed or undirected
    pub edge_type: EdgeType,
}

impl<K, V, E> EdgeRecord<K, V, E> {
    pub fn new(key: K, from: V, to: V, edge_type: EdgeType) -> Self {
        Self {
            key,
            from,
            to,
            value: None,
            edge_type,
        }
    }

    pub fn with_value(mut self, value: E) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_directed(&self) -> bool {
        self.edge_type.is_directed()
    }
}

impl<K, V: PartialEq, E> EdgeRecord<K, V, E> {
    /// Check if this edge connects two vertices (in either direction)
    pub fn connects(&self, a: &V, b: &V) -> bool {
        (self.from == *a && self.to == *b) || (self.from == *b && self.to == *a)
    }

    /// Check if this edge goes FROM a specific vertex
    pub fn starts_from(&self, vertex: &V) -> bool {
        self.from == *vertex
    }

    /// Check if this edge goes TO a specific vertex
    pub fn ends_at(&self, vertex: &V) -> bool {
        self.to == *vertex
    }

    pub fn is_incident(&self, vertex: &V) -> bool {
        self.starts_from(vertex) || self.ends_at(vertex)
    }

    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

impl<K, V: Clone, E> EdgeRecord<K, V, E> {
    pub fn endpoints(&self) -> (V, V) {
        (self.from.clone(), self.to.clone())
    }

    /// The vertex pair plus type this edge belongs to
    pub fn dyad_key(&self) -> DyadKey<V> {
        DyadKey::new(self.from.clone(), self.to.clone(), self.edge_type)
    }
}

/// Shared handle to an inserted edge
///
/// Handles to the same insertion always compare equal. Under
/// [`EdgeIdentity::Value`] handles also compare equal when every field of
/// their records matches; under [`EdgeIdentity::Unique`] only the same
/// insertion is equal to itself.
pub struct EdgeRef<K, V, E> {
    record: Arc<EdgeRecord<K, V, E>>,
    identity: EdgeIdentity,
}

impl<K, V, E> EdgeRef<K, V, E> {
    pub fn new(record: EdgeRecord<K, V, E>, identity: EdgeIdentity) -> Self {
        Self {
            record: Arc::new(record),
            identity,
        }
    }

    pub fn record(&self) -> &EdgeRecord<K, V, E> {
        &self.record
    }

    pub fn identity(&self) -> EdgeIdentity {
        self.identity
    }

    /// True when both handles point at the same insertion
    pub fn same_insertion(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }
}

impl<K, V: PartialEq + Clone, E> EdgeRef<K, V, E> {
    /// The endpoint across the edge from `vertex`
    pub fn opposite(&self, vertex: &V) -> GraphResult<V>
    where
        K: fmt::Debug,
        V: fmt::Debug,
        E: fmt::Debug,
    {
        if self.from == *vertex {
            Ok(self.to.clone())
        } else if self.to == *vertex {
            Ok(self.from.clone())
        } else {
            Err(GraphError::NotIncident {
                vertex: format!("{:?}", vertex),
                edge: format!("{:?}", self),
            })
        }
    }
}

impl<K, V, E> Clone for EdgeRef<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            record: Arc::clone(&self.record),
            identity: self.identity,
        }
    }
}

impl<K, V, E> Deref for EdgeRef<K, V, E> {
    type Target = EdgeRecord<K, V, E>;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

impl<K: PartialEq, V: PartialEq, E: PartialEq> PartialEq for EdgeRef<K, V, E> {
    fn eq(&self, other: &Self) -> bool {
        if self.same_insertion(other) {
            return true;
        }
        match (self.identity, other.identity) {
            (EdgeIdentity::Value, EdgeIdentity::Value) => self.record == other.record,
            _ => false,
        }
    }
}

impl<K: Eq, V: Eq, E: Eq> Eq for EdgeRef<K, V, E> {}

impl<K: Hash, V: Hash, E> Hash for EdgeRef<K, V, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.identity {
            EdgeIdentity::Unique => (Arc::as_ptr(&self.record) as usize).hash(state),
            // Payload is left out so that `E` need not be hashable
            EdgeIdentity::Value => {
                self.record.key.hash(state);
                self.record.from.hash(state);
                self.record.to.hash(state);
                self.record.edge_type.hash(state);
            }
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, E: fmt::Debug> fmt::Debug for EdgeRef<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.edge_type {
            EdgeType::Directed => "->",
            EdgeType::Undirected => "--",
        };
        write!(f, "{:?}@{:?}{}{:?}", self.key, self.from, arrow, self.to)?;
        if let Some(value) = &self.value {
            write!(f, " [{:?}]", value)?;
        }
        Ok(())
    }
}

/// One loader tuple, before its endpoints have been validated
///
/// Missing endpoints are rejected with [`GraphError::InvalidEndpoint`];
/// a missing edge type falls back to the graph's default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEvent<K, V, E> {
    pub key: K,
    pub from: Option<V>,
    pub to: Option<V>,
    pub value: Option<E>,
    pub edge_type: Option<EdgeType>,
}

impl<K, V, E> EdgeEvent<K, V, E> {
    pub fn new(key: K, from: Option<V>, to: Option<V>) -> Self {
        Self {
            key,
            from,
            to,
            value: None,
            edge_type: None,
        }
    }

    pub fn between(key: K, from: V, to: V) -> Self {
        Self::new(key, Some(from), Some(to))
    }

    pub fn typed(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = Some(edge_type);
        self
    }

    pub fn with_value(mut self, value: E) -> Self {
        self.value = Some(value);
        self
    }

    /// Validate endpoints and resolve the edge type
    pub fn into_record(self, default_edge_type: EdgeType) -> GraphResult<EdgeRecord<K, V, E>>
    where
        K: fmt::Debug,
    {
        let (from, to) = match (self.from, self.to) {
            (Some(from), Some(to)) => (from, to),
            (None, _) => {
                return Err(GraphError::InvalidEndpoint(format!(
                    "event at key {:?} has no source vertex",
                    self.key
                )))
            }
            (_, None) => {
                return Err(GraphError::InvalidEndpoint(format!(
                    "event at key {:?} has no destination vertex",
                    self.key
                )))
            }
        };
        Ok(EdgeRecord {
            key: self.key,
            from,
            to,
            value: self.value,
            edge_type: self.edge_type.unwrap_or(default_edge_type),
        })
    }
}

impl<K, V, E> From<EdgeRecord<K, V, E>> for EdgeEvent<K, V, E> {
    fn from(record: EdgeRecord<K, V, E>) -> Self {
        Self {
            key: record.key,
            from: Some(record.from),
            to: Some(record.to),
            value: record.value,
            edge_type: Some(record.edge_type),
        }
    }
}
