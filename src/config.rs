//! Graph configuration
//!
//! Selects the indexing strategy and per-graph settings at construction
//! time. Configurations are plain values, usually read from YAML:
//!
//! ```yaml
//! kind: vertex
//! default_edge_type: undirected
//! identity: value
//! snapshot:
//!   compress: true
//!   level: 6
//! ```

use crate::graph::{EdgeIdentity, EdgeType, EdgeValue, EventGraph, EventKey, GraphKind, GraphSettings, VertexId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed YAML or unknown values
    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Snapshot encoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Gzip the snapshot body
    pub compress: bool,

    /// Gzip level, 0-9
    pub level: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            compress: true,
            level: 6,
        }
    }
}

/// Graph construction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphConfig {
    /// Indexing strategy
    pub kind: GraphKind,

    /// Edge type used when an insertion does not name one
    pub default_edge_type: EdgeType,

    /// Equality mode for edge handles
    pub identity: EdgeIdentity,

    /// Snapshot encoding
    pub snapshot: SnapshotConfig,
}

impl GraphConfig {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = Self::from_yaml_str(&fs::read_to_string(path)?)?;
        info!("Loaded graph config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn settings(&self) -> GraphSettings {
        GraphSettings::new(self.default_edge_type, self.identity)
    }

    /// Build an empty graph with this configuration
    pub fn build<K: EventKey, V: VertexId, E: EdgeValue>(&self) -> EventGraph<K, V, E> {
        EventGraph::new(self.kind, self.settings())
    }
}
