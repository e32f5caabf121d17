//! Monolithic graph snapshots
//!
//! A snapshot is a single binary blob holding the whole graph:
//!
//! ```text
//! +--------+---------+-------+--------------------------------+
//! | "EVGS" | version | flags | bincode body (gzip if flag 0)  |
//! +--------+---------+-------+--------------------------------+
//! ```
//!
//! The body records the strategy, settings, bounds, vertices and edge
//! records. Decoding replays the records into a fresh graph of the same
//! strategy and re-applies the bounds, giving an equivalent graph that
//! shares nothing with the one that was encoded.

use crate::config::SnapshotConfig;
use crate::graph::{
    EdgeRecord, EdgeValue, EventGraph, EventKey, GraphError, GraphKind, GraphSettings, KeyRange,
    NavigableGraph, VertexId,
};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

const MAGIC: &[u8; 4] = b"EVGS";
const FORMAT_VERSION: u8 = 1;
const FLAG_GZIP: u8 = 0b0000_0001;
const HEADER_LEN: usize = MAGIC.len() + 2;

/// Snapshot errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Header does not start with the snapshot magic
    #[error("Not a graph snapshot")]
    BadMagic,

    /// Written by an incompatible format version
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u8),

    /// Replaying the stored edges failed
    #[error("Graph rebuild failed: {0}")]
    Graph(#[from] GraphError),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Serialize, Deserialize)]
struct SnapshotBody<K, V, E> {
    kind: GraphKind,
    settings: GraphSettings,
    bounds: KeyRange<K>,
    vertices: Vec<V>,
    edges: Vec<EdgeRecord<K, V, E>>,
}

/// Encode a graph (or view) into a snapshot blob
pub fn encode<G>(graph: &G, config: &SnapshotConfig) -> SnapshotResult<Vec<u8>>
where
    G: NavigableGraph,
    G::Key: Serialize,
    G::Vertex: Serialize,
    G::Value: Serialize,
{
    let body = SnapshotBody {
        kind: graph.kind(),
        settings: *graph.settings(),
        bounds: graph.bounds().clone(),
        vertices: graph.vertices(),
        edges: graph
            .edges()
            .iter()
            .map(|edge| edge.record().clone())
            .collect(),
    };

    let flags = if config.compress { FLAG_GZIP } else { 0 };
    let mut out = Vec::with_capacity(HEADER_LEN);
    out.extend_from_slice(MAGIC);
    out.push(FORMAT_VERSION);
    out.push(flags);

    if config.compress {
        let mut encoder = GzEncoder::new(&mut out, Compression::new(config.level.min(9)));
        bincode::serialize_into(&mut encoder, &body)?;
        encoder.finish()?;
    } else {
        bincode::serialize_into(&mut out, &body)?;
    }

    info!(
        "Encoded {} snapshot: {} vertices, {} edges, {} bytes",
        body.kind,
        body.vertices.len(),
        body.edges.len(),
        out.len()
    );
    Ok(out)
}

/// Decode a snapshot blob into a graph of the recorded strategy
pub fn decode<K, V, E>(bytes: &[u8]) -> SnapshotResult<EventGraph<K, V, E>>
where
    K: EventKey + DeserializeOwned,
    V: VertexId + DeserializeOwned,
    E: EdgeValue + DeserializeOwned,
{
    if bytes.len() < HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    let version = bytes[MAGIC.len()];
    if version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }
    let flags = bytes[MAGIC.len() + 1];
    let payload = &bytes[HEADER_LEN..];

    let body: SnapshotBody<K, V, E> = if flags & FLAG_GZIP != 0 {
        bincode::deserialize_from(GzDecoder::new(payload))?
    } else {
        bincode::deserialize(payload)?
    };

    let graph = rebuild(body)?;
    info!(
        "Decoded {} snapshot: {} vertices, {} edges",
        graph.kind(),
        graph.vertex_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn rebuild<K, V, E>(body: SnapshotBody<K, V, E>) -> SnapshotResult<EventGraph<K, V, E>>
where
    K: EventKey,
    V: VertexId,
    E: EdgeValue,
{
    let mut graph = EventGraph::new(body.kind, body.settings);
    for vertex in body.vertices {
        graph.add_vertex(vertex)?;
    }
    let mut duplicates = 0;
    for record in body.edges {
        if !graph.add_record(record)? {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        debug!("Skipped {} duplicate records while rebuilding", duplicates);
    }

    if body.bounds.is_bounded() {
        graph = graph.bounded(body.bounds);
    }
    Ok(graph)
}

/// Encode a graph and write it to `path`
pub fn write_file<G>(graph: &G, path: impl AsRef<Path>, config: &SnapshotConfig) -> SnapshotResult<()>
where
    G: NavigableGraph,
    G::Key: Serialize,
    G::Vertex: Serialize,
    G::Value: Serialize,
{
    let bytes = encode(graph, config)?;
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    debug!("Wrote snapshot to {:?}", path.as_ref());
    Ok(())
}

/// Read and decode the snapshot at `path`
pub fn read_file<K, V, E>(path: impl AsRef<Path>) -> SnapshotResult<EventGraph<K, V, E>>
where
    K: EventKey + DeserializeOwned,
    V: VertexId + DeserializeOwned,
    E: EdgeValue + DeserializeOwned,
{
    let mut bytes = Vec::new();
    BufReader::new(File::open(path.as_ref())?).read_to_end(&mut bytes)?;
    decode(&bytes)
}
