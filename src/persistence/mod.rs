//! Persistence layer
//!
//! Graphs are saved and restored whole, as monolithic snapshots. There is
//! no incremental or streaming format.

pub mod snapshot;

pub use snapshot::{decode, encode, read_file, write_file, SnapshotError, SnapshotResult};
