//! Snapshot Persistence
//!
//! This module reads and writes the binary snapshot file that carries the
//! full keyspace across restarts: a magic header, configuration metadata,
//! one section per database with optional per-key expiry markers, and a
//! CRC64 trailer. See [`codec`] for the byte-level layout.
//!
//! Loading is strict: a bad checksum, truncated field, or unknown byte
//! aborts with an error and the server starts over with empty databases.
//! Saving builds the whole file in memory and renames it into place.

pub mod codec;

// Re-export commonly used items
pub use codec::{decode, encode, load, save, snapshot_path, SnapshotError};
