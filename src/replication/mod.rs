//! Replication Module
//!
//! Covers the replica side of startup only: the fixed three-frame
//! handshake a replica performs against its configured upstream before the
//! accept loop starts. Ongoing replication of mutations is out of scope.

pub mod handshake;

// Re-export the handshake entry point
pub use handshake::{perform_handshake, HandshakeError};
