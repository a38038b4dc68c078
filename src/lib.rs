//! # emberkv - An In-Memory Key-Value Store
//!
//! emberkv is a Redis-compatible, single-node, in-memory key-value store
//! written in Rust. It speaks the RESP wire protocol over TCP, persists its
//! contents to a binary snapshot file, and can introduce itself to an
//! upstream server as a replica at startup.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            emberkv                              │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐          │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │          │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │          │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘          │
//! │                                               │                 │
//! │  ┌─────────────┐                              ▼                 │
//! │  │   RESP      │    ┌──────────────────────────────────────┐    │
//! │  │   Parser    │    │              Keyspace                │    │
//! │  └─────────────┘    │   databases + deadline index +       │    │
//! │                     │   config map (one coarse lock)       │    │
//! │  ┌─────────────┐    └──────────────────────────────────────┘    │
//! │  │  Snapshot   │           ▲                ▲                   │
//! │  │   Codec     │───────────┘                │                   │
//! │  └─────────────┘            ┌───────────────┴───────────┐       │
//! │                             │       ExpirySweeper       │       │
//! │                             │  (background Tokio task)  │       │
//! │                             └───────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **RESP protocol**: nine value variants with recursive arrays, parsed
//!   by a streaming framer that handles pipelining and split frames
//! - **Expiration**: per-key deadlines with lazy reclamation on read plus
//!   an active background sweeper
//! - **Persistence**: a compact binary snapshot with a CRC64 trailer,
//!   written by SAVE and loaded at startup
//! - **Replication**: the replica side of the startup handshake against a
//!   configured upstream
//!
//! ## Supported Commands
//!
//! - `PING`, `ECHO message`, `INFO [section]`
//! - `SET key value [EX seconds | PX milliseconds]`, `GET key`
//! - `KEYS pattern`
//! - `CONFIG GET name`, `CONFIG SET name value`
//! - `SAVE`
//!
//! ## Module Overview
//!
//! - [`protocol`]: RESP parser and value types
//! - [`storage`]: keyspace, deadline index, glob matcher, expiry sweeper
//! - [`snapshot`]: snapshot file encoder/decoder
//! - [`commands`]: command dispatch and handlers
//! - [`connection`]: client connection management
//! - [`replication`]: replica startup handshake
//! - [`config`]: CLI options and the configuration map

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod replication;
pub mod snapshot;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{ParseError, RespParser, Value};
pub use storage::{start_expiry_sweeper, ExpirySweeper, Keyspace};

/// The default port the server listens on (same as Redis)
pub const DEFAULT_PORT: u16 = 6379;

/// The default host the server binds to: all interfaces
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Version of emberkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
