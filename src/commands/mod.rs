//! Command Processing Module
//!
//! This module receives parsed RESP requests, validates them, executes them
//! against the keyspace, and produces replies.
//!
//! ## Architecture
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  RESP Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Dispatch     │
//! │  - Validate     │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Keyspace     │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `PING`, `ECHO`, `INFO`
//! - `SET` (with `EX`/`PX`), `GET`, `KEYS`
//! - `CONFIG GET`, `CONFIG SET`
//! - `SAVE`

pub mod handler;

// Re-export the main command handler
pub use handler::CommandHandler;
