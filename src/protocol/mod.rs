//! RESP Protocol Implementation
//!
//! This module implements the wire codec: a streaming parser for incoming
//! frames and a serializer for outgoing replies.
//!
//! ## Overview
//!
//! RESP is a line-oriented, binary-safe protocol. Every frame starts with a
//! one-byte type tag; nine value variants exist, and arrays nest recursively.
//!
//! ## Modules
//!
//! - `types`: the [`Value`] enum, serialization, and reply builders
//! - `parser`: incremental parser for incoming frames
//!
//! ## Example
//!
//! ```ignore
//! use emberkv::protocol::{parse_message, Value};
//!
//! let data = b"*2\r\n$4\r\nECHO\r\n$3\r\nhey\r\n";
//! let (value, consumed) = parse_message(data).unwrap().unwrap();
//!
//! let reply = Value::bulk("hey");
//! let bytes = reply.serialize();
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{parse_message, ParseError, ParseResult, RespParser};
pub use types::Value;
