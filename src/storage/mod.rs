//! Keyspace Module
//!
//! The in-memory heart of the server: numbered databases of keyed entries
//! with optional expiration deadlines, a deadline index for the sweeper,
//! and the glob matcher used by KEYS.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                  Keyspace                     │
//! │              (one coarse RwLock)              │
//! │  ┌─────────────────────┐  ┌────────────────┐  │
//! │  │ databases: u8 → Db  │  │ config map     │  │
//! │  │  store + expiry idx │  │ string→string  │  │
//! │  └─────────────────────┘  └────────────────┘  │
//! └───────────────────────────────────────────────┘
//!                      ▲
//!                      │
//!        ┌─────────────┴─────────────┐
//!        │       ExpirySweeper       │
//!        │  (background Tokio task)  │
//!        └───────────────────────────┘
//! ```
//!
//! ## Expiry
//!
//! - **Lazy**: GET removes an expired entry on access
//! - **Active**: the sweeper drains the deadline index every second

pub mod expiry;
mod glob;
pub mod keyspace;

// Re-export commonly used types
pub use expiry::{start_expiry_sweeper, ExpirySweeper, SWEEP_INTERVAL};
pub use keyspace::{now_ms, Database, Keyspace, StoredEntry, DEFAULT_DB};
