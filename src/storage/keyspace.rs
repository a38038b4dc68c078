//! Keyspace Engine
//!
//! The keyspace is a map of numbered databases, each holding keyed entries
//! with an optional expiration deadline, plus a secondary index ordered by
//! deadline that the background sweeper drains.
//!
//! ## Concurrency Model
//!
//! A single coarse `RwLock` guards every database and the configuration
//! map. Each command takes the lock exactly once, does its reads and writes,
//! and releases it; the lock is never held across socket I/O.
//!
//! ## Expiration
//!
//! Deadlines are absolute wall-clock milliseconds since the Unix epoch, so
//! they survive a snapshot round-trip unchanged. Expired entries are
//! reclaimed two ways:
//! 1. **Lazy**: a GET on an expired key removes it and reports a miss
//! 2. **Active**: the background sweeper drains the deadline index
//!
//! The index holds `(deadline, key)` pairs, so two keys sharing a deadline
//! never collide.

use crate::protocol::Value;
use crate::snapshot::{self, SnapshotError};
use crate::storage::glob::GlobPattern;
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// The database commands operate on. Other databases are only reachable
/// through snapshot load and save.
pub const DEFAULT_DB: u8 = 0;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A stored value with its optional expiration deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    /// The value as it arrived on the wire (or out of a snapshot)
    pub value: Value,
    /// Deadline in epoch milliseconds; `None` means the entry never expires
    pub expires_at: Option<u64>,
}

/// One database: a key table plus the deadline index over it.
///
/// Invariants, maintained by every mutation:
/// - an entry with `expires_at = Some(d)` has exactly the pair `(d, key)`
///   in `expiry_index`
/// - every `(d, key)` in `expiry_index` points at a live entry whose
///   deadline is `d`
#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    pub id: u8,
    pub store: HashMap<String, StoredEntry>,
    pub expiry_index: BTreeSet<(u64, String)>,
}

impl Database {
    /// Creates an empty database.
    pub fn new(id: u8) -> Self {
        Self {
            id,
            store: HashMap::new(),
            expiry_index: BTreeSet::new(),
        }
    }

    /// Inserts or overwrites an entry, keeping the deadline index in sync.
    ///
    /// An overwrite drops the previous deadline pair, so no orphan is left
    /// behind when an expiring entry is replaced by a persistent one.
    pub fn insert(&mut self, key: String, value: Value, expires_at: Option<u64>) {
        if let Some(old) = self.store.get(&key) {
            if let Some(old_deadline) = old.expires_at {
                self.expiry_index.remove(&(old_deadline, key.clone()));
            }
        }
        if let Some(deadline) = expires_at {
            self.expiry_index.insert((deadline, key.clone()));
        }
        self.store.insert(key, StoredEntry { value, expires_at });
    }
}

/// The shared keyspace: all databases plus the configuration map, behind
/// one coarse lock.
///
/// # Thread Safety
///
/// Designed to be wrapped in an `Arc` and shared across all connection
/// tasks and the sweeper. All operations are thread-safe.
///
/// # Example
///
/// ```
/// use emberkv::storage::Keyspace;
/// use emberkv::protocol::Value;
/// use std::collections::HashMap;
///
/// let keyspace = Keyspace::new(HashMap::new());
/// keyspace.set("name".to_string(), Value::bulk("ember"), None);
/// assert_eq!(keyspace.get("name"), Some(Value::bulk("ember")));
/// ```
#[derive(Debug)]
pub struct Keyspace {
    inner: RwLock<KeyspaceInner>,
}

#[derive(Debug)]
struct KeyspaceInner {
    databases: HashMap<u8, Database>,
    config: HashMap<String, String>,
}

impl Keyspace {
    /// Creates a keyspace with a single empty default database.
    pub fn new(config: HashMap<String, String>) -> Self {
        Self::with_databases(config, HashMap::new())
    }

    /// Creates a keyspace from databases restored out of a snapshot.
    ///
    /// The default database is created empty when the snapshot did not
    /// contain one.
    pub fn with_databases(
        config: HashMap<String, String>,
        mut databases: HashMap<u8, Database>,
    ) -> Self {
        databases
            .entry(DEFAULT_DB)
            .or_insert_with(|| Database::new(DEFAULT_DB));
        Self {
            inner: RwLock::new(KeyspaceInner { databases, config }),
        }
    }

    /// Stores an entry in the default database, replacing any previous one.
    pub fn set(&self, key: String, value: Value, expires_at: Option<u64>) {
        let mut inner = self.inner.write().unwrap();
        inner
            .databases
            .entry(DEFAULT_DB)
            .or_insert_with(|| Database::new(DEFAULT_DB))
            .insert(key, value, expires_at);
    }

    /// Looks up a key in the default database.
    ///
    /// Returns `None` for a missing key. An entry whose deadline has passed
    /// is removed together with its index pair and reported as missing
    /// (lazy expiration).
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = now_ms();
        let mut inner = self.inner.write().unwrap();
        let db = inner.databases.get_mut(&DEFAULT_DB)?;

        let entry = db.store.get(key)?;
        match entry.expires_at {
            Some(deadline) if deadline < now => {
                db.expiry_index.remove(&(deadline, key.to_string()));
                db.store.remove(key);
                None
            }
            _ => Some(entry.value.clone()),
        }
    }

    /// Returns every live key in the default database matching the glob
    /// pattern. Entries whose deadline has passed are filtered out even if
    /// the sweeper has not reclaimed them yet.
    pub fn keys(&self, pattern: &str) -> Vec<String> {
        let now = now_ms();
        let pattern = GlobPattern::new(pattern);
        let inner = self.inner.read().unwrap();

        match inner.databases.get(&DEFAULT_DB) {
            Some(db) => db
                .store
                .iter()
                .filter(|(_, entry)| entry.expires_at.map_or(true, |d| d >= now))
                .filter(|(key, _)| pattern.matches(key))
                .map(|(key, _)| key.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of entries in the default database, expired or not.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap();
        inner
            .databases
            .get(&DEFAULT_DB)
            .map_or(0, |db| db.store.len())
    }

    /// Returns true if the default database holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads a configuration entry.
    pub fn config_get(&self, name: &str) -> Option<String> {
        let inner = self.inner.read().unwrap();
        inner.config.get(name).cloned()
    }

    /// Writes a configuration entry.
    pub fn config_set(&self, name: String, value: String) {
        let mut inner = self.inner.write().unwrap();
        inner.config.insert(name, value);
    }

    /// Clones the whole configuration map under a single lock acquisition.
    pub fn config_all(&self) -> HashMap<String, String> {
        let inner = self.inner.read().unwrap();
        inner.config.clone()
    }

    /// Reclaims expired entries from every database.
    ///
    /// Walks the ordered prefix of each deadline index that lies before
    /// now. The index pair is always removed; the entry itself only when it
    /// still carries that exact deadline (it may have been overwritten with
    /// a new one since the pair was written). Idempotent with the lazy
    /// expiration done by GET.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> u64 {
        let now = now_ms();
        let mut inner = self.inner.write().unwrap();
        let mut removed = 0u64;

        for db in inner.databases.values_mut() {
            let due: Vec<(u64, String)> = db
                .expiry_index
                .iter()
                .take_while(|(deadline, _)| *deadline < now)
                .cloned()
                .collect();

            for (deadline, key) in due {
                db.expiry_index.remove(&(deadline, key.clone()));
                if db.store.get(&key).map(|e| e.expires_at) == Some(Some(deadline)) {
                    db.store.remove(&key);
                    removed += 1;
                }
            }
        }

        removed
    }

    /// Writes all databases and the configuration map to the snapshot file
    /// at `<dir>/<dbfilename>`.
    pub fn save(&self) -> Result<(), SnapshotError> {
        let inner = self.inner.read().unwrap();
        let path = snapshot::snapshot_path(
            inner.config.get("dir").map(String::as_str),
            inner.config.get("dbfilename").map(String::as_str),
        );
        snapshot::save(&path, &inner.config, &inner.databases)
    }
}
