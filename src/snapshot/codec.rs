//! Snapshot file encoder and decoder.
//!
//! The on-disk layout, in order:
//!
//! 1. Magic: the nine ASCII bytes `REDIS0011`
//! 2. Metadata: zero or more records, each `0xFA` + length-prefixed key +
//!    length-prefixed value
//! 3. Database sections, each:
//!    - `0xFE` + one-byte database id
//!    - `0xFB` + length-encoded entry count + length-encoded expiry count
//!    - that many key entries, each optionally prefixed by an expiry marker
//! 4. End marker `0xFF`
//! 5. Trailer: 8-byte little-endian CRC64 (ECMA) over everything before it
//!
//! A key entry is: optional `0xFD` + 4 LE bytes (expiry in epoch seconds)
//! or `0xFC` + 8 LE bytes (epoch milliseconds), then the value-type byte
//! (`0x00` = string; everything else is reserved and rejected), then the
//! length-prefixed key, then the length-prefixed value.
//!
//! ## Length encoding
//!
//! The two high bits of the first byte discriminate:
//!
//! | prefix | meaning                                         |
//! |--------|-------------------------------------------------|
//! | `00`   | low 6 bits are the length (0-63)                |
//! | `01`   | 14-bit length: `((first & 0x3F) << 8) \| second`|
//! | `10`   | `0x80` + 4-byte little-endian int32 length      |
//! | `11`   | not a length: an inline integer string          |
//!
//! `0xC0`/`0xC1`/`0xC2` introduce 1-, 2-, 4-byte little-endian signed
//! integers where a string is expected; the decoder hands back their
//! decimal form. Saving re-encodes such values as plain length-prefixed
//! strings, so the inline form is accepted but never produced.

use crate::protocol::Value;
use crate::storage::keyspace::{now_ms, Database};
use bytes::Bytes;
use crc64::crc64;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Magic header identifying the snapshot format.
pub const MAGIC: &[u8] = b"REDIS0011";

const OP_METADATA: u8 = 0xFA;
const OP_RESIZE: u8 = 0xFB;
const OP_EXPIRE_MS: u8 = 0xFC;
const OP_EXPIRE_S: u8 = 0xFD;
const OP_SELECT_DB: u8 = 0xFE;
const OP_EOF: u8 = 0xFF;

/// Value-type byte for string payloads. All other type bytes are reserved.
const TYPE_STRING: u8 = 0x00;

/// Errors raised while reading or writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Underlying filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the magic header
    #[error("invalid magic header")]
    BadMagic,

    /// The file ended in the middle of a field
    #[error("truncated snapshot")]
    UnexpectedEof,

    /// The CRC64 trailer does not match the file contents
    #[error("checksum mismatch: expected {expected:016x}, computed {actual:016x}")]
    ChecksumMismatch { expected: u64, actual: u64 },

    /// A length prefix used the reserved `11` discriminator where a plain
    /// length is required
    #[error("invalid length prefix: {0:#04x}")]
    BadLengthPrefix(u8),

    /// A key entry used a reserved value-type byte
    #[error("unsupported value type: {0:#04x}")]
    UnsupportedValueType(u8),

    /// The expiry markers seen in a database section do not match its
    /// declared count
    #[error("expiry marker count {found} does not match declared {declared}")]
    ExpiryCountMismatch { declared: usize, found: usize },

    /// A byte that fits no production of the format grammar
    #[error("unexpected byte {0:#04x} in snapshot")]
    UnexpectedByte(u8),

    /// Arrays cannot be written into a snapshot
    #[error("value cannot be written to a snapshot")]
    UnsupportedValue,
}

/// Resolves the snapshot file path from the `dir` and `dbfilename`
/// configuration entries, defaulting to `./dump.rdb`.
pub fn snapshot_path(dir: Option<&str>, dbfilename: Option<&str>) -> PathBuf {
    let dir = match dir {
        Some(d) if !d.is_empty() => d,
        _ => ".",
    };
    let file = match dbfilename {
        Some(f) if !f.is_empty() => f,
        _ => "dump.rdb",
    };
    Path::new(dir).join(file)
}

/// Reads and decodes the snapshot at `path`.
pub fn load(
    path: &Path,
) -> Result<(HashMap<String, String>, HashMap<u8, Database>), SnapshotError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Encodes and writes a snapshot to `path`.
///
/// The bytes are written to a sibling temp file first and renamed into
/// place, so a crash mid-write never leaves a torn snapshot behind.
pub fn save(
    path: &Path,
    metadata: &HashMap<String, String>,
    databases: &HashMap<u8, Database>,
) -> Result<(), SnapshotError> {
    let bytes = encode(metadata, databases)?;

    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

/// Serializes the configuration map and databases into snapshot bytes,
/// CRC64 trailer included.
pub fn encode(
    metadata: &HashMap<String, String>,
    databases: &HashMap<u8, Database>,
) -> Result<Vec<u8>, SnapshotError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(MAGIC);

    for (key, value) in metadata {
        buf.push(OP_METADATA);
        encode_string(&mut buf, key.as_bytes());
        encode_string(&mut buf, value.as_bytes());
    }

    for (id, db) in databases {
        buf.push(OP_SELECT_DB);
        buf.push(*id);
        buf.push(OP_RESIZE);

        let expiry_count = db
            .store
            .values()
            .filter(|entry| entry.expires_at.is_some())
            .count();
        encode_length(&mut buf, db.store.len());
        encode_length(&mut buf, expiry_count);

        for (key, entry) in &db.store {
            if let Some(deadline) = entry.expires_at {
                buf.push(OP_EXPIRE_MS);
                buf.extend_from_slice(&(deadline as i64).to_le_bytes());
            }
            buf.push(TYPE_STRING);
            encode_string(&mut buf, key.as_bytes());
            encode_string(&mut buf, &value_bytes(&entry.value)?);
        }
    }

    buf.push(OP_EOF);

    let checksum = crc64(0, &buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

/// Decodes snapshot bytes into the configuration metadata and databases.
///
/// The CRC64 trailer is verified before anything else is looked at. An
/// entry whose deadline already passed is kept as an empty bulk string with
/// no deadline and no index pair; everything else is stored as decoded and
/// indexed when it carries a deadline.
pub fn decode(
    bytes: &[u8],
) -> Result<(HashMap<String, String>, HashMap<u8, Database>), SnapshotError> {
    if bytes.len() < MAGIC.len() + 8 {
        return Err(SnapshotError::UnexpectedEof);
    }

    let (body, trailer) = bytes.split_at(bytes.len() - 8);
    let expected = u64::from_le_bytes(trailer.try_into().unwrap());
    let actual = crc64(0, body);
    if expected != actual {
        return Err(SnapshotError::ChecksumMismatch { expected, actual });
    }

    if &body[..MAGIC.len()] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }

    let mut r = Reader::new(&body[MAGIC.len()..]);
    let now = now_ms();

    let mut metadata = HashMap::new();
    while r.peek()? == OP_METADATA {
        r.u8()?;
        let key = decode_string(&mut r)?;
        let value = decode_string(&mut r)?;
        metadata.insert(key, value);
    }

    let mut databases = HashMap::new();
    while r.peek()? == OP_SELECT_DB {
        r.u8()?;
        let id = r.u8()?;
        let mut db = Database::new(id);

        let marker = r.u8()?;
        if marker != OP_RESIZE {
            return Err(SnapshotError::UnexpectedByte(marker));
        }
        let table_size = decode_length(&mut r)?;
        let declared_expiry = decode_length(&mut r)?;

        let mut expiry_markers = 0usize;
        for _ in 0..table_size {
            let deadline = match r.peek()? {
                OP_EXPIRE_S => {
                    r.u8()?;
                    let raw: [u8; 4] = r.take(4)?.try_into().unwrap();
                    let seconds = i32::from_le_bytes(raw);
                    expiry_markers += 1;
                    Some((seconds as i64 * 1000).max(0) as u64)
                }
                OP_EXPIRE_MS => {
                    r.u8()?;
                    let raw: [u8; 8] = r.take(8)?.try_into().unwrap();
                    let millis = i64::from_le_bytes(raw);
                    expiry_markers += 1;
                    Some(millis.max(0) as u64)
                }
                _ => None,
            };

            let value_type = r.u8()?;
            if value_type != TYPE_STRING {
                return Err(SnapshotError::UnsupportedValueType(value_type));
            }

            let key = decode_string(&mut r)?;
            let raw_value = decode_string(&mut r)?;

            match deadline {
                Some(d) if d < now => {
                    // Dead on arrival: keep the key with an empty bulk
                    // value, outside the expiry index
                    db.insert(key, Value::bulk(Bytes::new()), None);
                }
                _ => db.insert(key, promote_value(raw_value), deadline),
            }
        }

        if expiry_markers != declared_expiry {
            return Err(SnapshotError::ExpiryCountMismatch {
                declared: declared_expiry,
                found: expiry_markers,
            });
        }

        databases.insert(id, db);
    }

    let eof = r.u8()?;
    if eof != OP_EOF {
        return Err(SnapshotError::UnexpectedByte(eof));
    }
    if !r.is_empty() {
        return Err(SnapshotError::UnexpectedByte(r.peek()?));
    }

    Ok((metadata, databases))
}

/// A decoded string is promoted to the narrowest scalar it parses as:
/// integer, then double. The literals `"1"` and `"0"` stay bulk strings
/// (the format reserves boolean payload bytes that collide with section
/// markers, so booleans are never materialized). Everything else stays a
/// bulk string too.
fn promote_value(s: String) -> Value {
    if s == "1" || s == "0" {
        return Value::BulkString(Bytes::from(s));
    }
    if let Ok(n) = s.parse::<i64>() {
        return Value::Integer(n);
    }
    if let Ok(d) = s.parse::<f64>() {
        return Value::Double(d);
    }
    Value::BulkString(Bytes::from(s))
}

/// The textual payload a value is written to disk as.
fn value_bytes(value: &Value) -> Result<Vec<u8>, SnapshotError> {
    match value {
        Value::SimpleString(s) | Value::Error(s) => Ok(s.clone().into_bytes()),
        Value::BulkString(b) => Ok(b.to_vec()),
        Value::Integer(n) | Value::BigNumber(n) => Ok(n.to_string().into_bytes()),
        Value::Double(d) => Ok(d.to_string().into_bytes()),
        Value::Boolean(b) => Ok(if *b { b"1".to_vec() } else { b"0".to_vec() }),
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Err(SnapshotError::UnsupportedValue),
    }
}

fn encode_length(buf: &mut Vec<u8>, len: usize) {
    if len < 64 {
        buf.push(len as u8);
    } else if len < 16384 {
        buf.push(0x40 | (len >> 8) as u8);
        buf.push((len & 0xFF) as u8);
    } else {
        buf.push(0x80);
        buf.extend_from_slice(&(len as u32).to_le_bytes());
    }
}

fn encode_string(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_length(buf, bytes.len());
    buf.extend_from_slice(bytes);
}

fn decode_length(r: &mut Reader<'_>) -> Result<usize, SnapshotError> {
    let first = r.u8()?;
    match first >> 6 {
        0b00 => Ok((first & 0x3F) as usize),
        0b01 => {
            let second = r.u8()?;
            Ok((((first & 0x3F) as usize) << 8) | second as usize)
        }
        0b10 => {
            let raw: [u8; 4] = r.take(4)?.try_into().unwrap();
            let len = i32::from_le_bytes(raw);
            if len < 0 {
                return Err(SnapshotError::BadLengthPrefix(first));
            }
            Ok(len as usize)
        }
        _ => Err(SnapshotError::BadLengthPrefix(first)),
    }
}

/// Decodes a length-prefixed string, transparently expanding the inline
/// integer encodings to their decimal forms.
fn decode_string(r: &mut Reader<'_>) -> Result<String, SnapshotError> {
    let first = r.peek()?;
    if first >> 6 == 0b11 {
        r.u8()?;
        return match first {
            0xC0 => {
                let raw = r.u8()?;
                Ok((raw as i8).to_string())
            }
            0xC1 => {
                let raw: [u8; 2] = r.take(2)?.try_into().unwrap();
                Ok(i16::from_le_bytes(raw).to_string())
            }
            0xC2 => {
                let raw: [u8; 4] = r.take(4)?.try_into().unwrap();
                Ok(i32::from_le_bytes(raw).to_string())
            }
            other => Err(SnapshotError::BadLengthPrefix(other)),
        };
    }

    let len = decode_length(r)?;
    let raw = r.take(len)?;
    Ok(String::from_utf8_lossy(raw).to_string())
}

/// Bounds-checked cursor over the snapshot body.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn peek(&self) -> Result<u8, SnapshotError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(SnapshotError::UnexpectedEof)
    }

    fn u8(&mut self) -> Result<u8, SnapshotError> {
        let byte = self.peek()?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SnapshotError> {
        if self.pos + n > self.buf.len() {
            return Err(SnapshotError::UnexpectedEof);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keyspace::DEFAULT_DB;

    fn single_db(db: Database) -> HashMap<u8, Database> {
        let mut databases = HashMap::new();
        databases.insert(db.id, db);
        databases
    }

    /// Appends the CRC64 trailer to a hand-built snapshot body.
    fn finish(mut body: Vec<u8>) -> Vec<u8> {
        let checksum = crc64(0, &body);
        body.extend_from_slice(&checksum.to_le_bytes());
        body
    }

    #[test]
    fn test_snapshot_starts_with_magic() {
        let bytes = encode(&HashMap::new(), &HashMap::new()).unwrap();
        assert_eq!(&bytes[..9], b"REDIS0011");
    }

    #[test]
    fn test_trailer_is_crc64_of_preceding_bytes() {
        let mut db = Database::new(DEFAULT_DB);
        db.insert("pear".to_string(), Value::bulk("banana"), None);
        let bytes = encode(&HashMap::new(), &single_db(db)).unwrap();

        let (body, trailer) = bytes.split_at(bytes.len() - 8);
        let expected = u64::from_le_bytes(trailer.try_into().unwrap());
        assert_eq!(expected, crc64(0, body));
    }

    #[test]
    fn test_corrupted_trailer_fails_load() {
        let mut bytes = encode(&HashMap::new(), &HashMap::new()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        assert!(matches!(
            decode(&bytes),
            Err(SnapshotError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupted_body_fails_load() {
        let mut db = Database::new(DEFAULT_DB);
        db.insert("pear".to_string(), Value::bulk("banana"), None);
        let mut bytes = encode(&HashMap::new(), &single_db(db)).unwrap();
        bytes[12] ^= 0x55;

        assert!(matches!(
            decode(&bytes),
            Err(SnapshotError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_magic_fails_load() {
        let mut bytes = encode(&HashMap::new(), &HashMap::new()).unwrap();
        bytes[0] = b'X';
        // Recompute the trailer so only the magic is wrong
        let body_len = bytes.len() - 8;
        let checksum = crc64(0, &bytes[..body_len]);
        bytes[body_len..].copy_from_slice(&checksum.to_le_bytes());

        assert!(matches!(decode(&bytes), Err(SnapshotError::BadMagic)));
    }

    #[test]
    fn test_truncated_file_fails_load() {
        assert!(matches!(
            decode(b"REDIS0011"),
            Err(SnapshotError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_roundtrip_metadata_and_entries() {
        let mut metadata = HashMap::new();
        metadata.insert("redis-version".to_string(), "7.4.0".to_string());
        metadata.insert("role".to_string(), "master".to_string());

        let future = now_ms() + 60_000;
        let mut db = Database::new(DEFAULT_DB);
        db.insert("pear".to_string(), Value::bulk("banana"), None);
        db.insert("session".to_string(), Value::bulk("abc"), Some(future));

        let bytes = encode(&metadata, &single_db(db.clone())).unwrap();
        let (loaded_meta, loaded_dbs) = decode(&bytes).unwrap();

        assert_eq!(loaded_meta, metadata);
        assert_eq!(loaded_dbs.len(), 1);
        let loaded = &loaded_dbs[&DEFAULT_DB];
        assert_eq!(loaded.store, db.store);
        assert_eq!(loaded.expiry_index, db.expiry_index);
        assert!(loaded
            .expiry_index
            .contains(&(future, "session".to_string())));
    }

    #[test]
    fn test_roundtrip_multiple_databases() {
        let mut databases = HashMap::new();
        let mut db0 = Database::new(0);
        db0.insert("a".to_string(), Value::bulk("x"), None);
        let mut db3 = Database::new(3);
        db3.insert("b".to_string(), Value::bulk("y"), None);
        databases.insert(0, db0);
        databases.insert(3, db3);

        let bytes = encode(&HashMap::new(), &databases).unwrap();
        let (_, loaded) = decode(&bytes).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&0].store["a"].value, Value::bulk("x"));
        assert_eq!(loaded[&3].store["b"].value, Value::bulk("y"));
    }

    #[test]
    fn test_numeric_strings_promote_on_load() {
        let mut db = Database::new(DEFAULT_DB);
        db.insert("count".to_string(), Value::Integer(42), None);
        db.insert("ratio".to_string(), Value::Double(2.5), None);
        db.insert("flag".to_string(), Value::bulk("1"), None);

        let bytes = encode(&HashMap::new(), &single_db(db)).unwrap();
        let (_, loaded) = decode(&bytes).unwrap();
        let store = &loaded[&DEFAULT_DB].store;

        assert_eq!(store["count"].value, Value::Integer(42));
        assert_eq!(store["ratio"].value, Value::Double(2.5));
        // "1" and "0" never promote; the boolean payload bytes are reserved
        assert_eq!(store["flag"].value, Value::bulk("1"));
    }

    #[test]
    fn test_expired_entry_loads_as_empty_bulk_unindexed() {
        let mut db = Database::new(DEFAULT_DB);
        db.insert("stale".to_string(), Value::bulk("old"), Some(1_000));

        let bytes = encode(&HashMap::new(), &single_db(db)).unwrap();
        let (_, loaded) = decode(&bytes).unwrap();
        let loaded = &loaded[&DEFAULT_DB];

        let entry = &loaded.store["stale"];
        assert_eq!(entry.value, Value::bulk(""));
        assert_eq!(entry.expires_at, None);
        assert!(loaded.expiry_index.is_empty());
    }

    #[test]
    fn test_seconds_expiry_marker() {
        let future_s = (now_ms() / 1000) as i32 + 3600;
        let mut body = MAGIC.to_vec();
        body.push(OP_SELECT_DB);
        body.push(0);
        body.push(OP_RESIZE);
        body.push(1); // one entry
        body.push(1); // one expiry marker
        body.push(OP_EXPIRE_S);
        body.extend_from_slice(&future_s.to_le_bytes());
        body.push(TYPE_STRING);
        encode_string(&mut body, b"k");
        encode_string(&mut body, b"v");
        body.push(OP_EOF);

        let (_, loaded) = decode(&finish(body)).unwrap();
        let entry = &loaded[&0].store["k"];
        assert_eq!(entry.expires_at, Some(future_s as u64 * 1000));
    }

    #[test]
    fn test_inline_integer_strings_decode_to_decimal() {
        let mut body = MAGIC.to_vec();
        body.push(OP_SELECT_DB);
        body.push(0);
        body.push(OP_RESIZE);
        body.push(3);
        body.push(0);

        body.push(TYPE_STRING);
        encode_string(&mut body, b"one");
        body.extend_from_slice(&[0xC0, 0x7B]); // i8: 123

        body.push(TYPE_STRING);
        encode_string(&mut body, b"two");
        body.push(0xC1);
        body.extend_from_slice(&(-12345i16).to_le_bytes());

        body.push(TYPE_STRING);
        encode_string(&mut body, b"four");
        body.push(0xC2);
        body.extend_from_slice(&(1_000_000i32).to_le_bytes());

        body.push(OP_EOF);

        let (_, loaded) = decode(&finish(body)).unwrap();
        let store = &loaded[&0].store;
        // Decimal forms then promote like any other numeric string
        assert_eq!(store["one"].value, Value::Integer(123));
        assert_eq!(store["two"].value, Value::Integer(-12345));
        assert_eq!(store["four"].value, Value::Integer(1_000_000));
    }

    #[test]
    fn test_fourteen_bit_length_roundtrip() {
        let long_value = "x".repeat(200);
        let mut db = Database::new(DEFAULT_DB);
        db.insert("long".to_string(), Value::bulk(long_value.clone()), None);

        let bytes = encode(&HashMap::new(), &single_db(db)).unwrap();
        let (_, loaded) = decode(&bytes).unwrap();

        assert_eq!(
            loaded[&DEFAULT_DB].store["long"].value,
            Value::bulk(long_value)
        );
    }

    #[test]
    fn test_thirty_two_bit_length_roundtrip() {
        let huge_value = "y".repeat(20_000);
        let mut db = Database::new(DEFAULT_DB);
        db.insert("huge".to_string(), Value::bulk(huge_value.clone()), None);

        let bytes = encode(&HashMap::new(), &single_db(db)).unwrap();
        let (_, loaded) = decode(&bytes).unwrap();

        assert_eq!(
            loaded[&DEFAULT_DB].store["huge"].value,
            Value::bulk(huge_value)
        );
    }

    #[test]
    fn test_reserved_value_type_rejected() {
        let mut body = MAGIC.to_vec();
        body.push(OP_SELECT_DB);
        body.push(0);
        body.push(OP_RESIZE);
        body.push(1);
        body.push(0);
        body.push(0x05); // reserved value type
        encode_string(&mut body, b"k");
        encode_string(&mut body, b"v");
        body.push(OP_EOF);

        assert!(matches!(
            decode(&finish(body)),
            Err(SnapshotError::UnsupportedValueType(0x05))
        ));
    }

    #[test]
    fn test_expiry_count_mismatch_rejected() {
        let mut body = MAGIC.to_vec();
        body.push(OP_SELECT_DB);
        body.push(0);
        body.push(OP_RESIZE);
        body.push(1);
        body.push(1); // declares one marker, none follow
        body.push(TYPE_STRING);
        encode_string(&mut body, b"k");
        encode_string(&mut body, b"v");
        body.push(OP_EOF);

        assert!(matches!(
            decode(&finish(body)),
            Err(SnapshotError::ExpiryCountMismatch { .. })
        ));
    }

    #[test]
    fn test_save_and_load_through_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.rdb");

        let mut db = Database::new(DEFAULT_DB);
        db.insert("pear".to_string(), Value::bulk("banana"), None);

        save(&path, &HashMap::new(), &single_db(db)).unwrap();
        let (_, loaded) = load(&path).unwrap();

        assert_eq!(
            loaded[&DEFAULT_DB].store["pear"].value,
            Value::bulk("banana")
        );
        // No temp file left behind
        assert!(!dir.path().join("dump.tmp").exists());
    }

    #[test]
    fn test_snapshot_path_defaults() {
        assert_eq!(snapshot_path(None, None), PathBuf::from("./dump.rdb"));
        assert_eq!(
            snapshot_path(Some("/data"), Some("state.rdb")),
            PathBuf::from("/data/state.rdb")
        );
        assert_eq!(snapshot_path(Some(""), None), PathBuf::from("./dump.rdb"));
    }
}
