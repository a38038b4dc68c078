//! RESP (Redis Serialization Protocol) Data Types
//!
//! This module defines the value tree used on the wire. Every frame starts
//! with a one-byte type tag and is terminated (directly or per-line) with
//! CRLF (`\r\n`).
//!
//! ## Protocol Format
//!
//! - `+` Simple String
//! - `-` Error
//! - `:` Integer
//! - `$` Bulk String
//! - `*` Array
//! - `_` Null
//! - `#` Boolean
//! - `,` Double
//! - `(` Big Number
//!
//! ## Examples
//!
//! Simple String: `+OK\r\n`
//! Error: `-ERR unknown command\r\n`
//! Integer: `:1000\r\n`
//! Bulk String: `$5\r\nhello\r\n`
//! Null Bulk String: `$-1\r\n`
//! Boolean: `#t\r\n`
//! Double: `,3.5e0\r\n`
//! Big Number: `(9007199254740993\r\n`
//! Array: `*2\r\n$4\r\nECHO\r\n$3\r\nhey\r\n`

use bytes::Bytes;
use std::fmt;

/// The CRLF terminator used in the RESP protocol
pub const CRLF: &[u8] = b"\r\n";

/// RESP protocol type tag bytes
pub mod tag {
    pub const SIMPLE_STRING: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
    pub const NULL: u8 = b'_';
    pub const BOOLEAN: u8 = b'#';
    pub const DOUBLE: u8 = b',';
    pub const BIG_NUMBER: u8 = b'(';
}

/// A value in the RESP protocol.
///
/// This enum covers all nine wire variants and doubles as the stored value
/// type in the keyspace: what a client SETs is kept verbatim and serialized
/// back on GET.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Non-binary-safe text, cannot contain CRLF.
    /// Format: `+<string>\r\n`
    SimpleString(String),

    /// Like a simple string but signals an error condition.
    /// Format: `-<error message>\r\n`
    Error(String),

    /// 64-bit signed integer.
    /// Format: `:<integer>\r\n`
    Integer(i64),

    /// Binary-safe string.
    /// Format: `$<length>\r\n<data>\r\n`
    BulkString(Bytes),

    /// The null value. Parsed from `_\r\n` or `$-1\r\n`,
    /// always serialized as the null bulk string `$-1\r\n`.
    Null,

    /// Boolean. Format: `#t\r\n` or `#f\r\n`
    Boolean(bool),

    /// Double-precision float. Format: `,<float>\r\n`
    Double(f64),

    /// Big number, carried as a 64-bit signed integer.
    /// Format: `(<integer>\r\n`
    BigNumber(i64),

    /// Arrays can contain any variant, including nested arrays.
    /// Format: `*<count>\r\n<element1><element2>...`
    Array(Vec<Value>),
}

impl Value {
    /// Creates a simple string reply.
    pub fn simple(s: impl Into<String>) -> Self {
        Value::SimpleString(s.into())
    }

    /// Creates an error reply. The literal `ERR ` is prepended to the
    /// user-facing message, matching the shape of every error this server
    /// produces.
    pub fn err(msg: impl fmt::Display) -> Self {
        Value::Error(format!("ERR {}", msg))
    }

    /// Creates an integer reply.
    pub fn int(n: i64) -> Self {
        Value::Integer(n)
    }

    /// Creates a bulk string reply.
    ///
    /// The empty string collapses to [`Value::Null`], i.e. it goes out as
    /// the null bulk `$-1\r\n`. "Empty" and "absent" are indistinguishable
    /// on the wire; see DESIGN.md.
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        if data.is_empty() {
            Value::Null
        } else {
            Value::BulkString(data)
        }
    }

    /// Creates a boolean reply.
    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    /// Creates a double reply.
    pub fn double(d: f64) -> Self {
        Value::Double(d)
    }

    /// Creates a big number reply.
    pub fn big_number(n: i64) -> Self {
        Value::BigNumber(n)
    }

    /// Creates an array reply.
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(values)
    }

    /// Common reply for successful operations
    pub fn ok() -> Self {
        Value::SimpleString("OK".to_string())
    }

    /// Common reply for PING
    pub fn pong() -> Self {
        Value::SimpleString("PONG".to_string())
    }

    /// Serializes the value to bytes for sending over the wire.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the value into an existing buffer.
    ///
    /// Integers go out in base 10 with no leading `+`; doubles use
    /// scientific form with the shortest round-trippable mantissa; arrays
    /// write their length and concatenate child serializations with no
    /// trailing delimiter.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Value::SimpleString(s) => {
                buf.push(tag::SIMPLE_STRING);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Value::Error(s) => {
                buf.push(tag::ERROR);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Value::Integer(n) => {
                buf.push(tag::INTEGER);
                buf.extend_from_slice(n.to_string().as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Value::BulkString(data) => {
                buf.push(tag::BULK_STRING);
                buf.extend_from_slice(data.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                buf.extend_from_slice(data);
                buf.extend_from_slice(CRLF);
            }
            Value::Null => {
                buf.push(tag::BULK_STRING);
                buf.extend_from_slice(b"-1");
                buf.extend_from_slice(CRLF);
            }
            Value::Boolean(b) => {
                buf.push(tag::BOOLEAN);
                buf.push(if *b { b't' } else { b'f' });
                buf.extend_from_slice(CRLF);
            }
            Value::Double(d) => {
                buf.push(tag::DOUBLE);
                buf.extend_from_slice(format!("{:e}", d).as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Value::BigNumber(n) => {
                buf.push(tag::BIG_NUMBER);
                buf.extend_from_slice(n.to_string().as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Value::Array(values) => {
                buf.push(tag::ARRAY);
                buf.extend_from_slice(values.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                for value in values {
                    value.serialize_into(buf);
                }
            }
        }
    }

    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Extracts the text of a SimpleString or (UTF-8) BulkString.
    ///
    /// Command keys, patterns, and option words must be one of these two
    /// variants; everything else yields `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::SimpleString(s) => Some(s),
            Value::BulkString(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Attempts to extract an integer, accepting the integer variant or a
    /// string variant holding decimal digits.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::SimpleString(s) => s.parse().ok(),
            Value::BulkString(b) => std::str::from_utf8(b).ok().and_then(|s| s.parse().ok()),
            _ => None,
        }
    }

    /// Attempts to extract the inner array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Consumes self and returns the inner array if this is an Array.
    pub fn into_array(self) -> Option<Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::SimpleString(s) => write!(f, "\"{}\"", s),
            Value::Error(s) => write!(f, "(error) {}", s),
            Value::Integer(n) => write!(f, "(integer) {}", n),
            Value::BulkString(data) => {
                if let Ok(s) = std::str::from_utf8(data) {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "(binary data, {} bytes)", data.len())
                }
            }
            Value::Null => write!(f, "(nil)"),
            Value::Boolean(b) => write!(f, "(boolean) {}", b),
            Value::Double(d) => write!(f, "(double) {}", d),
            Value::BigNumber(n) => write!(f, "(big number) {}", n),
            Value::Array(values) => {
                if values.is_empty() {
                    write!(f, "(empty array)")
                } else {
                    writeln!(f)?;
                    for (i, v) in values.iter().enumerate() {
                        writeln!(f, "{}) {}", i + 1, v)?;
                    }
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_string_serialize() {
        let value = Value::simple("OK");
        assert_eq!(value.serialize(), b"+OK\r\n");
    }

    #[test]
    fn test_error_serialize_prepends_err() {
        let value = Value::err("unknown command");
        assert_eq!(value.serialize(), b"-ERR unknown command\r\n");
    }

    #[test]
    fn test_integer_serialize() {
        let value = Value::int(1000);
        assert_eq!(value.serialize(), b":1000\r\n");

        let negative = Value::int(-42);
        assert_eq!(negative.serialize(), b":-42\r\n");
    }

    #[test]
    fn test_bulk_string_serialize() {
        let value = Value::bulk("hello");
        assert_eq!(value.serialize(), b"$5\r\nhello\r\n");
    }

    #[test]
    fn test_empty_bulk_collapses_to_null() {
        let value = Value::bulk("");
        assert_eq!(value, Value::Null);
        assert_eq!(value.serialize(), b"$-1\r\n");
    }

    #[test]
    fn test_null_serialize() {
        assert_eq!(Value::Null.serialize(), b"$-1\r\n");
    }

    #[test]
    fn test_boolean_serialize() {
        assert_eq!(Value::boolean(true).serialize(), b"#t\r\n");
        assert_eq!(Value::boolean(false).serialize(), b"#f\r\n");
    }

    #[test]
    fn test_double_serialize() {
        assert_eq!(Value::double(3.5).serialize(), b",3.5e0\r\n");
        assert_eq!(Value::double(-0.0125).serialize(), b",-1.25e-2\r\n");
    }

    #[test]
    fn test_big_number_serialize() {
        let value = Value::big_number(9007199254740993);
        assert_eq!(value.serialize(), b"(9007199254740993\r\n");
    }

    #[test]
    fn test_array_serialize() {
        let value = Value::array(vec![Value::bulk("GET"), Value::bulk("name")]);
        assert_eq!(value.serialize(), b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n");
    }

    #[test]
    fn test_nested_array_serialize() {
        let value = Value::array(vec![
            Value::int(1),
            Value::array(vec![Value::int(2), Value::int(3)]),
        ]);
        assert_eq!(value.serialize(), b"*2\r\n:1\r\n*2\r\n:2\r\n:3\r\n");
    }

    #[test]
    fn test_ok_response() {
        assert_eq!(Value::ok().serialize(), b"+OK\r\n");
    }

    #[test]
    fn test_pong_response() {
        assert_eq!(Value::pong().serialize(), b"+PONG\r\n");
    }

    #[test]
    fn test_as_str_accepts_both_string_variants() {
        assert_eq!(Value::simple("abc").as_str(), Some("abc"));
        assert_eq!(Value::bulk("abc").as_str(), Some("abc"));
        assert_eq!(Value::int(5).as_str(), None);
    }

    #[test]
    fn test_as_integer_coercions() {
        assert_eq!(Value::int(7).as_integer(), Some(7));
        assert_eq!(Value::bulk("7").as_integer(), Some(7));
        assert_eq!(Value::simple("-7").as_integer(), Some(-7));
        assert_eq!(Value::bulk("x").as_integer(), None);
    }
}
