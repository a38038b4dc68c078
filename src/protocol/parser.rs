//! Streaming RESP Protocol Parser
//!
//! This module implements an incremental parser for the RESP protocol.
//!
//! ## How the Parser Works
//!
//! The parser reads from a buffer and returns either:
//! - `Ok(Some((value, consumed)))` - Successfully parsed a value, `consumed` bytes were used
//! - `Ok(None)` - Need more data, the frame is incomplete
//! - `Err(ParseError)` - Invalid protocol data
//!
//! This design allows the caller to:
//! 1. Append incoming network data to a buffer
//! 2. Call `parse()` to attempt parsing
//! 3. If successful, advance the buffer by `consumed` bytes
//! 4. If incomplete, wait for more data
//! 5. If error, report and disconnect the client
//!
//! A frame split across several TCP reads is reassembled, and several
//! pipelined frames arriving in one read are handed out one at a time.

use crate::protocol::types::{tag, Value, CRLF};
use bytes::Bytes;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors that can occur during RESP parsing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// Unknown type tag byte
    #[error("unknown type tag: {0:#04x}")]
    UnknownTag(u8),

    /// Invalid integer format
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Invalid UTF-8 in a simple string or error message
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Bulk string length is negative (but not -1 for null)
    #[error("invalid bulk string length: {0}")]
    InvalidBulkLength(i64),

    /// Array length is negative (but not -1 for null)
    #[error("invalid array length: {0}")]
    InvalidArrayLength(i64),

    /// Malformed floating-point literal
    #[error("invalid double: {0}")]
    InvalidDouble(String),

    /// Boolean frames must be exactly `#t\r\n` or `#f\r\n`
    #[error("invalid boolean")]
    InvalidBoolean,

    /// Protocol violation (missing CRLF, etc.)
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// The frame exceeds the maximum allowed size
    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum size for a single bulk string (512 MB, same as Redis)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum array nesting depth (prevent stack overflow)
pub const MAX_NESTING_DEPTH: usize = 32;

/// An incremental RESP protocol parser.
///
/// # Example
///
/// ```ignore
/// use emberkv::protocol::RespParser;
/// use bytes::BytesMut;
///
/// let mut parser = RespParser::new();
/// let mut buffer = BytesMut::from(&b"*2\r\n$4\r\nECHO\r\n$3\r\nhey\r\n"[..]);
///
/// if let Some((value, consumed)) = parser.parse(&buffer)? {
///     buffer.advance(consumed);
///     println!("Parsed: {:?}", value);
/// }
/// ```
#[derive(Debug, Default)]
pub struct RespParser {
    /// Current nesting depth (for array parsing)
    depth: usize,
}

impl RespParser {
    /// Creates a new parser instance.
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Attempts to parse one RESP value from the front of the buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((value, consumed)))` - Successfully parsed a value
    /// - `Ok(None)` - Incomplete frame, need more bytes
    /// - `Err(e)` - Parse error
    pub fn parse(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        self.depth = 0;
        self.parse_value(buf)
    }

    /// Internal recursive parsing function.
    fn parse_value(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        if buf.is_empty() {
            return Ok(None);
        }

        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::ProtocolError(format!(
                "maximum nesting depth exceeded: {}",
                MAX_NESTING_DEPTH
            )));
        }

        match buf[0] {
            tag::SIMPLE_STRING => self.parse_simple_string(buf),
            tag::ERROR => self.parse_error(buf),
            tag::INTEGER => self.parse_integer(buf),
            tag::BULK_STRING => self.parse_bulk_string(buf),
            tag::ARRAY => self.parse_array(buf),
            tag::NULL => self.parse_null(buf),
            tag::BOOLEAN => self.parse_boolean(buf),
            tag::DOUBLE => self.parse_double(buf),
            tag::BIG_NUMBER => self.parse_big_number(buf),
            other => Err(ParseError::UnknownTag(other)),
        }
    }

    /// Parses a simple string: `+<string>\r\n`
    fn parse_simple_string(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        match find_crlf(&buf[1..]) {
            Some(pos) => {
                let content = &buf[1..1 + pos];
                let s = std::str::from_utf8(content)
                    .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

                // +1 for tag, +2 for CRLF
                let consumed = 1 + pos + 2;
                Ok(Some((Value::SimpleString(s.to_string()), consumed)))
            }
            None => Ok(None), // Incomplete
        }
    }

    /// Parses an error: `-<error message>\r\n`
    fn parse_error(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        match find_crlf(&buf[1..]) {
            Some(pos) => {
                let content = &buf[1..1 + pos];
                let s = std::str::from_utf8(content)
                    .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

                let consumed = 1 + pos + 2;
                Ok(Some((Value::Error(s.to_string()), consumed)))
            }
            None => Ok(None),
        }
    }

    /// Parses an integer: `:<integer>\r\n`
    fn parse_integer(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        match self.parse_integer_line(buf)? {
            Some((n, consumed)) => Ok(Some((Value::Integer(n), consumed))),
            None => Ok(None),
        }
    }

    /// Parses a big number: `(<integer>\r\n`
    fn parse_big_number(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        match self.parse_integer_line(buf)? {
            Some((n, consumed)) => Ok(Some((Value::BigNumber(n), consumed))),
            None => Ok(None),
        }
    }

    /// Shared line parser for the `:` and `(` tags: a decimal i64 up to CRLF.
    fn parse_integer_line(&mut self, buf: &[u8]) -> ParseResult<Option<(i64, usize)>> {
        match find_crlf(&buf[1..]) {
            Some(pos) => {
                let content = &buf[1..1 + pos];
                let s = std::str::from_utf8(content)
                    .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

                let n: i64 = s
                    .parse()
                    .map_err(|e: ParseIntError| ParseError::InvalidInteger(e.to_string()))?;
                Ok(Some((n, 1 + pos + 2)))
            }
            None => Ok(None),
        }
    }

    /// Parses the null frame: exactly `_\r\n`
    fn parse_null(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        if buf.len() < 3 {
            return Ok(None);
        }
        if &buf[1..3] != CRLF {
            return Err(ParseError::ProtocolError(
                "null frame must be _\\r\\n".to_string(),
            ));
        }
        Ok(Some((Value::Null, 3)))
    }

    /// Parses a boolean: exactly `#t\r\n` or `#f\r\n`
    fn parse_boolean(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        if buf.len() < 4 {
            return Ok(None);
        }
        match &buf[..4] {
            b"#t\r\n" => Ok(Some((Value::Boolean(true), 4))),
            b"#f\r\n" => Ok(Some((Value::Boolean(false), 4))),
            _ => Err(ParseError::InvalidBoolean),
        }
    }

    /// Parses a double: `,[sign]digits[.digits][(e|E)[sign]digits]\r\n`
    ///
    /// A missing fractional part defaults to 0, a missing exponent to 0.
    fn parse_double(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        match find_crlf(&buf[1..]) {
            Some(pos) => {
                let content = &buf[1..1 + pos];
                let s = std::str::from_utf8(content)
                    .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

                let d = parse_double_literal(s)
                    .ok_or_else(|| ParseError::InvalidDouble(s.to_string()))?;
                Ok(Some((Value::Double(d), 1 + pos + 2)))
            }
            None => Ok(None),
        }
    }

    /// Parses a bulk string: `$<length>\r\n<data>\r\n`
    fn parse_bulk_string(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        // First, find the length line
        let length_end = match find_crlf(&buf[1..]) {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let length_str = std::str::from_utf8(&buf[1..1 + length_end])
            .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

        let length: i64 = length_str
            .parse()
            .map_err(|e: ParseIntError| ParseError::InvalidInteger(e.to_string()))?;

        // Handle null bulk string
        if length == -1 {
            let consumed = 1 + length_end + 2; // $-1\r\n
            return Ok(Some((Value::Null, consumed)));
        }

        if length < 0 {
            return Err(ParseError::InvalidBulkLength(length));
        }

        let length = length as usize;

        if length > MAX_BULK_SIZE {
            return Err(ParseError::MessageTooLarge {
                size: length,
                max: MAX_BULK_SIZE,
            });
        }

        // Calculate the start of the data
        let data_start = 1 + length_end + 2; // tag + length + CRLF

        // Check if we have enough data
        let total_needed = data_start + length + 2; // data + CRLF
        if buf.len() < total_needed {
            return Ok(None); // Incomplete
        }

        // Verify trailing CRLF
        if &buf[data_start + length..data_start + length + 2] != CRLF {
            return Err(ParseError::ProtocolError(
                "bulk string missing trailing CRLF".to_string(),
            ));
        }

        let data = Bytes::copy_from_slice(&buf[data_start..data_start + length]);

        Ok(Some((Value::BulkString(data), total_needed)))
    }

    /// Parses an array: `*<count>\r\n<elements...>`
    fn parse_array(&mut self, buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
        // Find the count line
        let count_end = match find_crlf(&buf[1..]) {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let count_str = std::str::from_utf8(&buf[1..1 + count_end])
            .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

        let count: i64 = count_str
            .parse()
            .map_err(|e: ParseIntError| ParseError::InvalidInteger(e.to_string()))?;

        // Handle null array
        if count == -1 {
            let consumed = 1 + count_end + 2;
            return Ok(Some((Value::Null, consumed)));
        }

        if count < 0 {
            return Err(ParseError::InvalidArrayLength(count));
        }

        let count = count as usize;

        // Parse each element
        let mut elements = Vec::with_capacity(count);
        let mut consumed = 1 + count_end + 2; // *<count>\r\n

        self.depth += 1;

        for _ in 0..count {
            if consumed >= buf.len() {
                return Ok(None); // Incomplete
            }

            match self.parse_value(&buf[consumed..])? {
                Some((value, element_consumed)) => {
                    elements.push(value);
                    consumed += element_consumed;
                }
                None => return Ok(None), // Incomplete
            }
        }

        self.depth -= 1;

        Ok(Some((Value::Array(elements), consumed)))
    }
}

/// Parses the double grammar into an f64.
///
/// Grammar: `[sign] digits [ . digits ] [ (e|E) [sign] digits ]`.
/// The integral digits are mandatory; fraction and exponent default to 0.
fn parse_double_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;

    let mut integral = String::new();
    let mut fractional = String::new();
    let mut exponent = String::new();

    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        integral.push(bytes[i] as char);
        i += 1;
    }

    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        integral.push(bytes[i] as char);
        i += 1;
    }
    if i == digits_start {
        return None;
    }

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            fractional.push(bytes[i] as char);
            i += 1;
        }
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
            exponent.push(bytes[i] as char);
            i += 1;
        }
        let exp_digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            exponent.push(bytes[i] as char);
            i += 1;
        }
        if i == exp_digits_start {
            return None;
        }
    }

    if i != bytes.len() {
        return None;
    }

    if fractional.is_empty() {
        fractional.push('0');
    }
    if exponent.is_empty() {
        exponent.push('0');
    }

    format!("{}.{}e{}", integral, fractional, exponent).parse().ok()
}

/// Finds the position of CRLF in the buffer.
///
/// Returns the position of `\r` if found, or None if CRLF is not present.
#[inline]
fn find_crlf(buf: &[u8]) -> Option<usize> {
    for i in 0..buf.len().saturating_sub(1) {
        if buf[i] == b'\r' && buf[i + 1] == b'\n' {
            return Some(i);
        }
    }
    None
}

/// Helper function to parse a single RESP frame from bytes.
///
/// This is a convenience function for simple use cases.
pub fn parse_message(buf: &[u8]) -> ParseResult<Option<(Value, usize)>> {
    RespParser::new().parse(buf)
}
