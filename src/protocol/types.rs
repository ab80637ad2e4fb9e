//! RESP (Redis Serialization Protocol) Data Types
//!
//! This module defines the value model shared by the encoder and the decoder.
//! Every RESP reply a server can send maps onto exactly one [`RespValue`]
//! variant, plus one client-local variant ([`RespValue::InternalError`]) used
//! to report failures that happened on our side of the wire.
//!
//! ## Protocol Format
//!
//! Each RESP type starts with a type prefix byte:
//! - `+` Simple String
//! - `-` Error
//! - `:` Integer
//! - `$` Bulk String
//! - `*` Array
//!
//! All types are terminated with CRLF (`\r\n`).
//!
//! ## Examples
//!
//! Simple String: `+OK\r\n`
//! Error: `-ERR unknown command\r\n`
//! Integer: `:1000\r\n`
//! Bulk String: `$5\r\nhello\r\n`
//! Array: `*2\r\n$3\r\nGET\r\n$4\r\nname\r\n`
//! Nil Bulk String: `$-1\r\n`
//! Nil Array: `*-1\r\n`
//!
//! ## Nil
//!
//! RESP has two distinct "no value" markers. A nil bulk string (`$-1`) is what
//! `GET` returns for a missing key; a nil array (`*-1`) is what blocking reads
//! return on timeout. Both are kept apart from the empty string and the empty
//! array: `BulkString(None)` vs `BulkString(Some(""))`, `Array(None)` vs
//! `Array(Some(vec![]))`.

use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// The CRLF terminator used in RESP protocol
pub const CRLF: &[u8] = b"\r\n";

/// RESP protocol type prefixes
pub mod prefix {
    pub const SIMPLE_STRING: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
}

/// Classification of a client-local failure.
///
/// These never appear on the wire.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InternalErrorCode {
    /// The transport is not connected, or dropped mid-operation.
    #[error("not connected")]
    Disconnected,

    /// The server sent a value whose discriminant byte we do not know.
    #[error("unknown type prefix: {0:#04x}")]
    UnknownType(u8),

    /// Any other malformed input; the detail says what went wrong.
    #[error("unknown error")]
    UnknownError,
}

/// A failure that happened on the client side of the connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}{}", detail_suffix(.detail))]
pub struct InternalError {
    /// What kind of failure this was
    pub code: InternalErrorCode,
    /// Optional human-readable context
    pub detail: Option<String>,
}

impl InternalError {
    pub fn new(code: InternalErrorCode) -> Self {
        Self { code, detail: None }
    }

    pub fn disconnected() -> Self {
        Self::new(InternalErrorCode::Disconnected)
    }

    pub fn unknown_type(observed: u8) -> Self {
        Self::new(InternalErrorCode::UnknownType(observed))
    }

    /// A generic protocol failure with a description of what was wrong.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self {
            code: InternalErrorCode::UnknownError,
            detail: Some(detail.into()),
        }
    }

    /// Attaches `detail` unless a detail is already present.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        if self.detail.is_none() {
            self.detail = Some(detail.into());
        }
        self
    }

    pub fn is_disconnected(&self) -> bool {
        self.code == InternalErrorCode::Disconnected
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map_or_else(String::new, |detail| format!(": {}", detail))
}

/// Errors raised while rendering a value for the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Internal errors are client-local and have no wire representation.
    #[error("internal error values cannot be encoded: {0}")]
    InternalValue(InternalError),
}

/// Represents a value in the RESP protocol.
///
/// Values are built fresh by the decoder for each reply and are never
/// mutated afterwards. Arrays own their children outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// Simple strings are used for non-binary safe strings.
    /// They cannot contain CRLF characters.
    /// Format: `+<string>\r\n`
    SimpleString(String),

    /// Errors are similar to simple strings but indicate an error condition.
    /// Format: `-<error message>\r\n`
    Error(String),

    /// 64-bit signed integers.
    /// Format: `:<integer>\r\n`
    Integer(i64),

    /// Bulk strings are binary-safe strings up to 512 MB.
    /// Format: `$<length>\r\n<data>\r\n`
    /// Nil bulk string (`None`): `$-1\r\n`
    BulkString(Option<Bytes>),

    /// Arrays can contain any RESP type, including nested arrays.
    /// Format: `*<count>\r\n<element1><element2>...`
    /// Nil array (`None`): `*-1\r\n`
    Array(Option<Vec<RespValue>>),

    /// A client-local failure. Never sent or received on the wire.
    InternalError(InternalError),
}

impl RespValue {
    /// Creates a new simple string value.
    ///
    /// # Example
    /// ```
    /// use flashkv_client::protocol::types::RespValue;
    /// let ok = RespValue::simple_string("OK");
    /// ```
    pub fn simple_string(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    /// Creates a new error value.
    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    pub fn integer(n: i64) -> Self {
        RespValue::Integer(n)
    }

    /// Creates a new (non-nil) bulk string.
    ///
    /// # Example
    /// ```
    /// use flashkv_client::protocol::types::RespValue;
    /// use bytes::Bytes;
    /// let bulk = RespValue::bulk_string(Bytes::from("hello"));
    /// assert!(!bulk.is_nil());
    /// ```
    pub fn bulk_string(data: impl Into<Bytes>) -> Self {
        RespValue::BulkString(Some(data.into()))
    }

    pub fn nil_bulk_string() -> Self {
        RespValue::BulkString(None)
    }

    pub fn array(values: Vec<RespValue>) -> Self {
        RespValue::Array(Some(values))
    }

    pub fn nil_array() -> Self {
        RespValue::Array(None)
    }

    pub fn internal(err: InternalError) -> Self {
        RespValue::InternalError(err)
    }

    /// Serializes the value to bytes for sending over the wire.
    ///
    /// Fails if the value is, or contains, an [`RespValue::InternalError`].
    pub fn serialize(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf)?;
        Ok(buf)
    }

    /// Serializes the value into an existing buffer.
    ///
    /// On error nothing is appended to `buf`.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        if let Some(err) = self.find_internal_error() {
            return Err(EncodeError::InternalValue(err.clone()));
        }
        self.write_wire(buf);
        Ok(())
    }

    fn write_wire(&self, buf: &mut Vec<u8>) {
        match self {
            RespValue::SimpleString(s) => write_line(buf, prefix::SIMPLE_STRING, &sanitize(s)),
            RespValue::Error(s) => write_line(buf, prefix::ERROR, &sanitize(s)),
            RespValue::Integer(n) => write_line(buf, prefix::INTEGER, &n.to_string()),
            RespValue::BulkString(Some(data)) => write_bulk(buf, data),
            RespValue::BulkString(None) => write_line(buf, prefix::BULK_STRING, "-1"),
            RespValue::Array(Some(values)) => {
                write_header(buf, prefix::ARRAY, values.len());
                for value in values {
                    value.write_wire(buf);
                }
            }
            RespValue::Array(None) => write_line(buf, prefix::ARRAY, "-1"),
            // Rejected up front by serialize_into
            RespValue::InternalError(_) => {}
        }
    }

    fn find_internal_error(&self) -> Option<&InternalError> {
        match self {
            RespValue::InternalError(err) => Some(err),
            RespValue::Array(Some(values)) => values.iter().find_map(|v| v.find_internal_error()),
            _ => None,
        }
    }

    /// Returns true for both the nil bulk string and the nil array.
    pub fn is_nil(&self) -> bool {
        matches!(self, RespValue::BulkString(None) | RespValue::Array(None))
    }

    /// Returns true if this is a server-reported error.
    pub fn is_error(&self) -> bool {
        matches!(self, RespValue::Error(_))
    }

    /// Returns true if this is a client-local failure.
    pub fn is_internal_error(&self) -> bool {
        matches!(self, RespValue::InternalError(_))
    }

    pub fn as_internal_error(&self) -> Option<&InternalError> {
        match self {
            RespValue::InternalError(err) => Some(err),
            _ => None,
        }
    }

    /// Text view of the value.
    ///
    /// - Simple strings and errors yield their text.
    /// - Integers yield their decimal form.
    /// - Bulk strings are decoded as lossy UTF-8; **nil yields `""`**. Use
    ///   [`RespValue::is_nil`] to tell a missing value from an empty one.
    /// - Arrays have no scalar text and yield `""`; see [`RespValue::to_text_list`].
    /// - Internal errors yield `"INTERNAL ERROR: <description>"`.
    pub fn to_text(&self) -> String {
        match self {
            RespValue::SimpleString(s) | RespValue::Error(s) => s.clone(),
            RespValue::Integer(n) => n.to_string(),
            RespValue::BulkString(Some(data)) => String::from_utf8_lossy(data).into_owned(),
            RespValue::BulkString(None) => String::new(),
            RespValue::Array(_) => String::new(),
            RespValue::InternalError(err) => format!("INTERNAL ERROR: {}", err),
        }
    }

    /// The text view of every element of an array; empty for anything else.
    pub fn to_text_list(&self) -> Vec<String> {
        match self {
            RespValue::Array(Some(values)) => values.iter().map(RespValue::to_text).collect(),
            _ => Vec::new(),
        }
    }

    /// Integer view of the value.
    ///
    /// Integers yield their value; simple strings, errors and bulk strings are
    /// parsed as a (whitespace-trimmed) decimal. Anything that does not parse,
    /// and every other variant, yields `0`.
    pub fn to_integer(&self) -> i64 {
        match self {
            RespValue::Integer(n) => *n,
            RespValue::SimpleString(s) | RespValue::Error(s) => s.trim().parse().unwrap_or(0),
            RespValue::BulkString(Some(data)) => std::str::from_utf8(data)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Boolean view: true iff the integer view is nonzero.
    pub fn to_bool(&self) -> bool {
        self.to_integer() != 0
    }

    /// Attempts to extract the inner string from SimpleString or BulkString.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RespValue::SimpleString(s) => Some(s),
            RespValue::BulkString(Some(b)) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Attempts to extract the inner bytes from a non-nil BulkString.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            RespValue::BulkString(Some(b)) => Some(b),
            _ => None,
        }
    }

    /// Attempts to extract the inner integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RespValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract the inner elements of a non-nil array.
    pub fn as_array(&self) -> Option<&[RespValue]> {
        match self {
            RespValue::Array(Some(arr)) => Some(arr),
            _ => None,
        }
    }

    /// Consumes self and returns the inner elements of a non-nil array.
    pub fn into_array(self) -> Option<Vec<RespValue>> {
        match self {
            RespValue::Array(Some(arr)) => Some(arr),
            _ => None,
        }
    }
}

impl From<InternalError> for RespValue {
    fn from(err: InternalError) -> Self {
        RespValue::InternalError(err)
    }
}

/// Simple strings terminate at CRLF, so any embedded CRLF is dropped.
fn sanitize(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Writes `<prefix><text>\r\n`.
fn write_line(buf: &mut Vec<u8>, prefix: u8, text: &str) {
    buf.push(prefix);
    buf.extend_from_slice(text.as_bytes());
    buf.extend_from_slice(CRLF);
}

/// Writes an array or bulk string length header: `<prefix><len>\r\n`.
pub(crate) fn write_header(buf: &mut Vec<u8>, prefix: u8, len: usize) {
    write_line(buf, prefix, &len.to_string());
}

/// Writes a non-nil bulk string: `$<len>\r\n<data>\r\n`.
pub(crate) fn write_bulk(buf: &mut Vec<u8>, data: &[u8]) {
    write_header(buf, prefix::BULK_STRING, data.len());
    buf.extend_from_slice(data);
    buf.extend_from_slice(CRLF);
}

impl fmt::Display for RespValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespValue::SimpleString(s) => write!(f, "{}", s),
            RespValue::Error(s) => write!(f, "(error) {}", s),
            RespValue::Integer(n) => write!(f, "(integer) {}", n),
            RespValue::BulkString(Some(data)) => {
                if let Ok(s) = std::str::from_utf8(data) {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "(binary data, {} bytes)", data.len())
                }
            }
            RespValue::BulkString(None) | RespValue::Array(None) => write!(f, "(nil)"),
            RespValue::Array(Some(values)) => {
                if values.is_empty() {
                    write!(f, "(empty array)")
                } else {
                    for (i, v) in values.iter().enumerate() {
                        if i > 0 {
                            writeln!(f)?;
                        }
                        write!(f, "{}) {}", i + 1, v)?;
                    }
                    Ok(())
                }
            }
            RespValue::InternalError(err) => write!(f, "(internal error) {}", err),
        }
    }
}
