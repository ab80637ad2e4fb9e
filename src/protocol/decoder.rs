//! Streaming RESP Decoder
//!
//! This module reads exactly one RESP value from a [`Transport`], byte by
//! byte, leaving whatever follows it untouched in the stream.
//!
//! ## Two Modes, One Grammar
//!
//! - [`RespDecoder::decode`] (blocking): waits until a byte is available,
//!   then consumes the whole value, waiting again before each array element.
//! - [`RespDecoder::poll`] (single step): returns `None` straight away when
//!   nothing is available. Otherwise it reads one discriminant byte and
//!   finishes that value like the blocking mode does. Stray CR/LF bytes in
//!   front of a discriminant are skipped as frame noise.
//!
//! ## Failures
//!
//! Nothing in here panics or aborts on bad input. Failures come back as
//! [`InternalError`] values:
//!
//! - transport down before or during the read: `Disconnected`
//! - unknown discriminant byte: `UnknownType(byte)`
//! - anything else malformed (bad length, short read, missing LF, ...):
//!   `UnknownError` with a detail message
//!
//! A `-ERR ...` reply from the server is *not* a failure here; it decodes to
//! [`RespValue::Error`] like any other value.

use crate::protocol::types::{prefix, InternalError, RespValue};
use crate::transport::Transport;
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, trace};

/// Maximum size for a single bulk string (512 MB, same as Redis)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum array nesting depth (prevent stack overflow)
pub const MAX_NESTING_DEPTH: usize = 32;

/// Maximum length of a simple string, error or length line
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Default pause between `available()` checks while waiting for data
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Elements reserved up front for an array, whatever its declared count
const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

/// Bulk payloads grow by at most this many bytes per read
const BULK_READ_CHUNK: usize = 16 * 1024;

type DecodeResult<T> = Result<T, InternalError>;

/// Decodes RESP values from a transport.
///
/// # Example
///
/// ```
/// use flashkv_client::protocol::{RespDecoder, RespValue};
/// use flashkv_client::transport::MemoryTransport;
///
/// let mut transport = MemoryTransport::with_input(b":5\r\n+OK\r\n");
/// let mut decoder = RespDecoder::new();
///
/// assert_eq!(decoder.decode(&mut transport), RespValue::Integer(5));
/// assert_eq!(decoder.poll(&mut transport), Some(RespValue::simple_string("OK")));
/// assert_eq!(decoder.poll(&mut transport), None);
/// ```
#[derive(Debug, Clone)]
pub struct RespDecoder {
    /// Current nesting depth (for array parsing)
    depth: usize,
    /// Pause between availability checks in blocking mode
    poll_interval: Duration,
}

impl Default for RespDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RespDecoder {
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            depth: 0,
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Blocks until one complete value has been read.
    ///
    /// Failures are returned as [`RespValue::InternalError`].
    pub fn decode<T: Transport + ?Sized>(&mut self, transport: &mut T) -> RespValue {
        self.try_decode(transport)
            .unwrap_or_else(RespValue::InternalError)
    }

    /// Like [`RespDecoder::decode`], with failures split out into `Err`.
    pub fn try_decode<T: Transport + ?Sized>(&mut self, transport: &mut T) -> DecodeResult<RespValue> {
        self.wait_for_data(transport)?;
        let discriminant = read_byte(transport)?;
        self.depth = 0;
        self.parse_value(transport, discriminant)
            .inspect_err(|e| debug!(error = %e, "Decode failed"))
    }

    /// Reads one value if a byte is available right now.
    ///
    /// Returns `None` when nothing is available yet. Nothing is consumed in
    /// that case except stray CR/LF noise.
    pub fn poll<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Option<RespValue> {
        loop {
            if !transport.connected() {
                return Some(RespValue::InternalError(InternalError::disconnected()));
            }
            if !transport.available() {
                return None;
            }

            let discriminant = transport.read()?;
            if discriminant == b'\r' || discriminant == b'\n' {
                trace!(byte = discriminant, "Skipping frame noise");
                continue;
            }

            self.depth = 0;
            let value = self
                .parse_value(transport, discriminant)
                .inspect_err(|e| debug!(error = %e, "Decode failed"))
                .unwrap_or_else(RespValue::InternalError);
            return Some(value);
        }
    }

    fn wait_for_data<T: Transport + ?Sized>(&self, transport: &mut T) -> DecodeResult<()> {
        loop {
            if !transport.connected() {
                return Err(InternalError::disconnected());
            }
            if transport.available() {
                return Ok(());
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    /// Routes a discriminant byte to the matching parser.
    fn parse_value<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        discriminant: u8,
    ) -> DecodeResult<RespValue> {
        match discriminant {
            prefix::SIMPLE_STRING => Ok(RespValue::SimpleString(read_text_line(transport)?)),
            prefix::ERROR => Ok(RespValue::Error(read_text_line(transport)?)),
            prefix::INTEGER => Ok(RespValue::Integer(read_integer_line(transport)?)),
            prefix::BULK_STRING => self.parse_bulk_string(transport),
            prefix::ARRAY => self.parse_array(transport),
            other => Err(InternalError::unknown_type(other)),
        }
    }

    /// Parses a bulk string after its `$`: `<length>\r\n<data>\r\n`
    fn parse_bulk_string<T: Transport + ?Sized>(&mut self, transport: &mut T) -> DecodeResult<RespValue> {
        let length = read_integer_line(transport)?;

        if length == -1 {
            return Ok(RespValue::BulkString(None));
        }
        if length < 0 {
            return Err(InternalError::malformed(format!(
                "invalid bulk string length: {}",
                length
            )));
        }

        let length = length as usize;
        if length > MAX_BULK_SIZE {
            return Err(InternalError::malformed(format!(
                "bulk string too large: {} bytes (max: {})",
                length, MAX_BULK_SIZE
            )));
        }

        let data = read_payload(transport, length);
        if data.len() != length {
            let detail = format!("short read: expected {} bytes, got {}", length, data.len());
            return Err(if transport.connected() {
                InternalError::malformed(detail)
            } else {
                InternalError::disconnected().with_detail(detail)
            });
        }

        expect_crlf(transport)?;
        trace!(bytes = length, "Parsed bulk string");
        Ok(RespValue::BulkString(Some(Bytes::from(data))))
    }

    /// Parses an array after its `*`: `<count>\r\n<elements...>`
    fn parse_array<T: Transport + ?Sized>(&mut self, transport: &mut T) -> DecodeResult<RespValue> {
        let count = read_integer_line(transport)?;

        if count == -1 {
            return Ok(RespValue::Array(None));
        }
        if count < 0 {
            return Err(InternalError::malformed(format!("invalid array length: {}", count)));
        }
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(InternalError::malformed(format!(
                "maximum nesting depth exceeded: {}",
                MAX_NESTING_DEPTH
            )));
        }

        let count = count as usize;
        let mut elements = Vec::with_capacity(count.min(MAX_PREALLOCATED_ELEMENTS));

        self.depth += 1;
        for _ in 0..count {
            self.wait_for_data(transport)?;
            let discriminant = read_byte(transport)?;
            elements.push(self.parse_value(transport, discriminant)?);
        }
        self.depth -= 1;

        Ok(RespValue::Array(Some(elements)))
    }
}

/// Reads one byte that must be there.
fn read_byte<T: Transport + ?Sized>(transport: &mut T) -> DecodeResult<u8> {
    match transport.read() {
        Some(b) => Ok(b),
        None if !transport.connected() => Err(InternalError::disconnected()),
        None => Err(InternalError::malformed("short read: no data mid-value")),
    }
}

/// Consumes a CRLF terminator.
fn expect_crlf<T: Transport + ?Sized>(transport: &mut T) -> DecodeResult<()> {
    let cr = read_byte(transport)?;
    let lf = read_byte(transport)?;
    if cr != b'\r' || lf != b'\n' {
        return Err(InternalError::malformed(format!(
            "expected CRLF, got {:#04x} {:#04x}",
            cr, lf
        )));
    }
    Ok(())
}

/// Reads up to (excluding) CRLF and discards the terminator.
fn read_line<T: Transport + ?Sized>(transport: &mut T) -> DecodeResult<Vec<u8>> {
    let mut line = Vec::new();
    loop {
        match read_byte(transport)? {
            b'\r' => {
                let lf = read_byte(transport)?;
                if lf != b'\n' {
                    return Err(InternalError::malformed(format!(
                        "expected LF after CR, got {:#04x}",
                        lf
                    )));
                }
                return Ok(line);
            }
            b => {
                if line.len() >= MAX_LINE_LENGTH {
                    return Err(InternalError::malformed(format!(
                        "line exceeds {} bytes",
                        MAX_LINE_LENGTH
                    )));
                }
                line.push(b);
            }
        }
    }
}

fn read_text_line<T: Transport + ?Sized>(transport: &mut T) -> DecodeResult<String> {
    String::from_utf8(read_line(transport)?)
        .map_err(|e| InternalError::malformed(format!("invalid UTF-8: {}", e)))
}

/// Reads up to `length` bytes, growing the buffer only as data arrives.
///
/// Returns fewer bytes when the transport runs dry.
fn read_payload<T: Transport + ?Sized>(transport: &mut T, length: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(length.min(BULK_READ_CHUNK));
    while data.len() < length {
        let start = data.len();
        let end = length.min(start + BULK_READ_CHUNK);
        data.resize(end, 0);

        let got = transport.read_into(&mut data[start..end]);
        if got != end - start {
            data.truncate(start + got);
            break;
        }
    }
    data
}

fn read_integer_line<T: Transport + ?Sized>(transport: &mut T) -> DecodeResult<i64> {
    let text = read_text_line(transport)?;
    text.parse()
        .map_err(|_| InternalError::malformed(format!("invalid integer: {:?}", text)))
}

/// Blocking decode of a single value with a fresh decoder.
pub fn decode_value<T: Transport + ?Sized>(transport: &mut T) -> RespValue {
    RespDecoder::new().decode(transport)
}

/// Non-blocking single step with a fresh decoder.
pub fn poll_value<T: Transport + ?Sized>(transport: &mut T) -> Option<RespValue> {
    RespDecoder::new().poll(transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::InternalErrorCode;
    use crate::transport::MemoryTransport;

    fn decode_bytes(input: &[u8]) -> (RespValue, MemoryTransport) {
        let mut transport = MemoryTransport::with_input(input);
        let value = decode_value(&mut transport);
        (value, transport)
    }

    fn assert_malformed(value: &RespValue) {
        match value {
            RespValue::InternalError(err) => {
                assert_eq!(err.code, InternalErrorCode::UnknownError);
                assert!(err.detail.is_some());
            }
            other => panic!("expected a malformed-input error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_simple_string() {
        let (value, transport) = decode_bytes(b"+OK\r\n");
        assert_eq!(value, RespValue::simple_string("OK"));
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn test_decode_error_is_data() {
        let (value, _) = decode_bytes(b"-ERR unknown command\r\n");
        assert_eq!(value, RespValue::error("ERR unknown command"));
        assert!(!value.is_internal_error());
    }

    #[test]
    fn test_decode_integers() {
        assert_eq!(decode_bytes(b":1000\r\n").0, RespValue::Integer(1000));
        assert_eq!(decode_bytes(b":-42\r\n").0, RespValue::Integer(-42));
    }

    #[test]
    fn test_decode_bulk_string() {
        let (value, transport) = decode_bytes(b"$5\r\nhello\r\n");
        assert_eq!(value, RespValue::bulk_string("hello"));
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn test_decode_nil_and_empty_bulk_string() {
        let (nil, transport) = decode_bytes(b"$-1\r\n:1\r\n");
        assert_eq!(nil, RespValue::nil_bulk_string());
        // no payload and no trailing CRLF are consumed for nil
        assert_eq!(transport.remaining_bytes(), b":1\r\n");

        let (empty, _) = decode_bytes(b"$0\r\n\r\n");
        assert_eq!(empty, RespValue::bulk_string(""));
        assert_ne!(nil, empty);
    }

    #[test]
    fn test_bulk_string_consumes_exactly_declared_bytes() {
        let payloads: [&[u8]; 5] = [b"", b"\r\n", b"a\r\nb", b"\x00\x00\r", b"\n\n\n\n\n\n"];
        for payload in payloads {
            let mut input = format!("${}\r\n", payload.len()).into_bytes();
            input.extend_from_slice(payload);
            input.extend_from_slice(b"\r\n+NEXT\r\n");

            let (value, transport) = decode_bytes(&input);
            assert_eq!(value, RespValue::bulk_string(Bytes::copy_from_slice(payload)));
            assert_eq!(transport.remaining_bytes(), b"+NEXT\r\n");
        }
    }

    #[test]
    fn test_decode_arrays() {
        let (value, _) = decode_bytes(b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n");
        assert_eq!(
            value,
            RespValue::array(vec![RespValue::bulk_string("GET"), RespValue::bulk_string("name")])
        );

        assert_eq!(decode_bytes(b"*-1\r\n").0, RespValue::nil_array());
        assert_eq!(decode_bytes(b"*0\r\n").0, RespValue::array(vec![]));
    }

    #[test]
    fn test_decode_nested_array() {
        let (value, transport) = decode_bytes(b"*2\r\n*1\r\n$1\r\na\r\n:5\r\n");
        assert_eq!(
            value,
            RespValue::array(vec![
                RespValue::array(vec![RespValue::bulk_string("a")]),
                RespValue::Integer(5),
            ])
        );
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn test_decode_mixed_array() {
        let (value, _) = decode_bytes(b"*4\r\n+OK\r\n:100\r\n$-1\r\n-ERR bad\r\n");
        assert_eq!(
            value,
            RespValue::array(vec![
                RespValue::simple_string("OK"),
                RespValue::Integer(100),
                RespValue::nil_bulk_string(),
                RespValue::error("ERR bad"),
            ])
        );
    }

    #[test]
    fn test_leaves_following_bytes_untouched() {
        let mut transport = MemoryTransport::with_input(b":1\r\n:2\r\n");
        let mut decoder = RespDecoder::new();
        assert_eq!(decoder.decode(&mut transport), RespValue::Integer(1));
        assert_eq!(transport.remaining_bytes(), b":2\r\n");
        assert_eq!(decoder.decode(&mut transport), RespValue::Integer(2));
    }

    #[test]
    fn test_reencode_reproduces_bytes() {
        let inputs: [&[u8]; 6] = [
            b"+OK\r\n",
            b":-7\r\n",
            b"$3\r\na\x00b\r\n",
            b"$-1\r\n",
            b"*-1\r\n",
            b"*3\r\n$1\r\nx\r\n*0\r\n*1\r\n:0\r\n",
        ];
        for input in inputs {
            let (value, _) = decode_bytes(input);
            assert_eq!(value.serialize().unwrap(), input);
        }
    }

    #[test]
    fn test_unknown_type() {
        let (value, _) = decode_bytes(b"@oops\r\n");
        assert_eq!(value, RespValue::InternalError(InternalError::unknown_type(b'@')));
    }

    #[test]
    fn test_invalid_integer() {
        assert_malformed(&decode_bytes(b":not_a_number\r\n").0);
    }

    #[test]
    fn test_invalid_lengths() {
        assert_malformed(&decode_bytes(b"$-2\r\n").0);
        assert_malformed(&decode_bytes(b"*-5\r\n").0);
    }

    #[test]
    fn test_missing_lf() {
        assert_malformed(&decode_bytes(b"+OK\rX").0);
    }

    #[test]
    fn test_bulk_string_missing_terminator() {
        assert_malformed(&decode_bytes(b"$2\r\nhiXX").0);
    }

    #[test]
    fn test_short_bulk_read_on_live_transport() {
        assert_malformed(&decode_bytes(b"$10\r\nshort").0);
    }

    #[test]
    fn test_oversized_bulk_header_is_not_preallocated() {
        let value = decode_bytes(b"$100000000\r\nabc").0;
        let err = value.as_internal_error().unwrap();
        assert_eq!(err.detail.as_deref(), Some("short read: expected 100000000 bytes, got 3"));

        let mut transport = MemoryTransport::with_input(b"abc");
        let data = read_payload(&mut transport, 100_000_000);
        assert_eq!(data, b"abc");
        assert!(data.capacity() <= 2 * BULK_READ_CHUNK);
    }

    #[test]
    fn test_bulk_larger_than_one_chunk() {
        let payload = vec![b'z'; BULK_READ_CHUNK * 2 + 7];
        let mut input = format!("${}\r\n", payload.len()).into_bytes();
        input.extend_from_slice(&payload);
        input.extend_from_slice(b"\r\n");

        let (value, transport) = decode_bytes(&input);
        assert_eq!(value.as_bytes().map(|b| b.len()), Some(payload.len()));
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn test_short_bulk_read_on_closing_transport() {
        let mut transport = MemoryTransport::with_input(b"$10\r\nshort").disconnect_when_drained();
        let value = decode_value(&mut transport);
        let err = value.as_internal_error().unwrap();
        assert!(err.is_disconnected());
    }

    #[test]
    fn test_not_connected_reads_nothing() {
        let mut transport = MemoryTransport::with_input(b"+OK\r\n");
        transport.set_connected(false);
        assert_eq!(
            decode_value(&mut transport),
            RespValue::InternalError(InternalError::disconnected())
        );
        assert_eq!(transport.remaining(), 5);
    }

    #[test]
    fn test_nesting_depth_limit() {
        let mut input = Vec::new();
        for _ in 0..=MAX_NESTING_DEPTH {
            input.extend_from_slice(b"*1\r\n");
        }
        input.extend_from_slice(b":1\r\n");
        assert_malformed(&decode_bytes(&input).0);
    }

    #[test]
    fn test_poll_without_data() {
        let mut transport = MemoryTransport::new();
        assert_eq!(poll_value(&mut transport), None);
    }

    #[test]
    fn test_poll_skips_frame_noise() {
        let mut transport = MemoryTransport::with_input(b"\r\n\n:9\r\n:10\r\n");
        let mut decoder = RespDecoder::new();
        assert_eq!(decoder.poll(&mut transport), Some(RespValue::Integer(9)));
        assert_eq!(transport.remaining_bytes(), b":10\r\n");
    }

    #[test]
    fn test_poll_noise_only() {
        let mut transport = MemoryTransport::with_input(b"\r\n");
        assert_eq!(poll_value(&mut transport), None);
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn test_poll_disconnected() {
        let mut transport = MemoryTransport::new().disconnect_when_drained();
        assert_eq!(
            poll_value(&mut transport),
            Some(RespValue::InternalError(InternalError::disconnected()))
        );
    }

    #[test]
    fn test_poll_reads_full_array() {
        let mut transport = MemoryTransport::with_input(b"*3\r\n$7\r\nmessage\r\n$4\r\nchan\r\n$7\r\npayload\r\n");
        let value = poll_value(&mut transport).unwrap();
        assert_eq!(value.to_text_list(), vec!["message", "chan", "payload"]);
    }
}
