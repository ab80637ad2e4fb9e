//! Command Builder
//!
//! A command is a RESP array whose elements are all bulk strings, the first
//! one being the command name:
//!
//! ```text
//! SET k v  =>  *3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n
//! ```
//!
//! A [`Command`] is built once and cannot be changed afterwards. Issuing it
//! consumes it, so a command is never shared between two requests.

use crate::protocol::types::{prefix, write_bulk, write_header, RespValue};
use bytes::Bytes;
use std::fmt;

/// Ordered, caller-supplied text arguments.
pub type ArgList = Vec<String>;

/// An immutable Redis command ready to be written to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Element 0 is the command name
    parts: Vec<Bytes>,
}

impl Command {
    /// Builds a command from a name and its arguments.
    ///
    /// Every argument is copied into its own bulk string.
    ///
    /// # Example
    /// ```
    /// use flashkv_client::protocol::Command;
    ///
    /// let cmd = Command::new("SET", ["k", "v"]);
    /// assert_eq!(cmd.serialize(), b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n");
    /// ```
    pub fn new<I, A>(name: &str, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        let args = args.into_iter();
        let mut parts = Vec::with_capacity(1 + args.size_hint().0);
        parts.push(Bytes::copy_from_slice(name.as_bytes()));
        parts.extend(args.map(|arg| Bytes::copy_from_slice(arg.as_ref())));
        Self { parts }
    }

    /// Builds a command that takes no arguments, e.g. `PING`.
    pub fn bare(name: &str) -> Self {
        Self::new(name, std::iter::empty::<&[u8]>())
    }

    /// The command name as text.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.parts[0]).into_owned()
    }

    /// The arguments following the command name.
    pub fn args(&self) -> &[Bytes] {
        &self.parts[1..]
    }

    /// Renders the command into its wire form.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.serialize_into(&mut buf);
        buf
    }

    /// Renders the command into an existing buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        write_header(buf, prefix::ARRAY, self.parts.len());
        for part in &self.parts {
            write_bulk(buf, part);
        }
    }

    /// Converts the command into the equivalent RESP array.
    pub fn into_value(self) -> RespValue {
        RespValue::array(self.parts.into_iter().map(RespValue::bulk_string).collect())
    }

    fn encoded_len(&self) -> usize {
        // "*<n>\r\n" plus "$<len>\r\n<data>\r\n" per part, headers estimated
        let headers = 16 * (self.parts.len() + 1);
        headers + self.parts.iter().map(|p| p.len() + 2).sum::<usize>()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", String::from_utf8_lossy(part))?;
        }
        Ok(())
    }
}
