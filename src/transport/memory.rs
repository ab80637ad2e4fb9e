//! In-Memory Transport
//!
//! A transport backed by two byte queues instead of a socket. Bytes fed with
//! [`MemoryTransport::feed`] are what the "server" says; everything the client
//! writes is collected and can be inspected with [`MemoryTransport::written`].
//!
//! By default the transport stays connected when its inbound queue runs dry,
//! exactly like an idle socket. [`MemoryTransport::disconnect_when_drained`]
//! makes it behave like a server that hangs up after its last byte.

use crate::transport::Transport;
use std::collections::VecDeque;
use std::io;

#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    connected: bool,
    close_when_drained: bool,
}

impl MemoryTransport {
    /// Creates a connected transport with nothing to read.
    pub fn new() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// Creates a connected transport preloaded with server output.
    pub fn with_input(bytes: impl AsRef<[u8]>) -> Self {
        let mut transport = Self::new();
        transport.feed(bytes);
        transport
    }

    /// Creates a transport that has not been connected yet.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Report a disconnect once every inbound byte has been read.
    pub fn disconnect_when_drained(mut self) -> Self {
        self.close_when_drained = true;
        self
    }

    /// Appends bytes to the inbound queue.
    pub fn feed(&mut self, bytes: impl AsRef<[u8]>) {
        self.inbound.extend(bytes.as_ref());
    }

    /// Everything the client has written so far.
    pub fn written(&self) -> &[u8] {
        &self.outbound
    }

    /// Returns and clears everything written so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outbound)
    }

    /// Number of inbound bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.inbound.len()
    }

    /// The inbound bytes not yet consumed.
    pub fn remaining_bytes(&self) -> Vec<u8> {
        self.inbound.iter().copied().collect()
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Transport for MemoryTransport {
    fn connect(&mut self, _host: &str, _port: u16) -> io::Result<()> {
        self.connected = true;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.connected() {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "transport closed"));
        }
        self.outbound.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn read(&mut self) -> Option<u8> {
        if !self.connected {
            return None;
        }
        self.inbound.pop_front()
    }

    fn available(&mut self) -> bool {
        self.connected && !self.inbound.is_empty()
    }

    fn connected(&self) -> bool {
        self.connected && !(self.close_when_drained && self.inbound.is_empty())
    }

    fn stop(&mut self) {
        self.connected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_fed_bytes_in_order() {
        let mut transport = MemoryTransport::with_input(b"ab");
        assert!(transport.available());
        assert_eq!(transport.read(), Some(b'a'));
        assert_eq!(transport.read(), Some(b'b'));
        assert_eq!(transport.read(), None);
        assert!(!transport.available());
        assert!(transport.connected());
    }

    #[test]
    fn test_collects_written_bytes() {
        let mut transport = MemoryTransport::new();
        transport.write_all(b"*1\r\n").unwrap();
        transport.write_all(b"$4\r\nPING\r\n").unwrap();
        assert_eq!(transport.take_written(), b"*1\r\n$4\r\nPING\r\n");
        assert!(transport.written().is_empty());
    }

    #[test]
    fn test_disconnect_when_drained() {
        let mut transport = MemoryTransport::with_input(b"x").disconnect_when_drained();
        assert!(transport.connected());
        assert_eq!(transport.read(), Some(b'x'));
        assert!(!transport.connected());
        assert!(transport.write(b"late").is_err());
    }

    #[test]
    fn test_read_into_stops_short() {
        let mut transport = MemoryTransport::with_input(b"abc");
        let mut buf = [0u8; 5];
        assert_eq!(transport.read_into(&mut buf), 3);
        assert_eq!(&buf[..3], b"abc");
    }

    #[test]
    fn test_stop_and_reconnect() {
        let mut transport = MemoryTransport::new();
        transport.stop();
        assert!(!transport.connected());
        transport.connect("localhost", 6379).unwrap();
        assert!(transport.connected());
    }
}
