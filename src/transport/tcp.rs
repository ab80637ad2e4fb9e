//! TCP Transport
//!
//! A blocking [`Transport`] over `std::net::TcpStream`.
//!
//! Reads go through a `BufReader`, so the byte-at-a-time interface the
//! decoder uses does not turn into one syscall per byte. `available()` first
//! looks at the read buffer and only then peeks the socket in non-blocking
//! mode.
//!
//! Reads block for at most the configured read timeout; a timed-out read
//! returns `None` but leaves the connection up. End of stream and hard I/O
//! errors mark the transport as disconnected. So does a `write_all` that
//! fails after part of the buffer went out, since the server would read the
//! rest of the stream as garbage.

use crate::transport::Transport;
use std::io::{self, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Initial read buffer capacity
const READ_BUFFER_SIZE: usize = 4096;

/// Socket options applied when the connection is opened.
#[derive(Debug, Clone)]
pub struct TcpOptions {
    /// Upper bound for a single blocking read (None blocks forever)
    pub read_timeout: Option<Duration>,
    /// Upper bound for a single blocking write (None blocks forever)
    pub write_timeout: Option<Duration>,
    /// Upper bound for establishing the connection (None uses the OS default)
    pub connect_timeout: Option<Duration>,
    /// Disable Nagle's algorithm
    pub nodelay: bool,
}

impl Default for TcpOptions {
    fn default() -> Self {
        Self {
            read_timeout: Some(Duration::from_secs(1)),
            write_timeout: Some(Duration::from_secs(1)),
            connect_timeout: Some(Duration::from_secs(5)),
            nodelay: true,
        }
    }
}

#[derive(Debug)]
pub struct TcpTransport {
    reader: Option<BufReader<TcpStream>>,
    options: TcpOptions,
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpTransport {
    /// Creates an unconnected transport with default options.
    pub fn new() -> Self {
        Self::with_options(TcpOptions::default())
    }

    pub fn with_options(options: TcpOptions) -> Self {
        Self {
            reader: None,
            options,
        }
    }

    /// Options only take effect on the next `connect`.
    pub fn options_mut(&mut self) -> &mut TcpOptions {
        &mut self.options
    }

    fn open(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in (host, port).to_socket_addrs()? {
            let attempt = match self.options.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!(%addr, error = %e, "Connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "host resolved to no addresses")
        }))
    }

    fn close(&mut self, reason: &str) {
        if self.reader.take().is_some() {
            debug!(reason, "TCP transport closed");
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

impl Transport for TcpTransport {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        self.close("reconnecting");

        let stream = self.open(host, port)?;
        stream.set_nodelay(self.options.nodelay)?;
        stream.set_read_timeout(self.options.read_timeout)?;
        stream.set_write_timeout(self.options.write_timeout)?;

        info!(host, port, "Connected");
        self.reader = Some(BufReader::with_capacity(READ_BUFFER_SIZE, stream));
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "not connected"));
        };

        match reader.get_mut().write(buf) {
            Ok(n) => {
                trace!(bytes = n, "Wrote data");
                Ok(n)
            }
            Err(e) => {
                if !is_timeout(&e) && e.kind() != io::ErrorKind::Interrupted {
                    warn!(error = %e, "Write failed");
                    self.close("write failed");
                }
                Err(e)
            }
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut written = 0;
        while written < buf.len() {
            let err = match self.write(&buf[written..]) {
                Ok(0) => io::Error::new(io::ErrorKind::WriteZero, "transport accepted zero bytes"),
                Ok(n) => {
                    written += n;
                    continue;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => e,
            };

            if written > 0 && self.connected() {
                warn!(error = %err, written, wanted = buf.len(), "Partial write");
                self.close("partial write");
            }
            return Err(err);
        }
        Ok(())
    }

    fn read(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        (self.read_into(&mut byte) == 1).then_some(byte[0])
    }

    fn read_into(&mut self, buf: &mut [u8]) -> usize {
        let mut filled = 0;
        while filled < buf.len() {
            let Some(reader) = self.reader.as_mut() else {
                break;
            };
            match reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.close("end of stream");
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if is_timeout(&e) => {
                    trace!(wanted = buf.len(), got = filled, "Read timed out");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Read failed");
                    self.close("read failed");
                    break;
                }
            }
        }
        filled
    }

    fn available(&mut self) -> bool {
        let Some(reader) = self.reader.as_mut() else {
            return false;
        };
        if !reader.buffer().is_empty() {
            return true;
        }

        let stream = reader.get_ref();
        let mut peek_buf = [0u8; 1];
        let peeked = stream
            .set_nonblocking(true)
            .and_then(|_| stream.peek(&mut peek_buf));
        let restored = stream.set_nonblocking(false);

        match (peeked, restored) {
            (_, Err(e)) => {
                warn!(error = %e, "Failed to restore blocking mode");
                self.close("socket option failure");
                false
            }
            (Ok(0), _) => {
                self.close("end of stream");
                false
            }
            (Ok(_), _) => true,
            (Err(e), _) if is_timeout(&e) || e.kind() == io::ErrorKind::Interrupted => false,
            (Err(e), _) => {
                warn!(error = %e, "Peek failed");
                self.close("peek failed");
                false
            }
        }
    }

    fn connected(&self) -> bool {
        self.reader.is_some()
    }

    fn stop(&mut self) {
        if let Some(reader) = self.reader.as_mut() {
            let _ = reader.get_mut().flush();
            let _ = reader.get_ref().shutdown(std::net::Shutdown::Both);
        }
        self.close("stopped");
    }
}
