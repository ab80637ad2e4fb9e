//! Transport Module
//!
//! The client never talks to a socket directly. Everything it needs from the
//! environment is captured by the [`Transport`] trait: connect, write bytes,
//! read one byte, ask whether a byte is ready, ask whether the link is up,
//! and shut it down.
//!
//! ## Implementations
//!
//! - [`TcpTransport`]: a blocking `std::net::TcpStream` with a read buffer
//! - [`MemoryTransport`]: a scripted in-memory byte stream, handy for tests
//!   and for driving the decoder from canned server output
//!
//! Serial links, TLS wrappers and the like only need to implement the trait.

pub mod memory;
pub mod tcp;

pub use memory::MemoryTransport;
pub use tcp::TcpTransport;

use std::io;

/// A byte-stream connection to a server.
///
/// Reads are byte-oriented. `read` may block for as long as the
/// implementation's own timeout allows; returning `None` means no byte could
/// be produced (timeout, end of stream or failure). After end of stream or a
/// failure, `connected` must report `false`.
pub trait Transport {
    /// Opens the connection.
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()>;

    /// Writes some bytes, returning how many were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Reads a single byte.
    fn read(&mut self) -> Option<u8>;

    /// Returns true if at least one byte can be read without blocking.
    fn available(&mut self) -> bool;

    /// Returns true while the connection is usable.
    fn connected(&self) -> bool;

    /// Closes the connection.
    fn stop(&mut self);

    /// Writes the whole buffer.
    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "transport accepted zero bytes",
                    ))
                }
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }

    /// Reads up to `buf.len()` bytes, stopping early when `read` yields
    /// nothing. Returns the number of bytes stored.
    ///
    /// Implementations with their own buffering should override this.
    fn read_into(&mut self, buf: &mut [u8]) -> usize {
        for (filled, slot) in buf.iter_mut().enumerate() {
            match self.read() {
                Some(b) => *slot = b,
                None => return filled,
            }
        }
        buf.len()
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        (**self).connect(host, port)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }

    fn available(&mut self) -> bool {
        (**self).available()
    }

    fn connected(&self) -> bool {
        (**self).connected()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_all(buf)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> usize {
        (**self).read_into(buf)
    }
}
