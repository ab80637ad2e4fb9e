//! Command Coordinator
//!
//! A [`Client`] runs the request/response unit of work: one command written,
//! one reply read back. It has no queue and no pipelining, so there is never
//! more than one request in flight.
//!
//! ```text
//! Command ──serialize──> Transport ──> server
//!                                        │
//! RespValue <──decode─── Transport <─────┘
//! ```
//!
//! On top of the raw [`Client::issue`] it offers typed views of the reply:
//! text, integer, boolean and "did the server say OK".
//!
//! ## Failure Tiers
//!
//! - Transport down: `InternalError(Disconnected)`, no bytes are written.
//! - Malformed reply: `InternalError` from the decoder, passed through.
//! - Server `-ERR`: a normal [`RespValue::Error`]. The typed helpers turn it
//!   into `false`, [`INTEGER_SENTINEL`] or its text.
//!
//! Internal errors are also kept as [`Client::last_error`] for later
//! inspection. Nothing is retried.

use crate::protocol::{Command, InternalError, RespDecoder, RespValue};
use crate::transport::Transport;
use tracing::{debug, trace, warn};

/// Returned by [`Client::issue_as_integer`] when the reply is not an integer.
///
/// Redis never replies with `i64::MIN` to the integer commands the facade
/// issues (counts, lengths, TTLs, indexes). Callers that only need pass/fail
/// should use [`Client::issue_as_bool`] instead.
pub const INTEGER_SENTINEL: i64 = i64::MIN;

/// Issues commands over a transport it owns.
#[derive(Debug)]
pub struct Client<T: Transport> {
    transport: T,
    decoder: RespDecoder,
    last_error: Option<InternalError>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_decoder(transport, RespDecoder::new())
    }

    pub fn with_decoder(transport: T, decoder: RespDecoder) -> Self {
        Self {
            transport,
            decoder,
            last_error: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn is_connected(&self) -> bool {
        self.transport.connected()
    }

    /// The most recent client-local failure, if any.
    pub fn last_error(&self) -> Option<&InternalError> {
        self.last_error.as_ref()
    }

    /// Returns and clears the most recent client-local failure.
    pub fn take_last_error(&mut self) -> Option<InternalError> {
        self.last_error.take()
    }

    /// Writes `command` and reads exactly one reply.
    ///
    /// Fails fast with `InternalError(Disconnected)` when the transport is
    /// down. Internal errors are recorded and returned unchanged otherwise.
    pub fn issue(&mut self, command: Command) -> RespValue {
        if let Err(err) = self.send(&command) {
            return err.into();
        }

        match self.decoder.decode(&mut self.transport) {
            RespValue::InternalError(err) => self.record(issuing(&command.name()), err).into(),
            reply => {
                if let RespValue::Error(msg) = &reply {
                    debug!(command = %command.name(), error = %msg, "Server returned an error");
                }
                reply
            }
        }
    }

    /// Writes `command` without waiting for a reply.
    ///
    /// Used where replies arrive out of band, as in the subscribe loop. A
    /// failed write is recorded like in [`Client::issue`].
    pub fn send(&mut self, command: &Command) -> Result<(), InternalError> {
        let name = command.name();

        if !self.transport.connected() {
            return Err(self.record(issuing(&name), InternalError::disconnected()));
        }

        let wire = command.serialize();
        trace!(command = %name, bytes = wire.len(), "Sending command");

        if let Err(e) = self.transport.write_all(&wire) {
            let detail = format!("write failed: {}", e);
            let err = if self.transport.connected() {
                InternalError::malformed(detail)
            } else {
                InternalError::disconnected().with_detail(detail)
            };
            return Err(self.record(issuing(&name), err));
        }
        Ok(())
    }

    /// Blocks until one value has been read.
    ///
    /// Internal errors are recorded like in [`Client::issue`].
    pub fn receive(&mut self) -> RespValue {
        match self.decoder.decode(&mut self.transport) {
            RespValue::InternalError(err) => self.record("while receiving".to_string(), err).into(),
            value => value,
        }
    }

    /// Issues `command` and returns the text view of the reply.
    pub fn issue_as_text(&mut self, command: Command) -> String {
        self.issue(command).to_text()
    }

    /// Issues `command` and returns its integer reply, or
    /// [`INTEGER_SENTINEL`] for any other reply type.
    pub fn issue_as_integer(&mut self, command: Command) -> i64 {
        match self.issue(command) {
            RespValue::Integer(n) => n,
            _ => INTEGER_SENTINEL,
        }
    }

    /// True iff the reply is a nonzero integer.
    pub fn issue_as_bool(&mut self, command: Command) -> bool {
        matches!(self.issue(command), RespValue::Integer(n) if n != 0)
    }

    /// True iff the reply text contains "OK".
    ///
    /// Error replies never count as OK, whatever their text says.
    pub fn expect_ok(&mut self, command: Command) -> bool {
        match self.issue(command) {
            RespValue::Error(_) | RespValue::InternalError(_) => false,
            reply => reply.to_text().contains("OK"),
        }
    }

    /// Reads one value if one is ready, without blocking.
    ///
    /// Internal errors are recorded like in [`Client::issue`].
    pub fn poll(&mut self) -> Option<RespValue> {
        match self.decoder.poll(&mut self.transport)? {
            RespValue::InternalError(err) => {
                Some(self.record("while polling".to_string(), err).into())
            }
            value => Some(value),
        }
    }

    /// The decoder's configured idle pause.
    pub fn poll_interval(&self) -> std::time::Duration {
        self.decoder.poll_interval()
    }

    fn record(&mut self, context: String, err: InternalError) -> InternalError {
        let err = err.with_detail(context);
        warn!(error = %err, "Internal error");
        self.last_error = Some(err.clone());
        err
    }
}

fn issuing(name: &str) -> String {
    format!("while issuing {}", name)
}
