//! Redis Facade
//!
//! [`Redis`] is the type applications hold on to. It wraps a [`Client`] and
//! adds one method per Redis command (see the `commands` module) plus the
//! publish/subscribe loop (see the `pubsub` module).
//!
//! ## Example
//!
//! ```no_run
//! use flashkv_client::{ClientConfig, Redis};
//!
//! let config = ClientConfig::from_url("redis://localhost:6379").unwrap();
//! let mut redis = Redis::connect(&config).unwrap();
//!
//! redis.set("name", "Ariz");
//! assert_eq!(redis.get("name").as_deref(), Some("Ariz"));
//! ```

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::protocol::{Command, RespDecoder, RespValue};
use crate::pubsub::SubSpec;
use crate::transport::{TcpTransport, Transport};
use tracing::{info, warn};

/// A Redis connection with one method per supported command.
#[derive(Debug)]
pub struct Redis<T: Transport> {
    pub(crate) client: Client<T>,
    /// Subscriptions to (re)issue when the subscribe loop starts
    pub(crate) subscriptions: Vec<SubSpec>,
    /// Set while the subscribe loop owns the connection
    pub(crate) subscriber_mode: bool,
    /// Cleared by `stop_subscribing`; checked once per loop iteration
    pub(crate) running: bool,
}

impl Redis<TcpTransport> {
    /// Opens a TCP connection, authenticates if a password is configured and
    /// selects the configured database.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let mut transport = TcpTransport::with_options(config.tcp_options());
        transport.connect(&config.host, config.port)?;

        let decoder = RespDecoder::with_poll_interval(config.poll_interval);
        let mut redis = Redis::from_client(Client::with_decoder(transport, decoder));

        if let Some(password) = &config.password {
            redis.authenticate(password)?;
        }
        if config.database != 0 && !redis.select(config.database) {
            return Err(Error::SelectFailure(config.database));
        }

        info!(address = %config.address(), "Redis connection ready");
        Ok(redis)
    }
}

impl<T: Transport> Redis<T> {
    /// Wraps an already connected transport.
    pub fn new(transport: T) -> Self {
        Self::from_client(Client::new(transport))
    }

    pub fn from_client(client: Client<T>) -> Self {
        Self {
            client,
            subscriptions: Vec::new(),
            subscriber_mode: false,
            running: false,
        }
    }

    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    /// Raw access for commands without a dedicated method.
    pub fn client_mut(&mut self) -> &mut Client<T> {
        &mut self.client
    }

    pub fn into_client(self) -> Client<T> {
        self.client
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Sends `AUTH <password>`.
    pub fn authenticate(&mut self, password: &str) -> Result<()> {
        if !self.client.is_connected() {
            return Err(Error::NotConnected);
        }

        match self.client.issue(Command::new("AUTH", [password])) {
            RespValue::SimpleString(s) if s.contains("OK") => Ok(()),
            RespValue::InternalError(e) if e.is_disconnected() => Err(Error::NotConnected),
            RespValue::InternalError(e) => Err(Error::Internal(e)),
            other => {
                warn!(reply = %other, "Authentication rejected");
                Err(Error::AuthFailure(other.to_text()))
            }
        }
    }

    /// Closes the underlying transport.
    pub fn close(&mut self) {
        self.client.transport_mut().stop();
    }
}
