//! Client Configuration
//!
//! Connection settings for [`Redis::connect`](crate::Redis::connect).
//!
//! Settings can be built by hand, parsed from a URL of the form
//! `redis://[password@]host[:port][/db]`, or read from the environment:
//!
//! - `REDIS_URL`: a full URL, takes precedence
//! - `REDIS_HOST`, `REDIS_PORT`, `REDIS_AUTH`: individual settings

use crate::error::{Error, Result};
use crate::transport::tcp::TcpOptions;
use std::fmt;
use std::time::Duration;

/// The default port (same as Redis)
pub const DEFAULT_PORT: u16 = 6379;

/// The default host
pub const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Sent with AUTH right after connecting
    pub password: Option<String>,
    /// Database index selected after connecting; 0 sends nothing
    pub database: u32,
    /// Upper bound for one blocking socket read
    pub read_timeout: Option<Duration>,
    /// Upper bound for one blocking socket write
    pub write_timeout: Option<Duration>,
    /// Upper bound for establishing the connection
    pub connect_timeout: Option<Duration>,
    /// Disable Nagle's algorithm
    pub nodelay: bool,
    /// Pause between availability checks while waiting for a reply, and
    /// between idle iterations of the subscribe loop
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let tcp = TcpOptions::default();
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            password: None,
            database: 0,
            read_timeout: tcp.read_timeout,
            write_timeout: tcp.write_timeout,
            connect_timeout: tcp.connect_timeout,
            nodelay: tcp.nodelay,
            poll_interval: Duration::from_millis(1),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("database", &self.database)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("nodelay", &self.nodelay)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl ClientConfig {
    /// Parses `redis://[password@]host[:port][/db]`.
    ///
    /// # Example
    /// ```
    /// use flashkv_client::ClientConfig;
    ///
    /// let config = ClientConfig::from_url("redis://secret@cache.local:6380").unwrap();
    /// assert_eq!(config.host, "cache.local");
    /// assert_eq!(config.port, 6380);
    /// assert_eq!(config.password.as_deref(), Some("secret"));
    /// ```
    pub fn from_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("redis://")
            .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

        let mut config = Self::default();

        let host_port = match rest.rsplit_once('@') {
            Some((password, host_port)) => {
                // "user:password@" is accepted; only the password is used
                let password = password.rsplit_once(':').map_or(password, |(_, p)| p);
                if !password.is_empty() {
                    config.password = Some(password.to_string());
                }
                host_port
            }
            None => rest,
        };
        let host_port = match host_port.split_once('/') {
            Some((host_port, db)) => {
                if !db.is_empty() {
                    config.database = db
                        .parse()
                        .map_err(|_| Error::InvalidUrl(format!("invalid database: {}", db)))?;
                }
                host_port
            }
            None => host_port,
        };

        match host_port.rsplit_once(':') {
            Some((host, port)) => {
                config.port = port
                    .parse()
                    .map_err(|_| Error::InvalidUrl(format!("invalid port: {}", port)))?;
                if !host.is_empty() {
                    config.host = host.to_string();
                }
            }
            None if !host_port.is_empty() => config.host = host_port.to_string(),
            None => {}
        }

        Ok(config)
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("REDIS_URL") {
            return Self::from_url(&url);
        }

        let mut config = Self::default();
        if let Some(host) = lookup("REDIS_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("REDIS_PORT") {
            config.port = port
                .parse()
                .map_err(|_| Error::InvalidUrl(format!("invalid port: {}", port)))?;
        }
        config.password = lookup("REDIS_AUTH").filter(|p| !p.is_empty());
        Ok(config)
    }

    /// Returns the address as `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Socket options for [`TcpTransport`](crate::transport::TcpTransport).
    pub fn tcp_options(&self) -> TcpOptions {
        TcpOptions {
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
            connect_timeout: self.connect_timeout,
            nodelay: self.nodelay,
        }
    }
}
