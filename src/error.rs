//! Crate-level errors.
//!
//! Protocol and transport failures inside a single request are reported as
//! [`InternalError`] values, the way the decoder produces them. This type
//! covers the operations around requests: opening a connection, loading
//! configuration and authenticating.

use crate::protocol::InternalError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while opening the connection
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A `redis://` URL that could not be parsed
    #[error("invalid Redis URL: {0}")]
    InvalidUrl(String),

    /// The transport is not connected
    #[error("not connected")]
    NotConnected,

    /// The server rejected the credentials
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// The server refused to switch to the configured database
    #[error("could not select database {0}")]
    SelectFailure(u32),

    /// A client-local protocol failure
    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
}

pub type Result<T> = std::result::Result<T, Error>;
