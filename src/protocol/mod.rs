//! RESP Protocol Implementation
//!
//! This module provides the client side of the Redis Serialization Protocol
//! (RESP).
//!
//! ## Overview
//!
//! RESP is a simple, binary-safe protocol used by Redis for client-server communication.
//! It supports several data types and is designed to be easy to parse and serialize.
//!
//! ## Modules
//!
//! - `types`: Defines the `RespValue` enum, serialization and coercions
//! - `decoder`: Streaming decoder reading values straight off a transport
//! - `command`: Immutable command builder
//!
//! ## Example
//!
//! ```
//! use flashkv_client::protocol::{Command, RespDecoder, RespValue};
//! use flashkv_client::transport::MemoryTransport;
//!
//! // Building a request
//! let bytes = Command::new("GET", ["name"]).serialize();
//! assert_eq!(bytes, b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n");
//!
//! // Decoding a reply
//! let mut transport = MemoryTransport::with_input(b"$4\r\nAriz\r\n");
//! let value = RespDecoder::new().decode(&mut transport);
//! assert_eq!(value, RespValue::bulk_string("Ariz"));
//! ```

pub mod command;
pub mod decoder;
pub mod types;

// Re-export commonly used types for convenience
pub use command::{ArgList, Command};
pub use decoder::{decode_value, poll_value, RespDecoder};
pub use types::{EncodeError, InternalError, InternalErrorCode, RespValue};
