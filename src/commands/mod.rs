//! Command Facade
//!
//! One method on [`Redis`](crate::Redis) per supported Redis command. Every
//! method is a thin composition over the coordinator: build a
//! [`Command`](crate::protocol::Command), issue it, and pick the typed view
//! the command's reply calls for.
//!
//! ## Architecture
//!
//! ```text
//!   redis.hget("user:1", "name")
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Facade method  │  (this module)
//! │  - build args   │
//! │  - pick view    │
//! └────────┬────────┘
//!          │  Command
//!          ▼
//! ┌─────────────────┐
//! │     Client      │  (one write, one read)
//! └────────┬────────┘
//!          │
//!          ▼
//!      Transport
//! ```
//!
//! ## Reply Views
//!
//! | Reply kind            | Method returns                               |
//! |-----------------------|----------------------------------------------|
//! | `+OK`                 | `bool` (did the server say OK)               |
//! | `:0` / `:1`           | `bool`                                       |
//! | `:<n>` counts, TTLs   | `i64`, [`INTEGER_SENTINEL`] on failure       |
//! | bulk string or nil    | `Option<String>`, nil and errors give `None` |
//! | flat array of strings | `Vec<String>`                                |
//! | nested replies        | the raw [`RespValue`](crate::RespValue)      |
//!
//! [`INTEGER_SENTINEL`]: crate::client::INTEGER_SENTINEL
//!
//! ## Supported Commands
//!
//! ### Key Commands
//! - `DEL`, `EXISTS`, `PERSIST`
//! - `EXPIRE`, `PEXPIRE`, `EXPIREAT`, `PEXPIREAT`
//! - `TTL`, `PTTL`
//!
//! ### String Commands
//! - `SET`, `GET`, `APPEND`
//!
//! ### Hash Commands
//! - `HSET`, `HSETNX`, `HGET`, `HDEL`
//! - `HLEN`, `HSTRLEN`, `HEXISTS`
//!
//! ### List Commands
//! - `LPUSH`, `RPUSH`, `LPOP`, `RPOP`
//! - `LRANGE`, `LINDEX`, `LLEN`, `LPOS`
//! - `LREM`, `LSET`, `LTRIM`
//!
//! ### Stream Commands
//! - `XADD`, `XDEL`, `XLEN`, `XTRIM`, `XACK`
//! - `XRANGE`, `XREVRANGE`, `XREAD`, `XREADGROUP`
//! - `XPENDING`, `XCLAIM`, `XAUTOCLAIM`
//! - `XGROUP CREATE|CREATECONSUMER|DELCONSUMER|DESTROY|SETID`
//! - `XINFO CONSUMERS|GROUPS|STREAM`
//!
//! ### Server Commands
//! - `PUBLISH`, `INFO`, `PING`

pub mod hashes;
pub mod keys;
pub mod lists;
pub mod server;
pub mod streams;
pub mod strings;

pub use streams::{ClaimOptions, ReadOptions, TrimStrategy};

use crate::protocol::RespValue;

/// Bulk-string view used by `GET`-like commands.
///
/// Nil, server errors and internal errors all mean "no value".
pub(crate) fn optional_text(reply: RespValue) -> Option<String> {
    match reply {
        RespValue::BulkString(Some(_)) | RespValue::SimpleString(_) | RespValue::Integer(_) => {
            Some(reply.to_text())
        }
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::InternalError;

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(RespValue::bulk_string("v")), Some("v".to_string()));
        assert_eq!(optional_text(RespValue::bulk_string("")), Some(String::new()));
        assert_eq!(optional_text(RespValue::nil_bulk_string()), None);
        assert_eq!(optional_text(RespValue::error("ERR wrong type")), None);
        assert_eq!(optional_text(RespValue::internal(InternalError::disconnected())), None);
    }
}
