//! Key Commands
//!
//! Deletion, existence and expiry of keys of any type.

use crate::protocol::Command;
use crate::redis::Redis;
use crate::transport::Transport;

impl<T: Transport> Redis<T> {
    /// `DEL key`. True if the key existed.
    pub fn del(&mut self, key: &str) -> bool {
        self.client.issue_as_bool(Command::new("DEL", [key]))
    }

    /// `EXISTS key`
    pub fn exists(&mut self, key: &str) -> bool {
        self.client.issue_as_bool(Command::new("EXISTS", [key]))
    }

    /// `EXPIRE key seconds`. True if the timeout was set.
    pub fn expire(&mut self, key: &str, seconds: i64) -> bool {
        self.expiry("EXPIRE", key, seconds)
    }

    /// `PEXPIRE key milliseconds`
    pub fn pexpire(&mut self, key: &str, milliseconds: i64) -> bool {
        self.expiry("PEXPIRE", key, milliseconds)
    }

    /// `EXPIREAT key unix-seconds`
    pub fn expire_at(&mut self, key: &str, unix_seconds: i64) -> bool {
        self.expiry("EXPIREAT", key, unix_seconds)
    }

    /// `PEXPIREAT key unix-milliseconds`
    pub fn pexpire_at(&mut self, key: &str, unix_milliseconds: i64) -> bool {
        self.expiry("PEXPIREAT", key, unix_milliseconds)
    }

    /// `PERSIST key`. True if a timeout was removed.
    pub fn persist(&mut self, key: &str) -> bool {
        self.client.issue_as_bool(Command::new("PERSIST", [key]))
    }

    /// `TTL key` in seconds.
    ///
    /// Redis answers `-2` for a missing key and `-1` for a key without expiry.
    pub fn ttl(&mut self, key: &str) -> i64 {
        self.client.issue_as_integer(Command::new("TTL", [key]))
    }

    /// `PTTL key` in milliseconds. Same special values as [`Redis::ttl`].
    pub fn pttl(&mut self, key: &str) -> i64 {
        self.client.issue_as_integer(Command::new("PTTL", [key]))
    }

    fn expiry(&mut self, name: &str, key: &str, amount: i64) -> bool {
        self.client
            .issue_as_bool(Command::new(name, [key, amount.to_string().as_str()]))
    }
}
