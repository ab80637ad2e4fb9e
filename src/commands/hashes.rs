//! Hash Commands

use crate::commands::optional_text;
use crate::protocol::Command;
use crate::redis::Redis;
use crate::transport::Transport;

impl<T: Transport> Redis<T> {
    /// `HSET key field value`. True if the field was newly created.
    pub fn hset(&mut self, key: &str, field: &str, value: &str) -> bool {
        self.client.issue_as_bool(Command::new("HSET", [key, field, value]))
    }

    /// `HSETNX key field value`. True if the field did not exist and was set.
    pub fn hsetnx(&mut self, key: &str, field: &str, value: &str) -> bool {
        self.client.issue_as_bool(Command::new("HSETNX", [key, field, value]))
    }

    /// `HGET key field`
    pub fn hget(&mut self, key: &str, field: &str) -> Option<String> {
        optional_text(self.client.issue(Command::new("HGET", [key, field])))
    }

    /// `HDEL key field`
    pub fn hdel(&mut self, key: &str, field: &str) -> bool {
        self.client.issue_as_bool(Command::new("HDEL", [key, field]))
    }

    /// `HLEN key`
    pub fn hlen(&mut self, key: &str) -> i64 {
        self.client.issue_as_integer(Command::new("HLEN", [key]))
    }

    /// `HSTRLEN key field`
    pub fn hstrlen(&mut self, key: &str, field: &str) -> i64 {
        self.client.issue_as_integer(Command::new("HSTRLEN", [key, field]))
    }

    /// `HEXISTS key field`
    pub fn hexists(&mut self, key: &str, field: &str) -> bool {
        self.client.issue_as_bool(Command::new("HEXISTS", [key, field]))
    }
}
