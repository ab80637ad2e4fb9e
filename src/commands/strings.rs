//! String Commands

use crate::commands::optional_text;
use crate::protocol::Command;
use crate::redis::Redis;
use crate::transport::Transport;

impl<T: Transport> Redis<T> {
    /// `SET key value`. True if the server answered OK.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        self.client.expect_ok(Command::new("SET", [key, value]))
    }

    /// `GET key`
    ///
    /// Returns `None` for a missing key. Server and client failures also
    /// yield `None`; the failure is available from
    /// [`Client::last_error`](crate::Client::last_error) for the latter.
    pub fn get(&mut self, key: &str) -> Option<String> {
        optional_text(self.client.issue(Command::new("GET", [key])))
    }

    /// `APPEND key value`. Returns the new length of the string.
    pub fn append(&mut self, key: &str, value: &str) -> i64 {
        self.client.issue_as_integer(Command::new("APPEND", [key, value]))
    }
}
