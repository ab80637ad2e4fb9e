//! Server Commands

use crate::protocol::{Command, RespValue};
use crate::redis::Redis;
use crate::transport::Transport;

impl<T: Transport> Redis<T> {
    /// `PUBLISH channel message`. Returns how many subscribers received it.
    pub fn publish(&mut self, channel: &str, message: &str) -> i64 {
        self.client.issue_as_integer(Command::new("PUBLISH", [channel, message]))
    }

    /// `INFO [section]`. Empty on failure.
    pub fn info(&mut self, section: Option<&str>) -> String {
        let command = match section {
            Some(section) => Command::new("INFO", [section]),
            None => Command::bare("INFO"),
        };
        match self.client.issue(command) {
            reply @ RespValue::BulkString(_) => reply.to_text(),
            _ => String::new(),
        }
    }

    /// `SELECT index`. True if the server switched databases.
    pub fn select(&mut self, index: u32) -> bool {
        self.client.expect_ok(Command::new("SELECT", [index.to_string()]))
    }

    /// `PING`. True if the server answered `PONG`.
    pub fn ping(&mut self) -> bool {
        matches!(self.client.issue(Command::bare("PING")), RespValue::SimpleString(s) if s == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use crate::client::INTEGER_SENTINEL;
    use crate::commands::test_support::{scripted, sent_one};

    #[test]
    fn test_publish() {
        let mut redis = scripted(b":2\r\n");
        assert_eq!(redis.publish("news", "hello"), 2);
        assert_eq!(sent_one(&redis), ["PUBLISH", "news", "hello"]);

        assert_eq!(scripted(b"-ERR\r\n").publish("news", "hello"), INTEGER_SENTINEL);
    }

    #[test]
    fn test_info() {
        let body = "# Server\r\nredis_version:7.2.0\r\n";
        let reply = format!("${}\r\n{}\r\n", body.len(), body);

        let mut redis = scripted(reply.as_bytes());
        assert_eq!(redis.info(Some("server")), body);
        assert_eq!(sent_one(&redis), ["INFO", "server"]);

        let mut redis = scripted(reply.as_bytes());
        redis.info(None);
        assert_eq!(sent_one(&redis), ["INFO"]);

        assert_eq!(scripted(b"-NOPERM\r\n").info(None), "");
    }

    #[test]
    fn test_select() {
        let mut redis = scripted(b"+OK\r\n");
        assert!(redis.select(3));
        assert_eq!(sent_one(&redis), ["SELECT", "3"]);

        assert!(!scripted(b"-ERR DB index is out of range\r\n").select(99));
    }

    #[test]
    fn test_ping() {
        assert!(scripted(b"+PONG\r\n").ping());
        assert!(!scripted(b"-LOADING\r\n").ping());
    }
}
