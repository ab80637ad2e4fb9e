//! List Commands

use crate::commands::optional_text;
use crate::protocol::{Command, RespValue};
use crate::redis::Redis;
use crate::transport::Transport;

impl<T: Transport> Redis<T> {
    /// `LPUSH key value`. Returns the new length of the list.
    pub fn lpush(&mut self, key: &str, value: &str) -> i64 {
        self.client.issue_as_integer(Command::new("LPUSH", [key, value]))
    }

    /// `RPUSH key value`. Returns the new length of the list.
    pub fn rpush(&mut self, key: &str, value: &str) -> i64 {
        self.client.issue_as_integer(Command::new("RPUSH", [key, value]))
    }

    /// `LPOP key`. `None` when the list is empty or missing.
    pub fn lpop(&mut self, key: &str) -> Option<String> {
        optional_text(self.client.issue(Command::new("LPOP", [key])))
    }

    /// `RPOP key`
    pub fn rpop(&mut self, key: &str) -> Option<String> {
        optional_text(self.client.issue(Command::new("RPOP", [key])))
    }

    /// `LRANGE key start stop`. Negative indexes count from the tail.
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Vec<String> {
        let command = Command::new("LRANGE", [key.to_string(), start.to_string(), stop.to_string()]);
        self.client.issue(command).to_text_list()
    }

    /// `LINDEX key index`
    pub fn lindex(&mut self, key: &str, index: i64) -> Option<String> {
        let command = Command::new("LINDEX", [key, index.to_string().as_str()]);
        optional_text(self.client.issue(command))
    }

    /// `LLEN key`
    pub fn llen(&mut self, key: &str) -> i64 {
        self.client.issue_as_integer(Command::new("LLEN", [key]))
    }

    /// `LPOS key element`. Index of the first match, `None` if absent.
    pub fn lpos(&mut self, key: &str, element: &str) -> Option<i64> {
        match self.client.issue(Command::new("LPOS", [key, element])) {
            RespValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// `LREM key count element`. Returns the number of removed elements.
    pub fn lrem(&mut self, key: &str, count: i64, element: &str) -> i64 {
        let command = Command::new("LREM", [key, count.to_string().as_str(), element]);
        self.client.issue_as_integer(command)
    }

    /// `LSET key index element`
    pub fn lset(&mut self, key: &str, index: i64, element: &str) -> bool {
        let command = Command::new("LSET", [key, index.to_string().as_str(), element]);
        self.client.expect_ok(command)
    }

    /// `LTRIM key start stop`
    pub fn ltrim(&mut self, key: &str, start: i64, stop: i64) -> bool {
        let command = Command::new("LTRIM", [key.to_string(), start.to_string(), stop.to_string()]);
        self.client.expect_ok(command)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::INTEGER_SENTINEL;
    use crate::commands::test_support::{scripted, sent_one};

    #[test]
    fn test_push() {
        let mut redis = scripted(b":1\r\n");
        assert_eq!(redis.lpush("queue", "a"), 1);
        assert_eq!(sent_one(&redis), ["LPUSH", "queue", "a"]);

        assert_eq!(scripted(b":2\r\n").rpush("queue", "b"), 2);
        assert_eq!(scripted(b"-WRONGTYPE\r\n").rpush("str", "b"), INTEGER_SENTINEL);
    }

    #[test]
    fn test_pop() {
        assert_eq!(scripted(b"$1\r\na\r\n").lpop("queue").as_deref(), Some("a"));
        assert_eq!(scripted(b"$-1\r\n").rpop("queue"), None);
    }

    #[test]
    fn test_lrange() {
        let mut redis = scripted(b"*3\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\nc\r\n");
        assert_eq!(redis.lrange("queue", 0, -1), vec!["a", "b", "c"]);
        assert_eq!(sent_one(&redis), ["LRANGE", "queue", "0", "-1"]);

        assert!(scripted(b"*0\r\n").lrange("missing", 0, -1).is_empty());
        assert!(scripted(b"-ERR\r\n").lrange("queue", 0, -1).is_empty());
    }

    #[test]
    fn test_lindex_and_llen() {
        let mut redis = scripted(b"$1\r\nc\r\n");
        assert_eq!(redis.lindex("queue", -1).as_deref(), Some("c"));
        assert_eq!(sent_one(&redis), ["LINDEX", "queue", "-1"]);

        assert_eq!(scripted(b"$-1\r\n").lindex("queue", 99), None);
        assert_eq!(scripted(b":3\r\n").llen("queue"), 3);
    }

    #[test]
    fn test_lpos() {
        assert_eq!(scripted(b":2\r\n").lpos("queue", "c"), Some(2));
        assert_eq!(scripted(b"$-1\r\n").lpos("queue", "z"), None);
    }

    #[test]
    fn test_lrem_lset_ltrim() {
        let mut redis = scripted(b":2\r\n");
        assert_eq!(redis.lrem("queue", -2, "a"), 2);
        assert_eq!(sent_one(&redis), ["LREM", "queue", "-2", "a"]);

        let mut redis = scripted(b"+OK\r\n");
        assert!(redis.lset("queue", 0, "z"));
        assert_eq!(sent_one(&redis), ["LSET", "queue", "0", "z"]);
        assert!(!scripted(b"-ERR index out of range\r\n").lset("queue", 9, "z"));

        let mut redis = scripted(b"+OK\r\n");
        assert!(redis.ltrim("queue", 1, -1));
        assert_eq!(sent_one(&redis), ["LTRIM", "queue", "1", "-1"]);
    }
}
