//! Stream Commands
//!
//! Stream replies are deeply nested (entries are `[id, [field, value, ...]]`,
//! `XREAD` wraps those per stream, `XINFO` returns maps as flat arrays), so
//! most methods here hand back the raw [`RespValue`] and leave the walking to
//! the caller. Commands with many optional arguments take an options struct.

use crate::commands::optional_text;
use crate::protocol::{ArgList, Command, RespValue};
use crate::redis::Redis;
use crate::transport::Transport;
use std::time::Duration;

/// How `XTRIM` decides what to evict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrimStrategy {
    /// Keep at most this many entries
    MaxLen(u64),
    /// Evict entries with an ID lower than this one
    MinId(String),
}

/// Optional arguments of `XREAD` and `XREADGROUP`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// `COUNT n`
    pub count: Option<u64>,
    /// `BLOCK ms`; the call then waits server-side up to this long
    pub block: Option<Duration>,
    /// `NOACK`, only meaningful for `XREADGROUP`
    pub no_ack: bool,
}

/// Optional arguments of `XCLAIM`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimOptions {
    /// `IDLE ms`
    pub idle: Option<Duration>,
    /// `TIME unix-ms`
    pub time: Option<u64>,
    /// `RETRYCOUNT n`
    pub retry_count: Option<u64>,
    /// `FORCE`
    pub force: bool,
    /// `JUSTID`
    pub just_id: bool,
    /// `LASTID id`
    pub last_id: Option<String>,
}

impl ReadOptions {
    fn push_args(&self, args: &mut ArgList, group_read: bool) {
        if let Some(count) = self.count {
            args.extend(["COUNT".to_string(), count.to_string()]);
        }
        if let Some(block) = self.block {
            args.extend(["BLOCK".to_string(), block.as_millis().to_string()]);
        }
        if group_read && self.no_ack {
            args.push("NOACK".to_string());
        }
    }
}

impl ClaimOptions {
    fn push_args(&self, args: &mut ArgList) {
        if let Some(idle) = self.idle {
            args.extend(["IDLE".to_string(), idle.as_millis().to_string()]);
        }
        if let Some(time) = self.time {
            args.extend(["TIME".to_string(), time.to_string()]);
        }
        if let Some(retry_count) = self.retry_count {
            args.extend(["RETRYCOUNT".to_string(), retry_count.to_string()]);
        }
        if self.force {
            args.push("FORCE".to_string());
        }
        if self.just_id {
            args.push("JUSTID".to_string());
        }
        if let Some(last_id) = &self.last_id {
            args.extend(["LASTID".to_string(), last_id.clone()]);
        }
    }
}

fn args(items: &[&str]) -> ArgList {
    items.iter().map(|s| s.to_string()).collect()
}

impl<T: Transport> Redis<T> {
    /// `XADD key id field value [field value ...]`
    ///
    /// Pass `"*"` as `id` to let the server pick one. Returns the ID of the
    /// added entry.
    pub fn xadd(&mut self, key: &str, id: &str, fields: &[(&str, &str)]) -> Option<String> {
        let mut argv = args(&[key, id]);
        for (field, value) in fields {
            argv.extend([field.to_string(), value.to_string()]);
        }
        optional_text(self.client.issue(Command::new("XADD", argv)))
    }

    /// `XDEL key id`. Returns the number of deleted entries.
    pub fn xdel(&mut self, key: &str, id: &str) -> i64 {
        self.client.issue_as_integer(Command::new("XDEL", [key, id]))
    }

    /// `XLEN key`
    pub fn xlen(&mut self, key: &str) -> i64 {
        self.client.issue_as_integer(Command::new("XLEN", [key]))
    }

    /// `XTRIM key MAXLEN|MINID [~] threshold [LIMIT count]`
    ///
    /// Returns the number of evicted entries. `LIMIT` is only accepted by the
    /// server together with approximate trimming.
    pub fn xtrim(
        &mut self,
        key: &str,
        strategy: TrimStrategy,
        approximate: bool,
        limit: Option<u64>,
    ) -> i64 {
        let mut argv = args(&[key]);
        let threshold = match strategy {
            TrimStrategy::MaxLen(len) => {
                argv.push("MAXLEN".to_string());
                len.to_string()
            }
            TrimStrategy::MinId(id) => {
                argv.push("MINID".to_string());
                id
            }
        };
        argv.push(if approximate { "~" } else { "=" }.to_string());
        argv.push(threshold);
        if let Some(limit) = limit {
            argv.extend(["LIMIT".to_string(), limit.to_string()]);
        }
        self.client.issue_as_integer(Command::new("XTRIM", argv))
    }

    /// `XACK key group id`. Returns the number of acknowledged entries.
    pub fn xack(&mut self, key: &str, group: &str, id: &str) -> i64 {
        self.client.issue_as_integer(Command::new("XACK", [key, group, id]))
    }

    /// `XRANGE key start end [COUNT n]`
    pub fn xrange(&mut self, key: &str, start: &str, end: &str, count: Option<u64>) -> RespValue {
        self.range("XRANGE", [key, start, end], count)
    }

    /// `XREVRANGE key end start [COUNT n]`
    pub fn xrevrange(&mut self, key: &str, end: &str, start: &str, count: Option<u64>) -> RespValue {
        self.range("XREVRANGE", [key, end, start], count)
    }

    /// `XREAD [COUNT n] [BLOCK ms] STREAMS key id`
    ///
    /// A blocking read that times out replies with a nil array.
    pub fn xread(&mut self, key: &str, id: &str, options: &ReadOptions) -> RespValue {
        let mut argv = ArgList::new();
        options.push_args(&mut argv, false);
        argv.extend(args(&["STREAMS", key, id]));
        self.client.issue(Command::new("XREAD", argv))
    }

    /// `XREADGROUP GROUP group consumer [COUNT n] [BLOCK ms] [NOACK] STREAMS key id`
    pub fn xreadgroup(
        &mut self,
        group: &str,
        consumer: &str,
        key: &str,
        id: &str,
        options: &ReadOptions,
    ) -> RespValue {
        let mut argv = args(&["GROUP", group, consumer]);
        options.push_args(&mut argv, true);
        argv.extend(args(&["STREAMS", key, id]));
        self.client.issue(Command::new("XREADGROUP", argv))
    }

    /// `XPENDING key group`, the summary form.
    pub fn xpending(&mut self, key: &str, group: &str) -> RespValue {
        self.client.issue(Command::new("XPENDING", [key, group]))
    }

    /// `XPENDING key group start end count [consumer]`, the extended form.
    pub fn xpending_range(
        &mut self,
        key: &str,
        group: &str,
        start: &str,
        end: &str,
        count: u64,
        consumer: Option<&str>,
    ) -> RespValue {
        let mut argv = args(&[key, group, start, end]);
        argv.push(count.to_string());
        if let Some(consumer) = consumer {
            argv.push(consumer.to_string());
        }
        self.client.issue(Command::new("XPENDING", argv))
    }

    /// `XCLAIM key group consumer min-idle-ms id [id ...] [options]`
    pub fn xclaim(
        &mut self,
        key: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        ids: &[&str],
        options: &ClaimOptions,
    ) -> RespValue {
        let mut argv = args(&[key, group, consumer]);
        argv.push(min_idle.as_millis().to_string());
        argv.extend(args(ids));
        options.push_args(&mut argv);
        self.client.issue(Command::new("XCLAIM", argv))
    }

    /// `XAUTOCLAIM key group consumer min-idle-ms start [COUNT n]`
    ///
    /// The reply is `[next-start-id, claimed-entries, deleted-ids]`.
    pub fn xautoclaim(
        &mut self,
        key: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        start: &str,
        count: Option<u64>,
    ) -> RespValue {
        let mut argv = args(&[key, group, consumer]);
        argv.push(min_idle.as_millis().to_string());
        argv.push(start.to_string());
        if let Some(count) = count {
            argv.extend(["COUNT".to_string(), count.to_string()]);
        }
        self.client.issue(Command::new("XAUTOCLAIM", argv))
    }

    /// `XGROUP CREATE key group id [MKSTREAM]`
    pub fn xgroup_create(&mut self, key: &str, group: &str, id: &str, mkstream: bool) -> bool {
        let mut argv = args(&["CREATE", key, group, id]);
        if mkstream {
            argv.push("MKSTREAM".to_string());
        }
        self.client.expect_ok(Command::new("XGROUP", argv))
    }

    /// `XGROUP CREATECONSUMER key group consumer`. True if it was created.
    pub fn xgroup_createconsumer(&mut self, key: &str, group: &str, consumer: &str) -> bool {
        self.client
            .issue_as_bool(Command::new("XGROUP", ["CREATECONSUMER", key, group, consumer]))
    }

    /// `XGROUP DELCONSUMER key group consumer`
    ///
    /// Returns the number of pending entries the consumer had.
    pub fn xgroup_delconsumer(&mut self, key: &str, group: &str, consumer: &str) -> i64 {
        self.client
            .issue_as_integer(Command::new("XGROUP", ["DELCONSUMER", key, group, consumer]))
    }

    /// `XGROUP DESTROY key group`
    pub fn xgroup_destroy(&mut self, key: &str, group: &str) -> bool {
        self.client.issue_as_bool(Command::new("XGROUP", ["DESTROY", key, group]))
    }

    /// `XGROUP SETID key group id`
    pub fn xgroup_setid(&mut self, key: &str, group: &str, id: &str) -> bool {
        self.client.expect_ok(Command::new("XGROUP", ["SETID", key, group, id]))
    }

    /// `XINFO CONSUMERS key group`
    pub fn xinfo_consumers(&mut self, key: &str, group: &str) -> RespValue {
        self.client.issue(Command::new("XINFO", ["CONSUMERS", key, group]))
    }

    /// `XINFO GROUPS key`
    pub fn xinfo_groups(&mut self, key: &str) -> RespValue {
        self.client.issue(Command::new("XINFO", ["GROUPS", key]))
    }

    /// `XINFO STREAM key [FULL [COUNT n]]`
    pub fn xinfo_stream(&mut self, key: &str, full: bool, count: Option<u64>) -> RespValue {
        let mut argv = args(&["STREAM", key]);
        if full {
            argv.push("FULL".to_string());
            if let Some(count) = count {
                argv.extend(["COUNT".to_string(), count.to_string()]);
            }
        }
        self.client.issue(Command::new("XINFO", argv))
    }

    fn range(&mut self, name: &str, bounds: [&str; 3], count: Option<u64>) -> RespValue {
        let mut argv = args(&bounds);
        if let Some(count) = count {
            argv.extend(["COUNT".to_string(), count.to_string()]);
        }
        self.client.issue(Command::new(name, argv))
    }
}
