//! Publish/Subscribe
//!
//! Subscribing is a two-step affair:
//!
//! 1. Queue channels and patterns with [`Redis::subscribe`] and
//!    [`Redis::psubscribe`]. Nothing is sent yet.
//! 2. Call [`Redis::start_subscribing`]. It issues `SUBSCRIBE`/`PSUBSCRIBE`
//!    for everything queued and waits for each confirmation, then blocks in a
//!    receive loop, handing every inbound message to the `on_message` handler.
//!    Messages that arrive between two setup confirmations are kept and
//!    delivered first.
//!
//! ## The Loop
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//!   running? ──no──> return Ok(())                          │
//!      │ yes                                                │
//!      ▼                                                    │
//!   on_tick()                                               │
//!      │                                                    │
//!      ▼                                                    │
//!   poll one value ──none──> sleep(poll_interval) ──────────┤
//!      │                                                    │
//!      ├─ disconnected ──> Err(ServerDisconnected)          │
//!      ├─ other failure ─> Err(Other)                       │
//!      ├─ not an array / short / unknown kind ─> on_error ──┤
//!      ├─ (p)(un)subscribe confirmation ──> logged ─────────┤
//!      └─ message | pmessage ──> on_message ────────────────┘
//! ```
//!
//! Handlers run on the loop's own stack and get `&mut Redis`, so they can
//! subscribe, unsubscribe or call [`Redis::stop_subscribing`]. Inside the loop
//! subscription changes are only written; the server's confirmation shows up
//! later in the stream, possibly after messages already in flight, and the
//! loop consumes it there. A stop request
//! takes effect once the running handler has returned, before the next
//! iteration starts. Nothing is pre-empted and the loop is never re-entered.

use crate::protocol::{Command, InternalError, RespValue};
use crate::redis::Redis;
use crate::transport::Transport;
use bytes::Bytes;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A queued channel or pattern subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubSpec {
    /// Channel name, or glob pattern when `pattern` is set
    pub target: String,
    pub pattern: bool,
}

impl SubSpec {
    pub fn channel(name: impl Into<String>) -> Self {
        Self {
            target: name.into(),
            pattern: false,
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            target: pattern.into(),
            pattern: true,
        }
    }

    fn subscribe_command(&self) -> &'static str {
        if self.pattern {
            "PSUBSCRIBE"
        } else {
            "SUBSCRIBE"
        }
    }
}

/// A message delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The channel the message was published to
    pub channel: String,
    /// The pattern that matched, for `pmessage` deliveries
    pub pattern: Option<String>,
    pub payload: Bytes,
}

impl Message {
    /// The payload as (lossy) UTF-8 text.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Per-message anomalies reported to `on_error`. The loop keeps running.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// The server sent something other than an array
    #[error("bad response type")]
    BadResponseType,

    /// The array is too short for its message kind
    #[error("truncated response")]
    TruncatedResponse,

    /// The first element is not a known message or confirmation kind
    #[error("unknown message type")]
    UnknownType,
}

/// Why the subscribe loop ended early.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscribeError {
    /// No `on_message` handler was supplied
    #[error("no message handler supplied")]
    BadCallback,

    /// A queued subscription was not confirmed by the server
    #[error("failed to subscribe to {0:?}")]
    SetupFailure(String),

    /// The server closed the connection; the caller may reconnect and retry
    #[error("server disconnected")]
    ServerDisconnected,

    /// Any other client-local failure
    #[error("subscribe loop failed: {0}")]
    Other(InternalError),
}

type MessageHandler<'a, T> = Box<dyn FnMut(&mut Redis<T>, Message) + 'a>;
type ErrorHandler<'a, T> = Box<dyn FnMut(&mut Redis<T>, MessageError) + 'a>;
type TickHandler<'a, T> = Box<dyn FnMut(&mut Redis<T>) + 'a>;

/// Callbacks for [`Redis::start_subscribing`].
///
/// # Example
///
/// ```
/// use flashkv_client::pubsub::Handlers;
/// use flashkv_client::transport::MemoryTransport;
///
/// let handlers: Handlers<'_, MemoryTransport> = Handlers::new()
///     .on_message(|redis, msg| {
///         println!("{}: {}", msg.channel, msg.payload_text());
///         redis.stop_subscribing();
///     })
///     .on_error(|_, err| eprintln!("bad message: {}", err));
/// ```
pub struct Handlers<'a, T: Transport> {
    on_message: Option<MessageHandler<'a, T>>,
    on_error: Option<ErrorHandler<'a, T>>,
    on_tick: Option<TickHandler<'a, T>>,
}

impl<T: Transport> Default for Handlers<'_, T> {
    fn default() -> Self {
        Self {
            on_message: None,
            on_error: None,
            on_tick: None,
        }
    }
}

impl<'a, T: Transport> Handlers<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with every `message`/`pmessage` delivery. Required.
    pub fn on_message(mut self, f: impl FnMut(&mut Redis<T>, Message) + 'a) -> Self {
        self.on_message = Some(Box::new(f));
        self
    }

    /// Called for inbound values that are not well-formed messages.
    pub fn on_error(mut self, f: impl FnMut(&mut Redis<T>, MessageError) + 'a) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Called at the start of every loop iteration.
    pub fn on_tick(mut self, f: impl FnMut(&mut Redis<T>) + 'a) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }
}

/// What one inbound value turned out to be.
enum Inbound {
    Message(Message),
    /// `[kind, target, count]` acknowledging a subscription change
    Confirmation { kind: String, target: String },
    Anomaly(MessageError),
    Disconnected,
    Failed(InternalError),
}

fn classify(value: RespValue) -> Inbound {
    let items = match value {
        RespValue::InternalError(err) if err.is_disconnected() => return Inbound::Disconnected,
        RespValue::InternalError(err) => return Inbound::Failed(err),
        RespValue::Array(Some(items)) => items,
        _ => return Inbound::Anomaly(MessageError::BadResponseType),
    };

    if items.len() < 3 {
        return Inbound::Anomaly(MessageError::TruncatedResponse);
    }

    match items[0].to_text().as_str() {
        kind @ ("subscribe" | "psubscribe" | "unsubscribe" | "punsubscribe") => Inbound::Confirmation {
            kind: kind.to_string(),
            target: items[1].to_text(),
        },
        "message" => Inbound::Message(Message {
            channel: items[1].to_text(),
            pattern: None,
            payload: payload_of(&items[2]),
        }),
        "pmessage" if items.len() < 4 => Inbound::Anomaly(MessageError::TruncatedResponse),
        "pmessage" => Inbound::Message(Message {
            channel: items[2].to_text(),
            pattern: Some(items[1].to_text()),
            payload: payload_of(&items[3]),
        }),
        _ => Inbound::Anomaly(MessageError::UnknownType),
    }
}

fn payload_of(value: &RespValue) -> Bytes {
    match value.as_bytes() {
        Some(bytes) => bytes.clone(),
        None => Bytes::from(value.to_text()),
    }
}

impl<T: Transport> Redis<T> {
    /// Subscribes to a channel.
    ///
    /// Before the loop starts this only queues the subscription. Inside the
    /// loop (e.g. from a handler) the command is sent right away and the
    /// return value says whether it was written; the confirmation is consumed
    /// by the loop.
    pub fn subscribe(&mut self, channel: &str) -> bool {
        self.add_subscription(SubSpec::channel(channel))
    }

    /// Subscribes to a glob pattern. Queued or issued like [`Redis::subscribe`].
    pub fn psubscribe(&mut self, pattern: &str) -> bool {
        self.add_subscription(SubSpec::pattern(pattern))
    }

    /// Unsubscribes from a channel.
    ///
    /// Any queued subscription for it is dropped too. Outside the loop this
    /// returns true iff the server confirmed with an `unsubscribe` reply
    /// naming the channel. Inside the loop it only sends the command.
    pub fn unsubscribe(&mut self, channel: &str) -> bool {
        self.remove_subscription("UNSUBSCRIBE", SubSpec::channel(channel))
    }

    /// Unsubscribes from a pattern. See [`Redis::unsubscribe`].
    pub fn punsubscribe(&mut self, pattern: &str) -> bool {
        self.remove_subscription("PUNSUBSCRIBE", SubSpec::pattern(pattern))
    }

    /// Subscriptions that will be issued when the loop starts.
    pub fn subscriptions(&self) -> &[SubSpec] {
        &self.subscriptions
    }

    /// True while the subscribe loop is running and no stop was requested.
    pub fn is_subscribing(&self) -> bool {
        self.running
    }

    /// Asks the subscribe loop to exit after the current iteration.
    pub fn stop_subscribing(&mut self) {
        if self.running {
            debug!("Stop requested for subscribe loop");
        }
        self.running = false;
    }

    /// Issues every queued subscription and runs the receive loop.
    ///
    /// Blocks until [`Redis::stop_subscribing`] is called from a handler
    /// (`Ok(())`) or the loop fails. Per-message anomalies go to `on_error`
    /// and never end the loop.
    pub fn start_subscribing(&mut self, handlers: Handlers<'_, T>) -> Result<(), SubscribeError> {
        let Handlers {
            on_message,
            mut on_error,
            mut on_tick,
        } = handlers;
        let Some(mut on_message) = on_message else {
            return Err(SubscribeError::BadCallback);
        };

        self.subscriber_mode = true;
        let mut early = VecDeque::new();
        for spec in self.subscriptions.clone() {
            if !self.confirm_subscription(&spec, &mut early) {
                warn!(target = %spec.target, pattern = spec.pattern, "Subscription setup failed");
                self.subscriber_mode = false;
                return Err(SubscribeError::SetupFailure(spec.target));
            }
        }

        info!(subscriptions = self.subscriptions.len(), "Entering subscribe loop");
        self.running = true;

        let result = loop {
            if !self.running {
                break Ok(());
            }

            if let Some(tick) = on_tick.as_mut() {
                tick(self);
            }

            let inbound = match early.pop_front() {
                Some(message) => Inbound::Message(message),
                None => match self.client.poll() {
                    Some(value) => classify(value),
                    None => {
                        std::thread::sleep(self.client.poll_interval());
                        continue;
                    }
                },
            };

            match inbound {
                Inbound::Message(message) => on_message(self, message),
                Inbound::Confirmation { kind, target } => {
                    debug!(kind = %kind, target = %target, "Subscription change confirmed");
                }
                Inbound::Anomaly(err) => {
                    debug!(error = %err, "Ignoring malformed pub/sub message");
                    if let Some(on_error) = on_error.as_mut() {
                        on_error(self, err);
                    }
                }
                Inbound::Disconnected => break Err(SubscribeError::ServerDisconnected),
                Inbound::Failed(err) => break Err(SubscribeError::Other(err)),
            }
        };

        self.running = false;
        self.subscriber_mode = false;
        match &result {
            Ok(()) => info!("Subscribe loop stopped"),
            Err(e) => warn!(error = %e, "Subscribe loop ended"),
        }
        result
    }

    fn add_subscription(&mut self, spec: SubSpec) -> bool {
        if !self.subscriptions.contains(&spec) {
            self.subscriptions.push(spec.clone());
        }

        if !self.subscriber_mode {
            debug!(target = %spec.target, pattern = spec.pattern, "Queued subscription");
            return true;
        }
        let command = Command::new(spec.subscribe_command(), [&spec.target]);
        self.client.send(&command).is_ok()
    }

    /// Sends one setup subscription and reads up to its confirmation.
    ///
    /// Messages for channels confirmed earlier can arrive first; they are
    /// pushed onto `early`.
    fn confirm_subscription(&mut self, spec: &SubSpec, early: &mut VecDeque<Message>) -> bool {
        let command = Command::new(spec.subscribe_command(), [&spec.target]);
        if self.client.send(&command).is_err() {
            return false;
        }

        loop {
            match classify(self.client.receive()) {
                Inbound::Message(message) => early.push_back(message),
                Inbound::Confirmation { kind, target } => {
                    return kind.eq_ignore_ascii_case(spec.subscribe_command()) && target == spec.target;
                }
                Inbound::Anomaly(_) | Inbound::Disconnected | Inbound::Failed(_) => return false,
            }
        }
    }

    fn remove_subscription(&mut self, command: &str, spec: SubSpec) -> bool {
        self.subscriptions.retain(|queued| *queued != spec);
        let command = Command::new(command, [&spec.target]);

        if self.subscriber_mode {
            return self.client.send(&command).is_ok();
        }

        let expected = command.name().to_ascii_lowercase();
        match classify(self.client.issue(command)) {
            Inbound::Confirmation { kind, target } => kind == expected && target == spec.target,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    type TestHandlers<'a> = Handlers<'a, MemoryTransport>;

    fn bulk_array(parts: &[&str]) -> Vec<u8> {
        Command::new(parts[0], &parts[1..]).serialize()
    }

    fn confirmation(kind: &str, target: &str, count: i64) -> Vec<u8> {
        RespValue::array(vec![
            RespValue::bulk_string(kind.to_string()),
            RespValue::bulk_string(target.to_string()),
            RespValue::integer(count),
        ])
        .serialize()
        .unwrap()
    }

    fn subscribed_redis(channel: &str, rest: &[Vec<u8>]) -> Redis<MemoryTransport> {
        let mut transport = MemoryTransport::new().disconnect_when_drained();
        transport.feed(confirmation("subscribe", channel, 1));
        for chunk in rest {
            transport.feed(chunk);
        }
        let mut redis = Redis::new(transport);
        assert!(redis.subscribe(channel));
        redis
    }

    #[test]
    fn test_subscriptions_are_queued_before_loop() {
        let mut redis = Redis::new(MemoryTransport::new());
        assert!(redis.subscribe("news"));
        assert!(redis.psubscribe("news.*"));

        assert!(redis.client().transport().written().is_empty());
        assert_eq!(
            redis.subscriptions(),
            &[SubSpec::channel("news"), SubSpec::pattern("news.*")]
        );
    }

    #[test]
    fn test_missing_message_handler() {
        let mut redis = Redis::new(MemoryTransport::new());
        redis.subscribe("news");

        let result = redis.start_subscribing(TestHandlers::new().on_error(|_, _| {}));
        assert_eq!(result, Err(SubscribeError::BadCallback));
        assert!(redis.client().transport().written().is_empty());
    }

    #[test]
    fn test_setup_failure() {
        let mut redis = Redis::new(MemoryTransport::with_input(b"-ERR denied\r\n"));
        redis.subscribe("news");

        let result = redis.start_subscribing(TestHandlers::new().on_message(|_, _| {}));
        assert_eq!(result, Err(SubscribeError::SetupFailure("news".to_string())));
        assert!(!redis.is_subscribing());

        // Back in queuing mode
        assert!(redis.subscribe("other"));
        assert_eq!(
            redis.client().transport().written(),
            b"*2\r\n$9\r\nSUBSCRIBE\r\n$4\r\nnews\r\n"
        );
    }

    #[test]
    fn test_message_and_pmessage_delivery() {
        let mut redis = subscribed_redis(
            "chan",
            &[
                bulk_array(&["message", "chan", "payload"]),
                bulk_array(&["pmessage", "ch*", "chan", "payload"]),
            ],
        );

        let mut received = Vec::new();
        let result = redis.start_subscribing(
            TestHandlers::new().on_message(|_, msg| received.push(msg)),
        );

        assert_eq!(result, Err(SubscribeError::ServerDisconnected));
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].channel, "chan");
        assert_eq!(received[0].payload_text(), "payload");
        assert_eq!(received[0].pattern, None);
        assert_eq!(received[1].channel, "chan");
        assert_eq!(received[1].payload_text(), "payload");
        assert_eq!(received[1].pattern.as_deref(), Some("ch*"));
    }

    #[test]
    fn test_setup_issues_every_queued_spec() {
        let mut transport = MemoryTransport::new().disconnect_when_drained();
        transport.feed(confirmation("subscribe", "a", 1));
        transport.feed(confirmation("psubscribe", "b.*", 2));
        let mut redis = Redis::new(transport);
        redis.subscribe("a");
        redis.psubscribe("b.*");

        let result = redis.start_subscribing(TestHandlers::new().on_message(|_, _| {}));
        assert_eq!(result, Err(SubscribeError::ServerDisconnected));

        let mut expected = Command::new("SUBSCRIBE", ["a"]).serialize();
        expected.extend(Command::new("PSUBSCRIBE", ["b.*"]).serialize());
        assert_eq!(redis.client().transport().written(), expected);
    }

    #[test]
    fn test_anomalies_are_reported_and_loop_continues() {
        let mut redis = subscribed_redis(
            "chan",
            &[
                b":1\r\n".to_vec(),
                bulk_array(&["message", "chan"]),
                bulk_array(&["pmessage", "ch*", "chan"]),
                bulk_array(&["greeting", "chan", "hello"]),
                bulk_array(&["message", "chan", "still here"]),
            ],
        );

        let mut errors = Vec::new();
        let mut received = Vec::new();
        let result = redis.start_subscribing(
            TestHandlers::new()
                .on_message(|_, msg| received.push(msg.payload_text()))
                .on_error(|_, err| errors.push(err)),
        );

        assert_eq!(result, Err(SubscribeError::ServerDisconnected));
        assert_eq!(
            errors,
            vec![
                MessageError::BadResponseType,
                MessageError::TruncatedResponse,
                MessageError::TruncatedResponse,
                MessageError::UnknownType,
            ]
        );
        assert_eq!(received, vec!["still here"]);
    }

    #[test]
    fn test_stop_takes_effect_after_handler_returns() {
        let mut redis = Redis::new(MemoryTransport::new());
        let first = bulk_array(&["message", "chan", "one"]);
        let second = bulk_array(&["message", "chan", "two"]);
        redis.client_mut().transport_mut().feed(&first);
        redis.client_mut().transport_mut().feed(&second);

        let mut events = Vec::new();
        let result = redis.start_subscribing(TestHandlers::new().on_message(|redis, msg| {
            events.push(format!("start {}", msg.payload_text()));
            redis.stop_subscribing();
            assert!(!redis.is_subscribing());
            events.push(format!("end {}", msg.payload_text()));
        }));

        assert_eq!(result, Ok(()));
        assert_eq!(events, vec!["start one", "end one"]);
        assert_eq!(redis.client().transport().remaining_bytes(), second);
    }

    #[test]
    fn test_tick_runs_every_iteration() {
        let mut redis = Redis::new(MemoryTransport::new());
        let mut ticks = 0;
        let result = redis.start_subscribing(
            TestHandlers::new().on_message(|_, _| {}).on_tick(|redis| {
                ticks += 1;
                if ticks == 3 {
                    redis.stop_subscribing();
                }
            }),
        );

        assert_eq!(result, Ok(()));
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_subscribe_from_inside_handler() {
        let mut redis = subscribed_redis(
            "a",
            &[
                bulk_array(&["message", "a", "first"]),
                confirmation("subscribe", "b", 2),
                bulk_array(&["message", "b", "second"]),
            ],
        );

        let mut received = Vec::new();
        let mut sent = false;
        let result = redis.start_subscribing(TestHandlers::new().on_message(|redis, msg| {
            if msg.channel == "a" {
                sent = redis.subscribe("b");
            }
            received.push(msg.channel);
        }));

        assert_eq!(result, Err(SubscribeError::ServerDisconnected));
        assert!(sent);
        assert_eq!(received, vec!["a", "b"]);
        assert!(redis
            .client()
            .transport()
            .written()
            .ends_with(&Command::new("SUBSCRIBE", ["b"]).serialize()));

        // The loop has exited, so subscribing queues again
        assert!(redis.subscribe("c"));
        assert_eq!(redis.subscriptions().len(), 3);
    }

    #[test]
    fn test_subscribe_inside_handler_keeps_in_flight_messages() {
        let mut redis = subscribed_redis(
            "a",
            &[
                bulk_array(&["message", "a", "first"]),
                bulk_array(&["message", "a", "second"]),
                confirmation("subscribe", "b", 2),
                bulk_array(&["message", "b", "third"]),
            ],
        );

        let mut delivered = Vec::new();
        let mut errors = Vec::new();
        let mut sent = None;
        let result = redis.start_subscribing(
            TestHandlers::new()
                .on_message(|redis, msg| {
                    if msg.payload_text() == "first" {
                        sent = Some(redis.subscribe("b"));
                    }
                    delivered.push(msg.payload_text());
                })
                .on_error(|_, err| errors.push(err)),
        );

        assert_eq!(result, Err(SubscribeError::ServerDisconnected));
        assert_eq!(delivered, vec!["first", "second", "third"]);
        assert!(errors.is_empty());
        assert_eq!(sent, Some(true));
    }

    #[test]
    fn test_unsubscribe_inside_handler_keeps_in_flight_messages() {
        let mut redis = subscribed_redis(
            "a",
            &[
                bulk_array(&["message", "a", "first"]),
                bulk_array(&["message", "a", "second"]),
                confirmation("unsubscribe", "a", 0),
            ],
        );

        let mut delivered = Vec::new();
        let mut errors = Vec::new();
        let mut unsubscribed = None;
        let result = redis.start_subscribing(
            TestHandlers::new()
                .on_message(|redis, msg| {
                    if msg.payload_text() == "first" {
                        unsubscribed = Some(redis.unsubscribe("a"));
                    }
                    delivered.push(msg.payload_text());
                })
                .on_error(|_, err| errors.push(err)),
        );

        assert_eq!(result, Err(SubscribeError::ServerDisconnected));
        assert_eq!(delivered, vec!["first", "second"]);
        assert!(errors.is_empty());
        assert_eq!(unsubscribed, Some(true));
        assert!(redis.subscriptions().is_empty());
        assert!(redis
            .client()
            .transport()
            .written()
            .ends_with(&Command::new("UNSUBSCRIBE", ["a"]).serialize()));
    }

    #[test]
    fn test_setup_keeps_messages_between_confirmations() {
        let mut transport = MemoryTransport::new().disconnect_when_drained();
        transport.feed(confirmation("subscribe", "a", 1));
        transport.feed(bulk_array(&["message", "a", "early"]));
        transport.feed(confirmation("subscribe", "b", 2));
        transport.feed(bulk_array(&["message", "b", "late"]));
        let mut redis = Redis::new(transport);
        redis.subscribe("a");
        redis.subscribe("b");

        let mut delivered = Vec::new();
        let result = redis.start_subscribing(
            TestHandlers::new().on_message(|_, msg| delivered.push(msg.payload_text())),
        );

        assert_eq!(result, Err(SubscribeError::ServerDisconnected));
        assert_eq!(delivered, vec!["early", "late"]);
    }

    #[test]
    fn test_setup_rejects_mismatched_confirmation() {
        let mut redis = Redis::new(MemoryTransport::with_input(confirmation("subscribe", "other", 1)));
        redis.subscribe("news");

        let result = redis.start_subscribing(TestHandlers::new().on_message(|_, _| {}));
        assert_eq!(result, Err(SubscribeError::SetupFailure("news".to_string())));
    }

    #[test]
    fn test_unsubscribe_validates_confirmation() {
        let mut redis = Redis::new(MemoryTransport::with_input(confirmation("unsubscribe", "news", 0)));
        redis.subscribe("news");
        assert!(redis.unsubscribe("news"));
        assert!(redis.subscriptions().is_empty());
        assert_eq!(
            redis.client().transport().written(),
            b"*2\r\n$11\r\nUNSUBSCRIBE\r\n$4\r\nnews\r\n"
        );

        let mut redis = Redis::new(MemoryTransport::with_input(confirmation("unsubscribe", "other", 0)));
        assert!(!redis.unsubscribe("news"));

        let mut redis = Redis::new(MemoryTransport::with_input(b":0\r\n"));
        assert!(!redis.unsubscribe("news"));

        let mut redis = Redis::new(MemoryTransport::with_input(bulk_array(&["message", "news", "hi"])));
        assert!(!redis.unsubscribe("news"));
    }

    #[test]
    fn test_punsubscribe() {
        let mut redis = Redis::new(MemoryTransport::with_input(confirmation("punsubscribe", "n.*", 0)));
        redis.psubscribe("n.*");
        redis.subscribe("n.*");
        assert!(redis.punsubscribe("n.*"));
        assert_eq!(redis.subscriptions(), &[SubSpec::channel("n.*")]);
    }

    #[test]
    fn test_binary_payload() {
        let mut redis = Redis::new(MemoryTransport::new().disconnect_when_drained());
        let message = RespValue::array(vec![
            RespValue::bulk_string("message"),
            RespValue::bulk_string("bin"),
            RespValue::bulk_string(&b"\x00\xff\r\n"[..]),
        ]);
        redis
            .client_mut()
            .transport_mut()
            .feed(message.serialize().unwrap());

        let mut payloads = Vec::new();
        let _ = redis.start_subscribing(TestHandlers::new().on_message(|_, msg| payloads.push(msg.payload)));
        assert_eq!(payloads, vec![Bytes::from_static(b"\x00\xff\r\n")]);
    }
}
