//! # FlashKV Client - A Lightweight Blocking Redis Client
//!
//! FlashKV Client speaks RESP, the Redis Serialization Protocol, over any
//! byte transport. It is small enough for constrained targets and keeps the
//! whole request path synchronous: one command written, one reply read.
//!
//! ## Features
//!
//! - **Complete RESP value model**: nil bulk strings and nil arrays stay
//!   distinct from empty ones, and client-side failures are values too
//! - **Streaming decoder**: blocking and non-blocking decoding straight off
//!   the transport, with no intermediate buffering
//! - **Typed facade**: one method per command for keys, strings, hashes,
//!   lists, streams and server commands
//! - **Publish/Subscribe**: a callback-driven subscribe loop that handlers can
//!   stop from the inside
//! - **Pluggable transport**: TCP out of the box, in-memory for tests, or
//!   anything implementing [`Transport`]
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           FlashKV Client                                │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │   Redis     │───>│   Client    │───>│   Command   │                  │
//! │  │  (facade,   │    │ (issue one, │    │  (encoder)  │───┐              │
//! │  │   pubsub)   │    │  read one)  │    └─────────────┘   │              │
//! │  └─────────────┘    └──────┬──────┘                      ▼              │
//! │                            │                   ┌──────────────────┐     │
//! │                            │                   │    Transport     │     │
//! │                     ┌──────▼──────┐            │  ┌─────┐┌──────┐ │     │
//! │                     │ RespDecoder │<───────────│  │ TCP ││Memory│ │     │
//! │                     │ (RespValue) │            │  └─────┘└──────┘ │     │
//! │                     └─────────────┘            └──────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use flashkv_client::{ClientConfig, Redis};
//! use flashkv_client::pubsub::Handlers;
//!
//! fn main() -> flashkv_client::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let mut redis = Redis::connect(&config)?;
//!
//!     redis.set("name", "Ariz");
//!     println!("name = {:?}", redis.get("name"));
//!
//!     redis.subscribe("news");
//!     let result = redis.start_subscribing(Handlers::new().on_message(|redis, msg| {
//!         println!("{}: {}", msg.channel, msg.payload_text());
//!         if msg.payload_text() == "bye" {
//!             redis.stop_subscribing();
//!         }
//!     }));
//!     println!("subscribe loop ended: {:?}", result);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: RESP value model, decoder and command builder
//! - [`transport`]: The byte transport abstraction and its implementations
//! - [`client`]: The command coordinator with typed reply views
//! - [`redis`]: The facade type, [`Redis`]
//! - [`commands`]: Facade methods, one per Redis command
//! - [`pubsub`]: Subscriptions and the subscribe loop
//! - [`config`]: Connection settings from code, URLs or the environment
//!
//! ## Error Handling
//!
//! Failures come in three tiers:
//!
//! 1. **Transport**: the connection is down. Reported as an
//!    `InternalError(Disconnected)` value, never retried.
//! 2. **Protocol**: the server sent something undecodable. Reported as an
//!    `InternalError` with an `UnknownType` or `UnknownError` code.
//! 3. **Server**: a well-formed `-ERR ...` reply. This is data, and the facade
//!    maps it to `false`, `None` or the integer sentinel.
//!
//! Nothing in the library panics on bad input or terminates the process.

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod protocol;
pub mod pubsub;
pub mod redis;
pub mod transport;

// Re-export commonly used types for convenience
pub use client::{Client, INTEGER_SENTINEL};
pub use config::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use error::{Error, Result};
pub use protocol::{Command, InternalError, InternalErrorCode, RespDecoder, RespValue};
pub use pubsub::{Handlers, Message, MessageError, SubscribeError};
pub use redis::Redis;
pub use transport::{MemoryTransport, TcpTransport, Transport};

/// Version of FlashKV Client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
