//! Compozy transport core — embedded broker adapter.
//!
//! Implements the runtime surface described in the spec: an embedded
//! JetStream-style broker (C1), its client/control-plane (C2), a durable
//! consumer factory (C3), a pull/ack subscribe loop (C4), and a typed-event
//! publisher (C5's I/O half, paired with `transport-domain`'s codec/parser
//! for the encode/decode half).

pub mod broker;
pub mod client;
pub mod config;
pub mod consumer;
pub mod errors;
pub mod publisher;
pub mod store;
pub mod subscribe;

pub use broker::{Broker, BrokerState};
pub use client::{Client, StreamHandle};
pub use config::{BrokerConfig, ConsumerPolicy, SubscribeConfig};
pub use consumer::{BrokerAckHandle, Consumer, Fetcher};
pub use errors::{BrokerError, ControlPlaneError, FetchError, PublishError, SubscribeError};
pub use publisher::Publisher;
pub use subscribe::Subscriber;
