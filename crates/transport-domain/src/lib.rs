//! Compozy transport core — domain layer.
//!
//! Pure types and functions only: `ComponentType`/`EventType`/`CommandType`/
//! `LogLevel`/`StreamName`, subject construction (C6), the `TypedEvent` sum
//! and its parser (C5's dispatch half), and the payload codec. This crate
//! MUST NOT import a broker client, an async runtime, or I/O of any kind —
//! everything here is synchronous and side-effect free.

pub mod codec;
pub mod component;
pub mod errors;
pub mod kinds;
pub mod naming;
pub mod parser;
pub mod subject;
pub mod typed_event;

pub use codec::{decode, encode};
pub use component::ComponentType;
pub use errors::{EncodeError, ParseError};
pub use kinds::{CommandType, EventType, LogLevel, StreamName};
pub use naming::{cmd_consumer_name, evt_consumer_name, log_consumer_name};
pub use parser::parse as parse_event;
pub use subject::{command_subject, event_subject, log_subject, Subject, Subjecter};
pub use typed_event::*;
