//! Compozy transport core — port traits.
//!
//! Interfaces the broker adapter (`compozy-transport`) implements and the
//! subscribe loop consumes: the message-handler capability and the ack/nak
//! capability.

pub mod errors;
pub mod handler;

pub use errors::{AckError, HandlerError};
pub use handler::{AckHandle, Message, MessageHandler, TerminationReason};
