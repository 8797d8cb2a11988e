//! Port-level error taxonomy (§7): the `MessageHandler` and ack capability
//! contracts.

use thiserror::Error;

/// Error a `MessageHandler` may report for a single message (§7 `MessageHandler`).
/// Causes the message to be naked for redelivery; the loop continues.
#[derive(Debug, Error)]
#[error("handler failed: {reason}")]
pub struct HandlerError {
    pub reason: String,
}

impl HandlerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Ack/nak RPC failure (§7 `AckProtocol`). Logged; never terminates the loop.
#[derive(Debug, Error)]
#[error("ack protocol failure ({op}): {reason}")]
pub struct AckError {
    pub op: &'static str,
    pub reason: String,
}
