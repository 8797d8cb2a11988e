//! The handler capability (§9 Design Note: "Handler capability").
//!
//! Handlers are modeled as a capability trait rather than a bare function
//! value plus a cancellation context, so lifecycle hooks (`on_terminate`)
//! can be added without changing the call site signature.

use std::future::Future;

use bytes::Bytes;

use crate::errors::{AckError, HandlerError};

/// The capability of a delivered message to be acked or naked. Owned
/// exclusively by the handler invocation that received it — never shared
/// across tasks (§3 ownership).
pub trait AckHandle: Send + Sync {
    fn ack(&self) -> impl Future<Output = Result<(), AckError>> + Send;
    fn nak(&self) -> impl Future<Output = Result<(), AckError>> + Send;
}

/// A pairing of subject + opaque payload + ack handle (§3 `Message`).
pub struct Message<A: AckHandle> {
    pub subject: String,
    pub payload: Bytes,
    pub delivery_count: u64,
    pub ack: A,
}

/// Why a subscribe loop stopped invoking a handler permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The caller's cancellation token fired.
    Canceled,
    /// The consumer backing the loop no longer exists on the broker.
    ConsumerNotFound,
}

/// User-supplied message handler for the subscribe loop (C4).
pub trait MessageHandler<A: AckHandle>: Send + Sync {
    fn handle(&self, msg: &Message<A>) -> impl Future<Output = Result<(), HandlerError>> + Send;

    /// Optional lifecycle hook invoked once, after the loop has emitted its
    /// terminal error and is about to stop. Default: no-op.
    fn on_terminate(&self, _reason: TerminationReason) {}
}

/// Blanket impl so a plain async closure can serve as a handler without
/// requiring callers to name a type for the common case.
impl<A, F, Fut> MessageHandler<A> for F
where
    A: AckHandle,
    F: Fn(&Message<A>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send,
{
    fn handle(&self, msg: &Message<A>) -> impl Future<Output = Result<(), HandlerError>> + Send {
        self(msg)
    }
}
