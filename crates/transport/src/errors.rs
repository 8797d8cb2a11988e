//! Error taxonomy for the broker adapter (§7). Each enum is closed and
//! mirrors one of the operations in the dependency chain C1 → C2 → C3 → C4/C5.

use thiserror::Error;

/// C1 — broker process lifecycle.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker did not become ready within the startup deadline")]
    NotReady,
    #[error("broker bound to a non-loopback address")]
    AddressResolution,
    #[error("failed to establish the client connection: {0}")]
    ConnectFailed(String),
    #[error("durable log domain mismatch: store holds {on_disk:?}, requested {requested:?}")]
    DomainMismatch {
        on_disk: String,
        requested: String,
    },
    #[error("durable log I/O error: {0}")]
    Io(String),
}

/// C2 — control plane (stream/consumer lookups).
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error("stream {0} is not one of the canonical streams")]
    UnknownStream(String),
    #[error("no canonical stream claims subject prefix of {0}")]
    UnknownSubjectPrefix(String),
    #[error("durable log I/O error: {0}")]
    Io(String),
}

/// C3/C4 — fetching a batch from a durable consumer.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("consumer no longer exists on the broker")]
    ConsumerNotFound,
    #[error("fetch deadline exceeded with no matching messages")]
    DeadlineExceeded,
    #[error("transient fetch error: {0}")]
    Transient(String),
}

/// C4 — terminal outcome reported on the subscribe loop's error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubscribeError {
    #[error("subscribe loop canceled")]
    Canceled,
    #[error("consumer no longer exists on the broker")]
    ConsumerNotFound,
}

/// C5 — publish path.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to encode payload: {0}")]
    EncodeFailed(#[from] transport_domain::EncodeError),
    #[error("publish rejected: {0}")]
    PublishFailed(#[from] ControlPlaneError),
    #[error("publish canceled")]
    Canceled,
}
