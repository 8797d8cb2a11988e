//! Domain-level error taxonomy (§7): codec and parser failures.

use thiserror::Error;

use crate::component::ComponentType;
use crate::kinds::EventType;

/// Payload encode failure (§7 `EncodeFailed`).
#[derive(Debug, Error)]
#[error("failed to encode payload: {reason}")]
pub struct EncodeError {
    pub reason: String,
}

/// Payload decode or dispatch failure (§7 `DecodeFailed` / `UnsupportedEventType`).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported event type: component={component} event_type={event_type}")]
    UnsupportedEventType {
        component: ComponentType,
        event_type: EventType,
    },

    #[error("failed to decode payload for component={component} event_type={event_type}: {reason}")]
    DecodeFailed {
        component: ComponentType,
        event_type: EventType,
        reason: String,
    },
}
