//! Event Codec & Router — parser half (C5) per §4.5.2.
//!
//! `parse` is total over the declared `(component, eventType)` product:
//! every admitted cell decodes into its concrete [`TypedEvent`] variant;
//! every other cell fails closed with `UnsupportedEventType` before any
//! payload decoding is attempted (§8 S3).

use crate::codec::decode;
use crate::component::ComponentType;
use crate::errors::ParseError;
use crate::kinds::EventType;
use crate::typed_event::*;

pub fn parse(
    component: ComponentType,
    event_type: EventType,
    payload: &[u8],
) -> Result<TypedEvent, ParseError> {
    use ComponentType::*;
    use EventType::*;

    let decode_failed = |reason: postcard::Error| ParseError::DecodeFailed {
        component,
        event_type,
        reason: reason.to_string(),
    };

    match (component, event_type) {
        (Workflow, Started) => decode(payload).map(TypedEvent::WorkflowStarted).map_err(decode_failed),
        (Workflow, Paused) => decode(payload).map(TypedEvent::WorkflowPaused).map_err(decode_failed),
        (Workflow, Resumed) => decode(payload).map(TypedEvent::WorkflowResumed).map_err(decode_failed),
        (Workflow, Success) => decode(payload).map(TypedEvent::WorkflowSuccess).map_err(decode_failed),
        (Workflow, Failed) => decode(payload).map(TypedEvent::WorkflowFailed).map_err(decode_failed),
        (Workflow, Canceled) => decode(payload).map(TypedEvent::WorkflowCanceled).map_err(decode_failed),
        (Workflow, TimedOut) => decode(payload).map(TypedEvent::WorkflowTimedOut).map_err(decode_failed),

        (Task, Dispatched) => decode(payload).map(TypedEvent::TaskDispatched).map_err(decode_failed),
        (Task, Started) => decode(payload).map(TypedEvent::TaskStarted).map_err(decode_failed),
        (Task, WaitingStarted) => decode(payload).map(TypedEvent::TaskWaitingStarted).map_err(decode_failed),
        (Task, WaitingEnded) => decode(payload).map(TypedEvent::TaskWaitingEnded).map_err(decode_failed),
        (Task, WaitingTimedOut) => decode(payload).map(TypedEvent::TaskWaitingTimedOut).map_err(decode_failed),
        (Task, Success) => decode(payload).map(TypedEvent::TaskSuccess).map_err(decode_failed),
        (Task, Failed) => decode(payload).map(TypedEvent::TaskFailed).map_err(decode_failed),

        (Agent, Started) => decode(payload).map(TypedEvent::AgentStarted).map_err(decode_failed),
        (Agent, Success) => decode(payload).map(TypedEvent::AgentSuccess).map_err(decode_failed),
        (Agent, Failed) => decode(payload).map(TypedEvent::AgentFailed).map_err(decode_failed),

        (Tool, Started) => decode(payload).map(TypedEvent::ToolStarted).map_err(decode_failed),
        (Tool, Success) => decode(payload).map(TypedEvent::ToolSuccess).map_err(decode_failed),
        (Tool, Failed) => decode(payload).map(TypedEvent::ToolFailed).map_err(decode_failed),

        _ => Err(ParseError::UnsupportedEventType {
            component,
            event_type,
        }),
    }
}
