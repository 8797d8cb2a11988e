//! Subject construction and the `Subjecter` capability per §3 and §4.6.

use crate::component::ComponentType;
use crate::kinds::{CommandType, EventType, LogLevel, StreamName};

/// An opaque dotted routing key attached to every message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The capability of a domain event to produce its own publish subject.
/// The publisher (C5) depends only on this capability, never on a concrete type.
pub trait Subjecter {
    fn subject(&self) -> Subject;
}

/// Deterministic event subject: `evt.<component>.<event_type>`.
pub fn event_subject(component: ComponentType, event_type: EventType) -> Subject {
    Subject(format!(
        "{}{}.{}",
        StreamName::Events.subject_prefix(),
        component.as_str(),
        event_type.as_str()
    ))
}

/// Deterministic command subject: `cmd.<component>.<command_type>`.
pub fn command_subject(component: ComponentType, command_type: CommandType) -> Subject {
    Subject(format!(
        "{}{}.{}",
        StreamName::Commands.subject_prefix(),
        component.as_str(),
        command_type.as_str()
    ))
}

/// Deterministic log subject: `log.<component>.<level>`.
pub fn log_subject(component: ComponentType, level: LogLevel) -> Subject {
    Subject(format!(
        "{}{}.{}",
        StreamName::Logs.subject_prefix(),
        component.as_str(),
        level.as_str()
    ))
}
