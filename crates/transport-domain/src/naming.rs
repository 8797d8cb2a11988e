//! Subject & Naming (C6) per §4.6.
//!
//! Pure, deterministic consumer-name derivation. These names are the only
//! synchronization primitive for horizontal consumer scaling: any number of
//! processes instantiating the same consumer name share the broker-side
//! cursor and load-balance messages at-least-once.

use crate::component::ComponentType;
use crate::kinds::{CommandType, EventType, LogLevel};

/// `UPPER("<component>_cmds")` for the wildcard command, else
/// `UPPER("<component>_cmds_<command>")`.
pub fn cmd_consumer_name(component: ComponentType, command: CommandType) -> String {
    if command.is_wildcard() {
        format!("{}_cmds", component.as_str()).to_uppercase()
    } else {
        format!("{}_cmds_{}", component.as_str(), command.as_str()).to_uppercase()
    }
}

/// `UPPER("<component>_evts")` for the wildcard event, else
/// `UPPER("<component>_evts_<event>")`.
pub fn evt_consumer_name(component: ComponentType, event: EventType) -> String {
    if event.is_wildcard() {
        format!("{}_evts", component.as_str()).to_uppercase()
    } else {
        format!("{}_evts_{}", component.as_str(), event.as_str()).to_uppercase()
    }
}

/// `UPPER("<component>_logs")` for the no-level wildcard, else
/// `UPPER("<component>_logs_<level>")`.
pub fn log_consumer_name(component: ComponentType, level: LogLevel) -> String {
    if level.is_wildcard() {
        format!("{}_logs", component.as_str()).to_uppercase()
    } else {
        format!("{}_logs_{}", component.as_str(), level.as_str()).to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_is_prefix_of_concrete() {
        let wildcard = evt_consumer_name(ComponentType::Workflow, EventType::All);
        let concrete = evt_consumer_name(ComponentType::Workflow, EventType::Started);
        assert!(concrete.starts_with(&wildcard));
        assert_ne!(wildcard, concrete);
    }

    #[test]
    fn names_are_uppercase() {
        let name = cmd_consumer_name(ComponentType::Task, CommandType::Retry);
        assert_eq!(name, name.to_uppercase());
        assert_eq!(name, "TASK_CMDS_RETRY");
    }

    #[test]
    fn distinct_inputs_yield_distinct_names() {
        let a = log_consumer_name(ComponentType::Agent, LogLevel::Warn);
        let b = log_consumer_name(ComponentType::Agent, LogLevel::Error);
        assert_ne!(a, b);
    }
}
