//! EventType, CommandType, LogLevel, and StreamName per §3.

use std::fmt;

/// Kinded verb for a domain event. `All` is a wildcard usable only for
/// consumer-name derivation, never as a concrete event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Started,
    Paused,
    Resumed,
    Success,
    Failed,
    Canceled,
    TimedOut,
    Dispatched,
    WaitingStarted,
    WaitingEnded,
    WaitingTimedOut,
    All,
}

impl EventType {
    pub const ALL: [EventType; 12] = [
        EventType::Started,
        EventType::Paused,
        EventType::Resumed,
        EventType::Success,
        EventType::Failed,
        EventType::Canceled,
        EventType::TimedOut,
        EventType::Dispatched,
        EventType::WaitingStarted,
        EventType::WaitingEnded,
        EventType::WaitingTimedOut,
        EventType::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Started => "started",
            EventType::Paused => "paused",
            EventType::Resumed => "resumed",
            EventType::Success => "success",
            EventType::Failed => "failed",
            EventType::Canceled => "canceled",
            EventType::TimedOut => "timed_out",
            EventType::Dispatched => "dispatched",
            EventType::WaitingStarted => "waiting_started",
            EventType::WaitingEnded => "waiting_ended",
            EventType::WaitingTimedOut => "waiting_timed_out",
            EventType::All => "all",
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, EventType::All)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of commands per component plus an `All` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Start,
    Pause,
    Resume,
    Cancel,
    Retry,
    All,
}

impl CommandType {
    pub const ALL: [CommandType; 6] = [
        CommandType::Start,
        CommandType::Pause,
        CommandType::Resume,
        CommandType::Cancel,
        CommandType::Retry,
        CommandType::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Start => "start",
            CommandType::Pause => "pause",
            CommandType::Resume => "resume",
            CommandType::Cancel => "cancel",
            CommandType::Retry => "retry",
            CommandType::All => "all",
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, CommandType::All)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard severity levels plus a `NoLevel` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    NoLevel,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::NoLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::NoLevel => "no_level",
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, LogLevel::NoLevel)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three canonical durable streams (§3, invariant 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamName {
    Commands,
    Events,
    Logs,
}

impl StreamName {
    pub const ALL: [StreamName; 3] = [StreamName::Commands, StreamName::Events, StreamName::Logs];

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamName::Commands => "commands",
            StreamName::Events => "events",
            StreamName::Logs => "logs",
        }
    }

    /// Subject prefix this stream retains messages under.
    pub fn subject_prefix(&self) -> &'static str {
        match self {
            StreamName::Commands => "cmd.",
            StreamName::Events => "evt.",
            StreamName::Logs => "log.",
        }
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
