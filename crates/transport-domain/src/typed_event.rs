//! TypedEvent (sum) per §3 and §4.5.2: one concrete value per
//! `(ComponentType × EventType)` cell in the dispatch table.

use serde::{Deserialize, Serialize, Serializer};

use crate::component::ComponentType;
use crate::kinds::EventType;
use crate::subject::{event_subject, Subject, Subjecter};

/// Workflow lifecycle payload, shared by the Workflow event cells that carry
/// no extra data beyond identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowIdentity {
    pub workflow_id: String,
    pub exec_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowFailed {
    pub workflow_id: String,
    pub exec_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskIdentity {
    pub task_exec_id: String,
    pub workflow_exec_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFailed {
    pub task_exec_id: String,
    pub workflow_exec_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub agent_id: String,
    pub task_exec_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFailed {
    pub agent_id: String,
    pub task_exec_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolIdentity {
    pub tool_id: String,
    pub task_exec_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailed {
    pub tool_id: String,
    pub task_exec_id: String,
    pub reason: String,
}

/// One concrete value per admitted `(component, eventType)` cell (§4.5.2).
/// Exhaustive over the current domain: adding a variant without updating
/// every `match` that dispatches on it is a compile error.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedEvent {
    WorkflowStarted(WorkflowIdentity),
    WorkflowPaused(WorkflowIdentity),
    WorkflowResumed(WorkflowIdentity),
    WorkflowSuccess(WorkflowIdentity),
    WorkflowFailed(WorkflowFailed),
    WorkflowCanceled(WorkflowIdentity),
    WorkflowTimedOut(WorkflowIdentity),

    TaskDispatched(TaskIdentity),
    TaskStarted(TaskIdentity),
    TaskWaitingStarted(TaskIdentity),
    TaskWaitingEnded(TaskIdentity),
    TaskWaitingTimedOut(TaskIdentity),
    TaskSuccess(TaskIdentity),
    TaskFailed(TaskFailed),

    AgentStarted(AgentIdentity),
    AgentSuccess(AgentIdentity),
    AgentFailed(AgentFailed),

    ToolStarted(ToolIdentity),
    ToolSuccess(ToolIdentity),
    ToolFailed(ToolFailed),
}

impl TypedEvent {
    /// The `(component, eventType)` cell this value occupies.
    pub fn cell(&self) -> (ComponentType, EventType) {
        use TypedEvent::*;
        match self {
            WorkflowStarted(_) => (ComponentType::Workflow, EventType::Started),
            WorkflowPaused(_) => (ComponentType::Workflow, EventType::Paused),
            WorkflowResumed(_) => (ComponentType::Workflow, EventType::Resumed),
            WorkflowSuccess(_) => (ComponentType::Workflow, EventType::Success),
            WorkflowFailed(_) => (ComponentType::Workflow, EventType::Failed),
            WorkflowCanceled(_) => (ComponentType::Workflow, EventType::Canceled),
            WorkflowTimedOut(_) => (ComponentType::Workflow, EventType::TimedOut),

            TaskDispatched(_) => (ComponentType::Task, EventType::Dispatched),
            TaskStarted(_) => (ComponentType::Task, EventType::Started),
            TaskWaitingStarted(_) => (ComponentType::Task, EventType::WaitingStarted),
            TaskWaitingEnded(_) => (ComponentType::Task, EventType::WaitingEnded),
            TaskWaitingTimedOut(_) => (ComponentType::Task, EventType::WaitingTimedOut),
            TaskSuccess(_) => (ComponentType::Task, EventType::Success),
            TaskFailed(_) => (ComponentType::Task, EventType::Failed),

            AgentStarted(_) => (ComponentType::Agent, EventType::Started),
            AgentSuccess(_) => (ComponentType::Agent, EventType::Success),
            AgentFailed(_) => (ComponentType::Agent, EventType::Failed),

            ToolStarted(_) => (ComponentType::Tool, EventType::Started),
            ToolSuccess(_) => (ComponentType::Tool, EventType::Success),
            ToolFailed(_) => (ComponentType::Tool, EventType::Failed),
        }
    }
}

impl Subjecter for TypedEvent {
    fn subject(&self) -> Subject {
        let (component, event_type) = self.cell();
        event_subject(component, event_type)
    }
}

/// Serializes only the inner payload, untagged. The subject already encodes
/// which `(component, eventType)` cell a message belongs to (§3 `Envelope`),
/// so the wire payload carries no redundant variant tag — this is what lets
/// [`crate::parser::parse`] decode the same bytes straight into the cell's
/// concrete struct.
impl Serialize for TypedEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use TypedEvent::*;
        match self {
            WorkflowStarted(p) | WorkflowPaused(p) | WorkflowResumed(p) | WorkflowSuccess(p)
            | WorkflowCanceled(p) | WorkflowTimedOut(p) => p.serialize(serializer),
            WorkflowFailed(p) => p.serialize(serializer),
            TaskDispatched(p) | TaskStarted(p) | TaskWaitingStarted(p) | TaskWaitingEnded(p)
            | TaskWaitingTimedOut(p) | TaskSuccess(p) => p.serialize(serializer),
            TaskFailed(p) => p.serialize(serializer),
            AgentStarted(p) | AgentSuccess(p) => p.serialize(serializer),
            AgentFailed(p) => p.serialize(serializer),
            ToolStarted(p) | ToolSuccess(p) => p.serialize(serializer),
            ToolFailed(p) => p.serialize(serializer),
        }
    }
}
