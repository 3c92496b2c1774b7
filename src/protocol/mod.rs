//! Wire messages exchanged with the host.
//!
//! Both directions use the same envelope, `{ "command": ..., "data": ... }`,
//! one JSON object per line. Delivery is fire-and-forget: there are no
//! request ids and the host never acknowledges a command.

pub mod router;

pub use router::{Handler, Router};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HubError, Result};
use crate::model::{
    ActionResult, Epic, Initiative, Pagination, Task, TaskActionKind, TaskType,
};

/// Raw message as it travels over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn new(command: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            command: command.into(),
            data,
        }
    }

    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Payload of the three task retrieval commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    pub limit: u32,
    pub offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

/// Payload of editTask / deleteTask / cleanupTask / restoreTask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActionRequest {
    pub task_id: String,
    pub task_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub category: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative_id: Option<String>,
}

/// Intents the UI sends to the host
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    ConnectAws,
    RefreshAwsConnection,
    GetAwsStatus,
    GetEnhancedAwsStatus,
    GetEstimationData,
    LoadInitiatives,
    LoadEpics,
    SubmitFeedback(FeedbackRequest),
    RetrieveTasks(TaskType, RetrieveRequest),
    EditTask(TaskActionRequest),
    DeleteTask(TaskActionRequest),
    CleanupTask(TaskActionRequest),
    RestoreTask(TaskActionRequest),
    SaveTaskUpdates {
        task_id: String,
        updates: Map<String, Value>,
    },
}

impl OutboundMessage {
    /// Every command name the UI may send
    pub const COMMANDS: &'static [&'static str] = &[
        "connectAWS",
        "refreshAWSConnection",
        "getAWSStatus",
        "getEnhancedAWSStatus",
        "getEstimationData",
        "loadInitiatives",
        "loadEpics",
        "submitFeedback",
        "retrieveWipTasks",
        "retrieveRunningTasks",
        "retrieveArchivedTasks",
        "editTask",
        "deleteTask",
        "cleanupTask",
        "restoreTask",
        "saveTaskUpdates",
    ];

    pub fn command(&self) -> &'static str {
        match self {
            OutboundMessage::ConnectAws => "connectAWS",
            OutboundMessage::RefreshAwsConnection => "refreshAWSConnection",
            OutboundMessage::GetAwsStatus => "getAWSStatus",
            OutboundMessage::GetEnhancedAwsStatus => "getEnhancedAWSStatus",
            OutboundMessage::GetEstimationData => "getEstimationData",
            OutboundMessage::LoadInitiatives => "loadInitiatives",
            OutboundMessage::LoadEpics => "loadEpics",
            OutboundMessage::SubmitFeedback(_) => "submitFeedback",
            OutboundMessage::RetrieveTasks(TaskType::Wip, _) => "retrieveWipTasks",
            OutboundMessage::RetrieveTasks(TaskType::Running, _) => "retrieveRunningTasks",
            OutboundMessage::RetrieveTasks(TaskType::Archived, _) => "retrieveArchivedTasks",
            OutboundMessage::EditTask(_) => "editTask",
            OutboundMessage::DeleteTask(_) => "deleteTask",
            OutboundMessage::CleanupTask(_) => "cleanupTask",
            OutboundMessage::RestoreTask(_) => "restoreTask",
            OutboundMessage::SaveTaskUpdates { .. } => "saveTaskUpdates",
        }
    }

    pub fn to_envelope(&self) -> Result<Envelope> {
        let data = match self {
            OutboundMessage::ConnectAws
            | OutboundMessage::RefreshAwsConnection
            | OutboundMessage::GetAwsStatus
            | OutboundMessage::GetEnhancedAwsStatus
            | OutboundMessage::GetEstimationData
            | OutboundMessage::LoadInitiatives
            | OutboundMessage::LoadEpics => None,
            OutboundMessage::SubmitFeedback(req) => Some(serde_json::to_value(req)?),
            OutboundMessage::RetrieveTasks(_, req) => Some(serde_json::to_value(req)?),
            OutboundMessage::EditTask(req)
            | OutboundMessage::DeleteTask(req)
            | OutboundMessage::CleanupTask(req)
            | OutboundMessage::RestoreTask(req) => Some(serde_json::to_value(req)?),
            OutboundMessage::SaveTaskUpdates { task_id, updates } => Some(serde_json::json!({
                "taskId": task_id,
                "updates": updates,
            })),
        };
        Ok(Envelope::new(self.command(), data))
    }
}

/// Notifications the host sends to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundCommand {
    UpdateAwsStatus,
    UpdateEnhancedAwsStatus,
    UpdateEstimationData,
    UpdateJiraStatus,
    AwsStatusResponse,
    EnhancedAwsStatusResponse,
    EstimationDataResponse,
    FeedbackResult,
    InitiativesLoaded,
    EpicsLoaded,
    TaskListLoaded,
    TaskActionResult,
    ShowTaskEditForm,
    TaskRestored,
}

impl InboundCommand {
    pub const ALL: &'static [InboundCommand] = &[
        InboundCommand::UpdateAwsStatus,
        InboundCommand::UpdateEnhancedAwsStatus,
        InboundCommand::UpdateEstimationData,
        InboundCommand::UpdateJiraStatus,
        InboundCommand::AwsStatusResponse,
        InboundCommand::EnhancedAwsStatusResponse,
        InboundCommand::EstimationDataResponse,
        InboundCommand::FeedbackResult,
        InboundCommand::InitiativesLoaded,
        InboundCommand::EpicsLoaded,
        InboundCommand::TaskListLoaded,
        InboundCommand::TaskActionResult,
        InboundCommand::ShowTaskEditForm,
        InboundCommand::TaskRestored,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InboundCommand::UpdateAwsStatus => "updateAWSStatus",
            InboundCommand::UpdateEnhancedAwsStatus => "updateEnhancedAWSStatus",
            InboundCommand::UpdateEstimationData => "updateEstimationData",
            InboundCommand::UpdateJiraStatus => "updateJiraStatus",
            InboundCommand::AwsStatusResponse => "awsStatusResponse",
            InboundCommand::EnhancedAwsStatusResponse => "enhancedAWSStatusResponse",
            InboundCommand::EstimationDataResponse => "estimationDataResponse",
            InboundCommand::FeedbackResult => "feedbackResult",
            InboundCommand::InitiativesLoaded => "initiativesLoaded",
            InboundCommand::EpicsLoaded => "epicsLoaded",
            InboundCommand::TaskListLoaded => "taskListLoaded",
            InboundCommand::TaskActionResult => "taskActionResult",
            InboundCommand::ShowTaskEditForm => "showTaskEditForm",
            InboundCommand::TaskRestored => "taskRestored",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListLoaded {
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub task_type: TaskType,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActionOutcome {
    pub result: ActionResult,
    pub action: TaskActionKind,
    #[serde(default)]
    pub task_id: Option<String>,
}

impl TaskActionOutcome {
    /// Task the result refers to, wherever the host put it
    pub fn task_id(&self) -> Option<&str> {
        self.result.task_id.as_deref().or(self.task_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRestored {
    pub task_id: String,
}

/// Payload of `showTaskEditForm`. The task may arrive nested under `task`
/// or inline at the top level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditFormRequest {
    #[serde(rename = "taskId", default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task: Option<Task>,
    #[serde(flatten)]
    pub inline: Task,
}

impl EditFormRequest {
    /// Resolve the task snapshot and its identifier (`taskId` wins over `Id`)
    pub fn into_parts(self) -> (Option<String>, Task) {
        let task = self.task.unwrap_or(self.inline);
        let id = self
            .task_id
            .filter(|id| !id.is_empty())
            .or_else(|| task.id.clone().filter(|id| !id.is_empty()));
        (id, task)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitiativesLoaded {
    #[serde(default)]
    pub initiatives: Vec<Initiative>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpicsLoaded {
    #[serde(default)]
    pub epics: Vec<Epic>,
}

/// Deserialize a payload, reporting which command it belonged to on failure
pub fn decode<T: DeserializeOwned>(command: InboundCommand, data: Option<Value>) -> Result<T> {
    serde_json::from_value(data.unwrap_or(Value::Null)).map_err(|e| HubError::MalformedPayload {
        command: command.as_str().to_string(),
        reason: e.to_string(),
    })
}
