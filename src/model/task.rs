use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page size used for every task retrieval
pub const PAGE_LIMIT: u32 = 20;

/// Which task list a tab shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Wip,
    Running,
    Archived,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Wip => "wip",
            TaskType::Running => "running",
            TaskType::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "wip" => Some(TaskType::Wip),
            "running" => Some(TaskType::Running),
            "archived" => Some(TaskType::Archived),
            _ => None,
        }
    }

    /// Tab title
    pub fn title(&self) -> &'static str {
        match self {
            TaskType::Wip => "WIP",
            TaskType::Running => "Running",
            TaskType::Archived => "Archived",
        }
    }

    /// Wording used in empty-state messages
    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Wip => "work-in-progress",
            TaskType::Running => "running",
            TaskType::Archived => "archived",
        }
    }

    pub fn tabs() -> &'static [TaskType] {
        &[TaskType::Wip, TaskType::Running, TaskType::Archived]
    }

    pub fn index(&self) -> usize {
        match self {
            TaskType::Wip => 0,
            TaskType::Running => 1,
            TaskType::Archived => 2,
        }
    }

    pub fn can_edit(&self) -> bool {
        matches!(self, TaskType::Wip | TaskType::Running)
    }

    pub fn can_delete(&self) -> bool {
        matches!(self, TaskType::Wip)
    }

    pub fn can_cleanup(&self) -> bool {
        matches!(self, TaskType::Wip | TaskType::Running)
    }

    pub fn can_restore(&self) -> bool {
        matches!(self, TaskType::Archived)
    }
}

/// A ticket record owned by the external ticket system.
///
/// Every field is optional on the wire since host payloads may be partial.
/// Fields the hub does not know about are kept in `extra` so the snapshot
/// sent back with `editTask` is complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Description__c", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Status__c", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Type__c", default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(rename = "Jira_Link__c", default, skip_serializing_if = "Option::is_none")]
    pub jira_link: Option<String>,
    #[serde(rename = "Estimated_Effort_Hours__c", default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(rename = "Actual_Effort_Hours__c", default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(rename = "Jira_Priority__c", default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(rename = "Jira_Acceptance_Criteria__c", default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<String>,
    #[serde(rename = "Resolution__c", default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(rename = "Deployment_Date__c", default, skip_serializing_if = "Option::is_none")]
    pub deployment_date: Option<String>,
    #[serde(rename = "Epic__c", default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,
    #[serde(rename = "AI_Adopted__c", default, skip_serializing_if = "Option::is_none")]
    pub ai_adopted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// AI adoption flag; absent means adopted
    pub fn is_ai_adopted(&self) -> bool {
        self.ai_adopted.unwrap_or(true)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(untitled)")
    }

    pub fn is_done(&self) -> bool {
        self.status.as_deref() == Some("Done")
    }
}

/// Pagination info as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current_offset: u32,
    #[serde(default = "default_limit")]
    pub current_limit: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub search_term: String,
}

/// Hosts send `null` for an unsearched page
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_limit() -> u32 {
    PAGE_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_offset: 0,
            current_limit: PAGE_LIMIT,
            total_count: 0,
            has_more: false,
            search_term: String::new(),
        }
    }
}
