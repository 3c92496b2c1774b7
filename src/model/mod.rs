mod task;

pub use task::{Pagination, Task, TaskType, PAGE_LIMIT};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Basic AWS connectivity state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwsConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl AwsConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AwsConnectionState::Disconnected => "disconnected",
            AwsConnectionState::Connecting => "connecting",
            AwsConnectionState::Connected => "connected",
            AwsConnectionState::Error => "error",
        }
    }
}

/// AWS status as held by the host. Replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsStatus {
    #[serde(default)]
    pub status: AwsConnectionState,
    #[serde(default)]
    pub connected: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub session_expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets_manager_access: Option<bool>,
}

/// Timestamp as hosts send it: RFC 3339 text or epoch milliseconds
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

/// Accept either timestamp form. Anything else reads as no expiry so the
/// rest of the status still applies.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = match serde_json::from_value::<RawTimestamp>(value.clone()) {
        Ok(RawTimestamp::Millis(ms)) => DateTime::from_timestamp_millis(ms),
        Ok(RawTimestamp::FractionalMillis(ms)) if ms.is_finite() => {
            DateTime::from_timestamp_millis(ms.trunc() as i64)
        }
        Ok(RawTimestamp::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(value = %value, "unreadable session expiry ignored");
    }
    Ok(parsed)
}

/// Result of validating the stored credential secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnhancedStatusKind {
    Ready,
    SecretInvalid,
    SecretNotFound,
    AwsNotConfigured,
    Error,
    Checking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedAwsStatus {
    pub status: EnhancedStatusKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Cached estimation statistics held by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationData {
    #[serde(default)]
    pub total_estimated_hours: Option<f64>,
    #[serde(default)]
    pub total_actual_hours: Option<f64>,
    #[serde(default)]
    pub task_count: Option<u32>,
    #[serde(default)]
    pub ai_adopted_count: Option<u32>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epic {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}

impl Epic {
    /// Dropdown label: "name (team)" when the team is known
    pub fn label(&self) -> String {
        match self.team_name.as_deref() {
            Some(team) if !team.is_empty() => format!("{} ({})", self.name, team),
            _ => self.name.clone(),
        }
    }
}

/// Outcome reported by the host for a user-initiated request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Task action a `taskActionResult` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskActionKind {
    Update,
    Delete,
    Cleanup,
    Restore,
}

impl TaskActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskActionKind::Update => "update",
            TaskActionKind::Delete => "delete",
            TaskActionKind::Cleanup => "cleanup",
            TaskActionKind::Restore => "restore",
        }
    }
}
