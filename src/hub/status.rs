use chrono::{DateTime, Utc};

use crate::model::{
    AwsConnectionState, AwsStatus, EnhancedAwsStatus, EnhancedStatusKind, EstimationData, JiraStatus,
};

/// Visual weight of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Info,
    Warning,
    Error,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

impl StatusLine {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

impl AwsConnectionState {
    /// Dot shown next to the connection label
    pub fn indicator(&self) -> &'static str {
        match self {
            AwsConnectionState::Connected => "●",
            AwsConnectionState::Connecting => "◐",
            AwsConnectionState::Disconnected => "○",
            AwsConnectionState::Error => "✗",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            AwsConnectionState::Connected => Tone::Ok,
            AwsConnectionState::Connecting => Tone::Info,
            AwsConnectionState::Disconnected => Tone::Muted,
            AwsConnectionState::Error => Tone::Error,
        }
    }
}

/// Remaining session time, e.g. "expires in 1h 05m"
pub fn session_expiry_text(expiry: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = expiry - now;
    if remaining.num_seconds() <= 0 {
        return "session expired".to_string();
    }
    let minutes = remaining.num_minutes();
    if minutes >= 60 {
        format!("expires in {}h {:02}m", minutes / 60, minutes % 60)
    } else {
        format!("expires in {}m", minutes.max(1))
    }
}

/// Header line for the AWS connection
pub fn aws_status_line(status: &AwsStatus, now: DateTime<Utc>) -> StatusLine {
    let mut text = format!("{} AWS {}", status.status.indicator(), status.status.as_str());
    if status.connected {
        if let Some(expiry) = status.session_expiry {
            text.push_str(&format!(" ({})", session_expiry_text(expiry, now)));
        }
        if status.secrets_manager_access == Some(false) {
            text.push_str(" - no Secrets Manager access");
            return StatusLine::new(text, Tone::Warning);
        }
    }
    StatusLine::new(text, status.status.tone())
}

pub fn jira_status_line(status: Option<&JiraStatus>) -> StatusLine {
    match status {
        None => StatusLine::new("○ Jira unknown", Tone::Muted),
        Some(s) => {
            let (dot, label, tone) = if s.connected {
                ("●", "connected", Tone::Ok)
            } else {
                ("○", "disconnected", Tone::Muted)
            };
            let mut text = format!("{} Jira {}", dot, label);
            if let Some(msg) = s.message.as_deref().filter(|m| !m.is_empty()) {
                text.push_str(&format!(" - {}", msg));
            }
            StatusLine::new(text, tone)
        }
    }
}

impl EnhancedStatusKind {
    pub fn title(&self) -> &'static str {
        match self {
            EnhancedStatusKind::Ready => "Credentials ready",
            EnhancedStatusKind::SecretInvalid => "Stored secret is invalid",
            EnhancedStatusKind::SecretNotFound => "Secret not found",
            EnhancedStatusKind::AwsNotConfigured => "AWS is not configured",
            EnhancedStatusKind::Error => "Credential check failed",
            EnhancedStatusKind::Checking => "Checking credentials...",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            EnhancedStatusKind::Ready => Tone::Ok,
            EnhancedStatusKind::Checking => Tone::Info,
            EnhancedStatusKind::SecretInvalid | EnhancedStatusKind::SecretNotFound => Tone::Warning,
            EnhancedStatusKind::AwsNotConfigured | EnhancedStatusKind::Error => Tone::Error,
        }
    }
}

/// Lines describing the enhanced credential status
pub fn enhanced_status_lines(status: &EnhancedAwsStatus) -> Vec<StatusLine> {
    let mut lines = vec![StatusLine::new(status.status.title(), status.status.tone())];
    if let Some(missing) = status.missing_fields.as_ref().filter(|m| !m.is_empty()) {
        lines.push(StatusLine::new(
            format!("Missing fields: {}", missing.join(", ")),
            Tone::Warning,
        ));
    }
    if let Some(details) = status.details.as_deref().filter(|d| !d.is_empty()) {
        lines.push(StatusLine::new(details, Tone::Muted));
    }
    lines
}

/// Secret validation panel while AWS is not connected. The enhanced status
/// is shown whenever the host has sent one, so credential problems surface
/// before a connection exists.
pub fn disconnected_secret_validation(enhanced: Option<&EnhancedAwsStatus>) -> Vec<StatusLine> {
    let mut lines = vec![StatusLine::new("AWS not connected", Tone::Muted)];
    match enhanced {
        Some(status) => lines.extend(enhanced_status_lines(status)),
        None => lines.push(StatusLine::new("Press [C] to connect and validate the stored secret", Tone::Info)),
    }
    lines
}

/// Secret validation panel for any connection state
pub fn secret_validation(aws: &AwsStatus, enhanced: Option<&EnhancedAwsStatus>) -> Vec<StatusLine> {
    if !aws.connected {
        return disconnected_secret_validation(enhanced);
    }
    match enhanced {
        Some(status) => enhanced_status_lines(status),
        None => vec![StatusLine::new("Secret not validated yet", Tone::Muted)],
    }
}

fn format_hours(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}h", v),
        None => "-".to_string(),
    }
}

pub fn estimation_lines(data: Option<&EstimationData>) -> Vec<StatusLine> {
    let Some(data) = data else {
        return vec![StatusLine::new("No estimation data", Tone::Muted)];
    };
    let mut lines = vec![
        StatusLine::new(format!("Estimated: {}", format_hours(data.total_estimated_hours)), Tone::Info),
        StatusLine::new(format!("Actual:    {}", format_hours(data.total_actual_hours)), Tone::Info),
    ];
    if let Some(count) = data.task_count {
        let adopted = data.ai_adopted_count.map(|a| format!(" ({} AI adopted)", a)).unwrap_or_default();
        lines.push(StatusLine::new(format!("Tasks:     {}{}", count, adopted), Tone::Info));
    }
    if let Some(updated) = data.last_updated.as_deref() {
        lines.push(StatusLine::new(format!("Updated {}", updated), Tone::Muted));
    }
    lines
}
