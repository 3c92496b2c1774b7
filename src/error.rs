use thiserror::Error;

/// Errors raised by the hub library. Application edges wrap these in `anyhow`.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("unknown host command: {0}")]
    UnknownCommand(String),

    #[error("malformed payload for '{command}': {reason}")]
    MalformedPayload { command: String, reason: String },

    #[error("no handler registered for '{0}'")]
    MissingHandler(&'static str),

    #[error("host command not found: {0}")]
    HostUnavailable(String),

    #[error("host channel closed")]
    HostClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HubError>;
