//! Trait for the host boundary so the controller can be tested with mocks.

use anyhow::Result;

#[cfg(any(test, feature = "test-mocks"))]
use mockall::automock;

use crate::protocol::OutboundMessage;

/// Outbound side of the host connection. Sends are fire-and-forget: `Ok`
/// only means the message was queued, never that the host acted on it.
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
pub trait HostTransport: Send + Sync {
    /// Queue a command for the host
    fn post(&self, message: &OutboundMessage) -> Result<()>;
}
