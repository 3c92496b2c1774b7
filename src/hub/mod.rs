pub mod dropdown;
pub mod estimation;
pub mod feedback;
pub mod modal;
pub mod state;
pub mod status;
pub mod tasks;

pub use state::HubState;

use anyhow::Result;
use std::sync::Arc;

use crate::error::HubError;
use crate::host::HostTransport;
use crate::protocol::{Envelope, Router};

/// Owns the state and wires it to the router and the host
pub struct Controller {
    state: HubState,
    router: Router,
    host: Arc<dyn HostTransport>,
}

impl Controller {
    pub fn new(host: Arc<dyn HostTransport>) -> Result<Self> {
        Ok(Self {
            state: HubState::new(),
            router: Router::standard()?,
            host,
        })
    }

    pub fn state(&self) -> &HubState {
        &self.state
    }

    /// Send the initial requests
    pub fn startup(&mut self) {
        self.act(HubState::startup);
    }

    /// Run a state update and send whatever it queued
    pub fn act<R>(&mut self, f: impl FnOnce(&mut HubState) -> R) -> R {
        let result = f(&mut self.state);
        self.flush();
        result
    }

    /// Apply one host notification. Unknown commands and malformed payloads
    /// are logged and dropped.
    pub fn receive(&mut self, envelope: Envelope) {
        let command = envelope.command.clone();
        match self.router.dispatch(&mut self.state, envelope) {
            Ok(()) => {}
            Err(HubError::UnknownCommand(name)) => {
                tracing::warn!(command = %name, "ignoring unknown host command");
            }
            Err(e) => {
                tracing::warn!(command = %command, error = %e, "dropping host message");
            }
        }
        self.flush();
    }

    /// Post every queued command. There is no retry; a failed send is logged.
    pub fn flush(&mut self) {
        for message in self.state.take_outbox() {
            if let Err(e) = self.host.post(&message) {
                tracing::error!(command = message.command(), error = %e, "failed to send to host");
            }
        }
    }
}
