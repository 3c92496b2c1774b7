use std::collections::HashMap;

use serde_json::Value;

use super::{
    decode, EditFormRequest, Envelope, EpicsLoaded, InboundCommand, InitiativesLoaded, TaskActionOutcome,
    TaskListLoaded, TaskRestored,
};
use crate::error::{HubError, Result};
use crate::hub::HubState;
use crate::model::{ActionResult, AwsStatus, EnhancedAwsStatus, EstimationData, JiraStatus};

/// Applies one host notification to the state
pub type Handler = fn(&mut HubState, InboundCommand, Option<Value>) -> Result<()>;

/// Dispatch table from inbound command to handler
pub struct Router {
    handlers: HashMap<InboundCommand, Handler>,
}

fn on_aws_status(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let status: AwsStatus = decode(cmd, data)?;
    state.set_aws_status(status);
    Ok(())
}

fn on_enhanced_status(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let status: EnhancedAwsStatus = decode(cmd, data)?;
    state.set_enhanced_status(status);
    Ok(())
}

fn on_estimation(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let estimation: EstimationData = decode(cmd, data)?;
    state.set_estimation(estimation);
    Ok(())
}

fn on_jira_status(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let status: JiraStatus = decode(cmd, data)?;
    state.set_jira_status(status);
    Ok(())
}

fn on_feedback_result(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let result: ActionResult = decode(cmd, data)?;
    state.apply_feedback_result(result);
    Ok(())
}

fn on_initiatives(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let loaded: InitiativesLoaded = decode(cmd, data)?;
    state.set_initiatives(loaded.initiatives);
    Ok(())
}

fn on_epics(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let loaded: EpicsLoaded = decode(cmd, data)?;
    state.set_epics(loaded.epics);
    Ok(())
}

fn on_task_list(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let loaded: TaskListLoaded = decode(cmd, data)?;
    state.apply_task_list(loaded);
    Ok(())
}

fn on_task_action(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let outcome: TaskActionOutcome = decode(cmd, data)?;
    state.apply_task_action(outcome);
    Ok(())
}

fn on_show_edit_form(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let request: EditFormRequest = decode(cmd, data)?;
    state.show_edit_form(request);
    Ok(())
}

fn on_task_restored(state: &mut HubState, cmd: InboundCommand, data: Option<Value>) -> Result<()> {
    let restored: TaskRestored = decode(cmd, data)?;
    state.apply_task_restored(&restored.task_id);
    Ok(())
}

impl Router {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, command: InboundCommand, handler: Handler) -> &mut Self {
        self.handlers.insert(command, handler);
        self
    }

    /// Router covering every inbound command, checked before use
    pub fn standard() -> Result<Self> {
        let mut router = Self::empty();
        router
            .register(InboundCommand::UpdateAwsStatus, on_aws_status)
            .register(InboundCommand::AwsStatusResponse, on_aws_status)
            .register(InboundCommand::UpdateEnhancedAwsStatus, on_enhanced_status)
            .register(InboundCommand::EnhancedAwsStatusResponse, on_enhanced_status)
            .register(InboundCommand::UpdateEstimationData, on_estimation)
            .register(InboundCommand::EstimationDataResponse, on_estimation)
            .register(InboundCommand::UpdateJiraStatus, on_jira_status)
            .register(InboundCommand::FeedbackResult, on_feedback_result)
            .register(InboundCommand::InitiativesLoaded, on_initiatives)
            .register(InboundCommand::EpicsLoaded, on_epics)
            .register(InboundCommand::TaskListLoaded, on_task_list)
            .register(InboundCommand::TaskActionResult, on_task_action)
            .register(InboundCommand::ShowTaskEditForm, on_show_edit_form)
            .register(InboundCommand::TaskRestored, on_task_restored);
        router.validate()?;
        Ok(router)
    }

    /// Every known inbound command must have a handler
    pub fn validate(&self) -> Result<()> {
        for command in InboundCommand::ALL {
            if !self.handlers.contains_key(command) {
                return Err(HubError::MissingHandler(command.as_str()));
            }
        }
        Ok(())
    }

    /// Route one envelope to its handler
    pub fn dispatch(&self, state: &mut HubState, envelope: Envelope) -> Result<()> {
        let command = InboundCommand::from_name(&envelope.command)
            .ok_or_else(|| HubError::UnknownCommand(envelope.command.clone()))?;
        let handler = self
            .handlers
            .get(&command)
            .ok_or(HubError::MissingHandler(command.as_str()))?;
        tracing::trace!(command = command.as_str(), "dispatching host message");
        handler(state, command, envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskType;
    use serde_json::json;

    fn envelope(command: &str, data: Value) -> Envelope {
        Envelope::new(command, Some(data))
    }

    #[test]
    fn test_standard_router_is_complete() {
        assert!(Router::standard().is_ok());
    }

    #[test]
    fn test_validate_reports_missing_handler() {
        let mut router = Router::empty();
        router.register(InboundCommand::UpdateAwsStatus, on_aws_status);
        match router.validate() {
            Err(HubError::MissingHandler(name)) => assert_eq!(name, "updateEnhancedAWSStatus"),
            other => panic!("unexpected result {:?}", other.err()),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        let router = Router::standard().unwrap();
        let mut state = HubState::new();
        let err = router
            .dispatch(&mut state, envelope("analyzeContext", json!({})))
            .unwrap_err();
        assert!(matches!(err, HubError::UnknownCommand(_)));
    }

    #[test]
    fn test_malformed_payload_leaves_state_alone() {
        let router = Router::standard().unwrap();
        let mut state = HubState::new();
        let err = router
            .dispatch(&mut state, envelope("taskListLoaded", json!({"tasks": "nope"})))
            .unwrap_err();
        assert!(matches!(err, HubError::MalformedPayload { .. }));
        assert!(state.board.current().rows.is_empty());
    }

    #[test]
    fn test_both_status_commands_replace_status() {
        let router = Router::standard().unwrap();
        let mut state = HubState::new();
        router
            .dispatch(&mut state, envelope("awsStatusResponse", json!({"status": "connected", "connected": true})))
            .unwrap();
        assert!(state.aws.connected);

        router
            .dispatch(&mut state, envelope("updateAWSStatus", json!({"status": "error", "connected": false})))
            .unwrap();
        assert!(!state.aws.connected);
        assert_eq!(state.aws.session_expiry, None);
    }

    #[test]
    fn test_task_list_dispatch() {
        let router = Router::standard().unwrap();
        let mut state = HubState::new();
        router
            .dispatch(
                &mut state,
                envelope(
                    "taskListLoaded",
                    json!({
                        "tasks": [{"Id": "a01", "Name": "One"}],
                        "taskType": "running",
                        "pagination": {"currentOffset": 0, "currentLimit": 20, "totalCount": 1, "hasMore": false, "searchTerm": ""}
                    }),
                ),
            )
            .unwrap();
        assert_eq!(state.board.tab(TaskType::Running).rows.len(), 1);
    }
}
