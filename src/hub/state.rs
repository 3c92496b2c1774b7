use crate::model::{
    ActionResult, AwsStatus, EnhancedAwsStatus, Epic, EstimationData, Initiative, JiraStatus, Task,
    TaskActionKind, TaskType,
};
use crate::protocol::{
    EditFormRequest, OutboundMessage, TaskActionOutcome, TaskActionRequest, TaskListLoaded,
};

use super::dropdown::Dropdowns;
use super::feedback::{FeedbackForm, ResultBanner};
use super::modal::ModalState;
use super::tasks::TaskBoard;

/// All UI state. Owned by the controller and changed only through the
/// methods below; commands for the host collect in the outbox until the
/// controller flushes them.
#[derive(Debug, Default)]
pub struct HubState {
    pub aws: AwsStatus,
    pub enhanced: Option<EnhancedAwsStatus>,
    pub jira: Option<JiraStatus>,
    pub estimation: Option<EstimationData>,
    pub board: TaskBoard,
    pub modal: ModalState,
    pub dropdowns: Dropdowns,
    pub feedback: FeedbackForm,
    /// Blocking alert; must be dismissed before anything else
    pub alert: Option<String>,
    /// Result of the last task action
    pub banner: Option<ResultBanner>,
    outbox: Vec<OutboundMessage>,
}

fn action_request(task: &Task) -> Option<TaskActionRequest> {
    let Some(task_id) = task.id.clone().filter(|id| !id.is_empty()) else {
        tracing::warn!(name = ?task.name, "task without id, action aborted");
        return None;
    };
    Some(TaskActionRequest {
        task_id,
        task_name: task.display_name().to_string(),
        task: None,
    })
}

impl HubState {
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&mut self, message: OutboundMessage) {
        self.outbox.push(message);
    }

    /// Drain the commands queued for the host
    pub fn take_outbox(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }

    #[cfg(test)]
    fn pending(&self) -> &[OutboundMessage] {
        &self.outbox
    }

    /// Initial requests. Modals start hidden no matter what came before.
    pub fn startup(&mut self) {
        self.modal.close();
        self.alert = None;
        self.send(OutboundMessage::GetAwsStatus);
        self.send(OutboundMessage::GetEnhancedAwsStatus);
        self.send(OutboundMessage::GetEstimationData);
        let retrieve = self.board.select_tab(TaskType::Wip);
        self.send(retrieve);
    }

    // === Intents ===

    pub fn connect_aws(&mut self) {
        self.send(OutboundMessage::ConnectAws);
    }

    pub fn refresh_aws(&mut self) {
        self.send(OutboundMessage::RefreshAwsConnection);
        self.send(OutboundMessage::GetEnhancedAwsStatus);
    }

    pub fn refresh_estimation(&mut self) {
        self.send(OutboundMessage::GetEstimationData);
    }

    pub fn select_tab(&mut self, tab: TaskType) {
        let msg = self.board.select_tab(tab);
        self.send(msg);
    }

    pub fn next_page(&mut self) {
        if let Some(msg) = self.board.next_page() {
            self.send(msg);
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(msg) = self.board.previous_page() {
            self.send(msg);
        }
    }

    pub fn search(&mut self, term: &str) {
        let msg = self.board.search(term);
        self.send(msg);
    }

    pub fn clear_search(&mut self) {
        let msg = self.board.clear_search();
        self.send(msg);
    }

    /// Ask the host to open the edit form for the selected task
    pub fn request_edit(&mut self) -> bool {
        if !self.board.active().can_edit() {
            return false;
        }
        let Some(task) = self.board.current().selected_task().cloned() else {
            return false;
        };
        let Some(mut request) = action_request(&task) else {
            return false;
        };
        request.task = Some(task);
        self.send(OutboundMessage::EditTask(request));
        true
    }

    pub fn request_delete(&mut self, task: &Task) -> bool {
        match action_request(task) {
            Some(request) => {
                self.send(OutboundMessage::DeleteTask(request));
                true
            }
            None => false,
        }
    }

    pub fn request_cleanup(&mut self) -> bool {
        if !self.board.active().can_cleanup() {
            return false;
        }
        let request = self.board.current().selected_task().and_then(action_request);
        match request {
            Some(request) => {
                self.send(OutboundMessage::CleanupTask(request));
                true
            }
            None => false,
        }
    }

    pub fn request_restore(&mut self) -> bool {
        if !self.board.active().can_restore() {
            return false;
        }
        let request = self.board.current().selected_task().and_then(action_request);
        match request {
            Some(request) => {
                self.send(OutboundMessage::RestoreTask(request));
                true
            }
            None => false,
        }
    }

    /// Open the view modal for the selected task
    pub fn view_selected(&mut self) -> bool {
        let Some(task) = self.board.current().selected_task().cloned() else {
            return false;
        };
        self.modal.open_view(&task)
    }

    /// Save the edit form, raising a blocking alert when validation fails
    pub fn save_edit(&mut self) {
        match self.modal.save() {
            Ok(Some(msg)) => self.send(msg),
            Ok(None) => {}
            Err(err) => {
                tracing::debug!(missing = ?err.missing, "task save blocked");
                self.alert = Some(err.to_string());
            }
        }
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn submit_feedback(&mut self) {
        let initiative = self.dropdowns.selected_initiative().map(|i| i.id.clone());
        if let Some(msg) = self.feedback.submit(initiative) {
            self.send(msg);
        }
    }

    // === Host notifications ===

    pub fn set_aws_status(&mut self, status: AwsStatus) {
        let loads = self.dropdowns.set_connected(status.connected);
        self.aws = status;
        for msg in loads {
            self.send(msg);
        }
    }

    pub fn set_enhanced_status(&mut self, status: EnhancedAwsStatus) {
        self.enhanced = Some(status);
    }

    pub fn set_estimation(&mut self, data: EstimationData) {
        self.estimation = Some(data);
    }

    pub fn set_jira_status(&mut self, status: JiraStatus) {
        self.jira = Some(status);
    }

    pub fn apply_feedback_result(&mut self, result: ActionResult) {
        self.feedback.apply_result(&result);
    }

    pub fn set_initiatives(&mut self, initiatives: Vec<Initiative>) {
        self.dropdowns.set_initiatives(initiatives);
    }

    pub fn set_epics(&mut self, epics: Vec<Epic>) {
        self.dropdowns.set_epics(epics);
    }

    pub fn apply_task_list(&mut self, loaded: TaskListLoaded) {
        self.board.apply_loaded(loaded);
    }

    pub fn apply_task_action(&mut self, outcome: TaskActionOutcome) {
        let fallback = if outcome.result.success {
            match outcome.action {
                TaskActionKind::Update => "Task updated.",
                TaskActionKind::Delete => "Task deleted.",
                TaskActionKind::Cleanup => "Task archived.",
                TaskActionKind::Restore => "Task restored.",
            }
        } else {
            "Task action failed."
        };
        if !outcome.result.success {
            tracing::warn!(
                action = outcome.action.as_str(),
                error = ?outcome.result.error,
                "host reported task action failure"
            );
        }
        self.banner = Some(ResultBanner::from_result(&outcome.result, fallback));
        if let Some(msg) = self.board.apply_action_result(&outcome) {
            self.send(msg);
        }
    }

    pub fn show_edit_form(&mut self, request: EditFormRequest) {
        self.modal.open_edit(request);
    }

    pub fn apply_task_restored(&mut self, task_id: &str) {
        self.board.apply_restored(task_id);
    }
}
