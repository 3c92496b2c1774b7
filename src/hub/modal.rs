use serde_json::{json, Map, Value};
use thiserror::Error;

use super::estimation::{convert_to_hours, EstimationUnit};
use crate::model::{Epic, Task};
use crate::protocol::{EditFormRequest, OutboundMessage};

/// Status value that makes the resolution fields mandatory
pub const DONE_STATUS: &str = "Done";

pub const STATUS_OPTIONS: &[&str] = &["Not Started", "In Progress", "Blocked", "In Review", DONE_STATUS];
pub const PRIORITY_OPTIONS: &[&str] = &["Highest", "High", "Medium", "Low", "Lowest"];

/// Client-side rejection of a save
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in {} before marking the task as Done.", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// Editable fields of the task form, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    Status,
    Type,
    JiraLink,
    Priority,
    AcceptanceCriteria,
    EstimatedEffort,
    EstimationUnit,
    Epic,
    AiAdopted,
    DeploymentDate,
    ActualHours,
    Resolution,
}

impl FormField {
    const BASE: &'static [FormField] = &[
        FormField::Description,
        FormField::Status,
        FormField::Type,
        FormField::JiraLink,
        FormField::Priority,
        FormField::AcceptanceCriteria,
        FormField::EstimatedEffort,
        FormField::EstimationUnit,
        FormField::Epic,
        FormField::AiAdopted,
    ];

    const CONDITIONAL: &'static [FormField] = &[
        FormField::DeploymentDate,
        FormField::ActualHours,
        FormField::Resolution,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Description => "Description",
            FormField::Status => "Status",
            FormField::Type => "Type",
            FormField::JiraLink => "Jira Link",
            FormField::Priority => "Priority",
            FormField::AcceptanceCriteria => "Acceptance Criteria",
            FormField::EstimatedEffort => "Estimated Effort",
            FormField::EstimationUnit => "Unit",
            FormField::Epic => "Epic",
            FormField::AiAdopted => "AI Adopted",
            FormField::DeploymentDate => "Deployment Date",
            FormField::ActualHours => "Actual Hours",
            FormField::Resolution => "Resolution",
        }
    }

    /// Fields changed by cycling through options rather than typing
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FormField::Status
                | FormField::Priority
                | FormField::EstimationUnit
                | FormField::Epic
                | FormField::AiAdopted
        )
    }

    pub fn is_conditional(&self) -> bool {
        Self::CONDITIONAL.contains(self)
    }
}

/// Working copy of a task being edited
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub task_id: String,
    pub snapshot: Task,
    pub description: String,
    pub status: String,
    pub task_type: String,
    pub jira_link: String,
    pub priority: String,
    pub acceptance_criteria: String,
    pub estimated_effort: String,
    pub estimation_unit: EstimationUnit,
    pub epic: String,
    pub ai_adopted: bool,
    pub deployment_date: String,
    pub actual_hours: String,
    pub resolution: String,
    pub focus: FormField,
}

fn format_hours(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl EditForm {
    pub fn from_task(task_id: String, task: Task) -> Self {
        Self {
            task_id,
            description: task.description.clone().unwrap_or_default(),
            status: task.status.clone().unwrap_or_default(),
            task_type: task.task_type.clone().unwrap_or_default(),
            jira_link: task.jira_link.clone().unwrap_or_default(),
            priority: task.priority.clone().unwrap_or_default(),
            acceptance_criteria: task.acceptance_criteria.clone().unwrap_or_default(),
            estimated_effort: format_hours(task.estimated_hours),
            estimation_unit: EstimationUnit::Hours,
            epic: task.epic.clone().unwrap_or_default(),
            ai_adopted: task.is_ai_adopted(),
            deployment_date: task.deployment_date.clone().unwrap_or_default(),
            actual_hours: format_hours(task.actual_hours),
            resolution: task.resolution.clone().unwrap_or_default(),
            snapshot: task,
            focus: FormField::Description,
        }
    }

    pub fn name(&self) -> &str {
        self.snapshot.display_name()
    }

    /// Deployment date, actual hours and resolution are shown and required
    /// only while the status is exactly "Done"
    pub fn requires_resolution(&self) -> bool {
        self.status == DONE_STATUS
    }

    pub fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = FormField::BASE.to_vec();
        if self.requires_resolution() {
            fields.extend_from_slice(FormField::CONDITIONAL);
        }
        fields
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.requires_resolution() {
            return Ok(());
        }
        let missing: Vec<&'static str> = [
            (FormField::DeploymentDate, &self.deployment_date),
            (FormField::ActualHours, &self.actual_hours),
            (FormField::Resolution, &self.resolution),
        ]
        .into_iter()
        .filter(|(field, value)| match field {
            // Must be a number or it would be left out of the update
            FormField::ActualHours => parse_hours(value).is_none(),
            _ => value.trim().is_empty(),
        })
        .map(|(field, _)| field.label())
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Assemble the update map. Empty values are left out.
    pub fn build_updates(&self) -> Map<String, Value> {
        let mut updates = Map::new();
        let mut put_text = |key: &str, value: &str| {
            let value = value.trim();
            if !value.is_empty() {
                updates.insert(key.to_string(), json!(value));
            }
        };

        put_text("Description__c", self.description.as_str());
        put_text("Status__c", self.status.as_str());
        put_text("Type__c", self.task_type.as_str());
        put_text("Jira_Link__c", self.jira_link.as_str());
        put_text("Jira_Priority__c", self.priority.as_str());
        put_text("Jira_Acceptance_Criteria__c", self.acceptance_criteria.as_str());
        put_text("Epic__c", self.epic.as_str());
        put_text("Deployment_Date__c", self.deployment_date.as_str());
        put_text("Resolution__c", self.resolution.as_str());

        let estimated = convert_to_hours(
            parse_hours(&self.estimated_effort),
            self.estimation_unit.as_str(),
        );
        updates.insert("Estimated_Effort_Hours__c".to_string(), json!(estimated));

        if let Some(actual) = parse_hours(&self.actual_hours) {
            updates.insert("Actual_Effort_Hours__c".to_string(), json!(actual));
        } else if !self.actual_hours.trim().is_empty() {
            tracing::warn!(value = %self.actual_hours, "actual hours is not a number, left out of update");
        }

        updates.insert("AI_Adopted__c".to_string(), json!(self.ai_adopted));
        updates
    }

    pub fn focus_next(&mut self) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Description => Some(&mut self.description),
            FormField::Type => Some(&mut self.task_type),
            FormField::JiraLink => Some(&mut self.jira_link),
            FormField::AcceptanceCriteria => Some(&mut self.acceptance_criteria),
            FormField::EstimatedEffort => Some(&mut self.estimated_effort),
            FormField::DeploymentDate => Some(&mut self.deployment_date),
            FormField::ActualHours => Some(&mut self.actual_hours),
            FormField::Resolution => Some(&mut self.resolution),
            _ => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(text) = self.text_mut(self.focus) {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut(self.focus) {
            text.pop();
        }
    }

    /// Advance the focused choice field to its next option
    pub fn cycle(&mut self, epics: &[Epic]) {
        match self.focus {
            FormField::Status => {
                self.status = next_option(STATUS_OPTIONS, &self.status);
            }
            FormField::Priority => {
                self.priority = next_option(PRIORITY_OPTIONS, &self.priority);
            }
            FormField::EstimationUnit => {
                self.estimation_unit = self.estimation_unit.next();
            }
            FormField::Epic => {
                let ids: Vec<&str> = epics.iter().map(|e| e.id.as_str()).collect();
                if !ids.is_empty() {
                    self.epic = next_option(&ids, &self.epic);
                }
            }
            FormField::AiAdopted => {
                self.ai_adopted = !self.ai_adopted;
            }
            _ => {}
        }
    }
}

fn next_option(options: &[&str], current: &str) -> String {
    let next = match options.iter().position(|o| *o == current) {
        Some(idx) => (idx + 1) % options.len(),
        None => 0,
    };
    options[next].to_string()
}

fn parse_hours(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read-only task details
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetails {
    pub task_id: String,
    pub task: Task,
}

/// Edit and view modals. At most one is visible.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModalState {
    #[default]
    Hidden,
    Editing(EditForm),
    Viewing(TaskDetails),
}

impl ModalState {
    pub fn is_hidden(&self) -> bool {
        matches!(self, ModalState::Hidden)
    }

    pub fn edit_form(&self) -> Option<&EditForm> {
        match self {
            ModalState::Editing(form) => Some(form),
            _ => None,
        }
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        match self {
            ModalState::Editing(form) => Some(form),
            _ => None,
        }
    }

    /// Enter editing. Requests without a task identifier are rejected and
    /// leave the modal state untouched.
    pub fn open_edit(&mut self, request: EditFormRequest) -> bool {
        let (task_id, task) = request.into_parts();
        let Some(task_id) = task_id else {
            tracing::warn!("edit request without task id ignored");
            return false;
        };
        tracing::debug!(task_id = %task_id, "opening edit form");
        *self = ModalState::Editing(EditForm::from_task(task_id, task));
        true
    }

    /// Enter viewing. Needs both an identifier and a name.
    pub fn open_view(&mut self, task: &Task) -> bool {
        let id = task.id.as_deref().filter(|id| !id.is_empty());
        let name = task.name.as_deref().filter(|name| !name.is_empty());
        let (Some(id), Some(_)) = (id, name) else {
            tracing::warn!(task_id = ?task.id, "view request without id or name ignored");
            return false;
        };
        *self = ModalState::Viewing(TaskDetails {
            task_id: id.to_string(),
            task: task.clone(),
        });
        true
    }

    pub fn close(&mut self) {
        *self = ModalState::Hidden;
    }

    /// Validate and build the update command. On success the modal closes
    /// right away without waiting for the host; on failure it stays open.
    pub fn save(&mut self) -> Result<Option<OutboundMessage>, ValidationError> {
        let Some(form) = self.edit_form() else {
            return Ok(None);
        };
        form.validate()?;
        let message = OutboundMessage::SaveTaskUpdates {
            task_id: form.task_id.clone(),
            updates: form.build_updates(),
        };
        self.close();
        Ok(Some(message))
    }
}
