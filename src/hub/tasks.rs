use std::collections::HashMap;

use crate::model::{Pagination, Task, TaskActionKind, TaskType, PAGE_LIMIT};
use crate::protocol::{OutboundMessage, RetrieveRequest, TaskActionOutcome, TaskListLoaded};

/// Load phase of a single tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Populated,
    Empty,
}

/// Identifier of a rendered row. Stable for the lifetime of one loaded page.
pub type RowId = u64;

/// Rendered rows plus the task record behind each one
#[derive(Debug, Default)]
pub struct TaskRows {
    order: Vec<RowId>,
    records: HashMap<RowId, Task>,
    next_row: RowId,
}

impl TaskRows {
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.order.clear();
        self.records.clear();
        for task in tasks {
            let row = self.next_row;
            self.next_row += 1;
            self.order.push(row);
            self.records.insert(row, task);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&Task> {
        self.order.get(index).and_then(|row| self.records.get(row))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, &Task)> {
        self.order
            .iter()
            .filter_map(|row| self.records.get(row).map(|task| (*row, task)))
    }

    /// Row showing the task with the given `Id`
    pub fn find(&self, task_id: &str) -> Option<RowId> {
        self.iter()
            .find(|(_, task)| task.id.as_deref() == Some(task_id))
            .map(|(row, _)| row)
    }

    pub fn remove(&mut self, row: RowId) -> Option<Task> {
        self.order.retain(|r| *r != row);
        self.records.remove(&row)
    }
}

/// Derived pagination display for a loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    pub range_text: String,
}

impl PageInfo {
    pub fn compute(pagination: &Pagination, rendered: usize) -> Self {
        let limit = if pagination.current_limit == 0 {
            PAGE_LIMIT
        } else {
            pagination.current_limit
        };
        // Host-supplied numbers, widened so no sum can overflow
        let offset = u64::from(pagination.current_offset);
        let total = u64::from(pagination.total_count);
        let limit = u64::from(limit);

        let range_text = if rendered == 0 {
            format!("0 of {} tasks", total)
        } else {
            let end = (offset + rendered as u64).min(total.max(offset + 1));
            format!("{}-{} of {} tasks", offset + 1, end, total)
        };

        Self {
            current_page: u32::try_from(offset / limit + 1).unwrap_or(u32::MAX),
            total_pages: u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX),
            previous_disabled: offset == 0,
            next_disabled: !pagination.has_more,
            range_text,
        }
    }
}

/// State of one tab
#[derive(Debug, Default)]
pub struct TaskListState {
    pub phase: ListPhase,
    pub rows: TaskRows,
    pub pagination: Pagination,
    /// Committed search term (what the last retrieval asked for)
    pub search_term: String,
    pub selected_row: usize,
}

impl TaskListState {
    pub fn page_info(&self) -> PageInfo {
        PageInfo::compute(&self.pagination, self.rows.len())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.rows.at(self.selected_row)
    }

    pub fn move_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected_row < self.rows.len().saturating_sub(1) {
            self.selected_row += 1;
        }
    }

    fn clamp_row(&mut self) {
        let count = self.rows.len();
        if count == 0 {
            self.selected_row = 0;
        } else if self.selected_row >= count {
            self.selected_row = count - 1;
        }
    }

    fn remove_task(&mut self, task_id: &str) -> bool {
        let Some(row) = self.rows.find(task_id) else {
            return false;
        };
        self.rows.remove(row);
        self.pagination.total_count = self.pagination.total_count.saturating_sub(1);
        if self.rows.is_empty() {
            self.phase = ListPhase::Empty;
        }
        self.clamp_row();
        true
    }
}

/// What the task list area should show
#[derive(Debug)]
pub struct TaskListView<'a> {
    pub show_spinner: bool,
    pub show_list: bool,
    pub show_empty: bool,
    pub empty_message: String,
    pub items: Vec<(RowId, &'a Task)>,
    pub page: Option<PageInfo>,
}

/// Empty-state wording for a tab, mentioning the search term when one is active
pub fn empty_message(tab: TaskType, search_term: &str) -> String {
    let term = search_term.trim();
    if term.is_empty() {
        format!("No {} tasks found.", tab.label())
    } else {
        format!("No {} tasks found matching \"{}\".", tab.label(), term)
    }
}

/// The three task tabs, exactly one of them active
#[derive(Debug)]
pub struct TaskBoard {
    tabs: [TaskListState; 3],
    active: TaskType,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self {
            tabs: Default::default(),
            active: TaskType::Wip,
        }
    }

    pub fn active(&self) -> TaskType {
        self.active
    }

    pub fn tab(&self, tab: TaskType) -> &TaskListState {
        &self.tabs[tab.index()]
    }

    pub fn tab_mut(&mut self, tab: TaskType) -> &mut TaskListState {
        &mut self.tabs[tab.index()]
    }

    pub fn current(&self) -> &TaskListState {
        self.tab(self.active)
    }

    pub fn current_mut(&mut self) -> &mut TaskListState {
        let active = self.active;
        self.tab_mut(active)
    }

    /// Issue a retrieval for a tab and enter `Loading`
    pub fn retrieve(&mut self, tab: TaskType, offset: u32, search_term: Option<&str>) -> OutboundMessage {
        let term = search_term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let state = self.tab_mut(tab);
        state.phase = ListPhase::Loading;
        state.search_term = term.clone().unwrap_or_default();

        OutboundMessage::RetrieveTasks(
            tab,
            RetrieveRequest {
                limit: PAGE_LIMIT,
                offset,
                search_term: term,
            },
        )
    }

    /// Activate a tab and reload it at its own offset and search term
    pub fn select_tab(&mut self, tab: TaskType) -> OutboundMessage {
        self.active = tab;
        self.reload_active()
    }

    pub fn reload_active(&mut self) -> OutboundMessage {
        let tab = self.active;
        let state = self.tab(tab);
        let offset = state.pagination.current_offset;
        let term = state.search_term.clone();
        self.retrieve(tab, offset, Some(&term))
    }

    pub fn next_page(&mut self) -> Option<OutboundMessage> {
        let tab = self.active;
        let state = self.tab(tab);
        if state.phase == ListPhase::Loading || state.page_info().next_disabled {
            return None;
        }
        let offset = state.pagination.current_offset.saturating_add(PAGE_LIMIT);
        let term = state.search_term.clone();
        Some(self.retrieve(tab, offset, Some(&term)))
    }

    pub fn previous_page(&mut self) -> Option<OutboundMessage> {
        let tab = self.active;
        let state = self.tab(tab);
        if state.phase == ListPhase::Loading || state.page_info().previous_disabled {
            return None;
        }
        let offset = state.pagination.current_offset.saturating_sub(PAGE_LIMIT);
        let term = state.search_term.clone();
        Some(self.retrieve(tab, offset, Some(&term)))
    }

    /// Search the active tab from the first page. A blank term clears the search.
    pub fn search(&mut self, term: &str) -> OutboundMessage {
        let tab = self.active;
        self.retrieve(tab, 0, Some(term))
    }

    pub fn clear_search(&mut self) -> OutboundMessage {
        let tab = self.active;
        self.retrieve(tab, 0, None)
    }

    /// Apply a `taskListLoaded` response to the tab it names. The last
    /// response for a tab wins.
    pub fn apply_loaded(&mut self, loaded: TaskListLoaded) {
        let state = self.tab_mut(loaded.task_type);
        let count = loaded.tasks.len();
        state.rows.replace(loaded.tasks);
        let mut pagination = loaded.pagination;
        pagination.search_term = pagination.search_term.trim().to_string();
        if !pagination.search_term.is_empty() {
            state.search_term = pagination.search_term.clone();
        }
        state.pagination = pagination;
        state.phase = if count > 0 {
            ListPhase::Populated
        } else {
            ListPhase::Empty
        };
        state.clamp_row();
        tracing::debug!(
            tab = loaded.task_type.as_str(),
            count,
            total = state.pagination.total_count,
            "task list loaded"
        );
    }

    /// React to a confirmed task action. Returns a retrieval when the active
    /// tab must be reloaded.
    pub fn apply_action_result(&mut self, outcome: &TaskActionOutcome) -> Option<OutboundMessage> {
        if !outcome.result.success {
            return None;
        }
        match outcome.action {
            TaskActionKind::Cleanup => {
                let tab = self.active;
                self.remove_from(tab, outcome.task_id());
                None
            }
            TaskActionKind::Restore => {
                self.remove_from(TaskType::Archived, outcome.task_id());
                None
            }
            TaskActionKind::Delete | TaskActionKind::Update => Some(self.reload_active()),
        }
    }

    /// Handle `taskRestored`
    pub fn apply_restored(&mut self, task_id: &str) -> bool {
        self.remove_from(TaskType::Archived, Some(task_id))
    }

    fn remove_from(&mut self, tab: TaskType, task_id: Option<&str>) -> bool {
        let Some(task_id) = task_id else {
            tracing::warn!(tab = tab.as_str(), "action result without task id, nothing removed");
            return false;
        };
        let removed = self.tab_mut(tab).remove_task(task_id);
        if !removed {
            tracing::warn!(tab = tab.as_str(), task_id, "task not in rendered list, nothing removed");
        }
        removed
    }

    pub fn view(&self) -> TaskListView<'_> {
        let state = self.current();
        let items: Vec<_> = state.rows.iter().collect();
        let (show_spinner, show_list, show_empty) = match state.phase {
            ListPhase::Idle => (false, false, false),
            ListPhase::Loading => (true, false, false),
            ListPhase::Populated => (false, true, false),
            ListPhase::Empty => (false, false, true),
        };
        TaskListView {
            show_spinner,
            show_list,
            show_empty,
            empty_message: empty_message(self.active, &state.search_term),
            page: show_list.then(|| state.page_info()),
            items,
        }
    }
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new()
    }
}
