use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::{GlobalConfig, ThemeConfig};
use crate::host::HostTransport;
use crate::hub::dropdown::DropdownOption;
use crate::hub::modal::{EditForm, FormField, ModalState, TaskDetails};
use crate::hub::status::{self, StatusLine, Tone};
use crate::hub::tasks::PageInfo;
use crate::hub::Controller;
use crate::model::{Task, TaskType};
use crate::protocol::Envelope;

use super::input::InputMode;

/// Helper to convert hex color string to ratatui Color
fn hex_to_color(hex: &str) -> Color {
    ThemeConfig::parse_hex(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::White)
}

fn tone_color(tone: Tone, theme: &ThemeConfig) -> Color {
    match tone {
        Tone::Ok => hex_to_color(&theme.color_ok),
        Tone::Info => hex_to_color(&theme.color_text),
        Tone::Warning => hex_to_color(&theme.color_warning),
        Tone::Error => hex_to_color(&theme.color_error),
        Tone::Muted => hex_to_color(&theme.color_dimmed),
    }
}

/// Build footer help text based on current UI state
fn build_footer_text(input_mode: InputMode, modal: &ModalState, tab: TaskType) -> String {
    match modal {
        ModalState::Editing(_) => {
            return " [Tab/↑↓] field  [Space/←→] change option  [Enter] save  [Esc] cancel ".to_string()
        }
        ModalState::Viewing(_) => return " [Esc/Enter] close ".to_string(),
        ModalState::Hidden => {}
    }
    match input_mode {
        InputMode::Search => " Type search term... [Enter] search [Esc] cancel ".to_string(),
        InputMode::Feedback => {
            " [Tab] category  [←→] initiative  [Enter] submit  [Esc] close ".to_string()
        }
        InputMode::Normal => {
            let actions = match tab {
                TaskType::Wip => "[e] edit  [x] delete  [a] archive",
                TaskType::Running => "[e] edit  [a] archive",
                TaskType::Archived => "[r] restore",
            };
            format!(
                " [1-3] tab  [j/k] move  [n/p] page  [/] search  [c] clear  [v] view  {}  [C] connect  [R] refresh  [E] estimation  [f] feedback  [q] quit ",
                actions
            )
        }
    }
}

/// Pagination footer, e.g. "21-40 of 45 tasks · Page 2 of 3"
fn build_page_line(page: &PageInfo) -> String {
    let prev = if page.previous_disabled { "     " } else { "‹ [p]" };
    let next = if page.next_disabled { "     " } else { "[n] ›" };
    format!(
        "{}  {} · Page {} of {}  {}",
        prev,
        page.range_text,
        page.current_page,
        page.total_pages.max(1),
        next
    )
}

/// One-line summary of a task row
fn task_row_text(task: &Task) -> String {
    let mut text = task.display_name().to_string();
    if let Some(status) = task.status.as_deref() {
        text.push_str(&format!("  [{}]", status));
    }
    if let Some(priority) = task.priority.as_deref() {
        text.push_str(&format!("  {}", priority));
    }
    match (task.estimated_hours, task.actual_hours) {
        (Some(est), Some(act)) => text.push_str(&format!("  {:.1}h/{:.1}h", act, est)),
        (Some(est), None) => text.push_str(&format!("  est {:.1}h", est)),
        _ => {}
    }
    text
}

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// State for confirming a delete
#[derive(Debug, Clone)]
struct DeleteConfirmPopup {
    task: Task,
}

/// Application state (separate from terminal for borrow checker)
struct AppState {
    should_quit: bool,
    controller: Controller,
    theme: ThemeConfig,
    input_mode: InputMode,
    input_buffer: String,
    delete_confirm_popup: Option<DeleteConfirmPopup>,
    inbound: mpsc::UnboundedReceiver<Envelope>,
}

pub struct App {
    terminal: Terminal,
    state: AppState,
}

impl App {
    pub fn new(
        config: &GlobalConfig,
        host: Arc<dyn HostTransport>,
        inbound: mpsc::UnboundedReceiver<Envelope>,
    ) -> Result<Self> {
        let state = AppState::new(config, host, inbound)?;

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, state })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state.controller.startup();

        while !self.state.should_quit {
            self.draw()?;

            // Apply everything the host sent since the last frame
            self.state.drain_inbound();

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.state.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let state = &self.state;
        self.terminal.draw(|frame| {
            let area = frame.area();
            draw_hub(state, frame, area);
        })?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}

impl AppState {
    fn new(
        config: &GlobalConfig,
        host: Arc<dyn HostTransport>,
        inbound: mpsc::UnboundedReceiver<Envelope>,
    ) -> Result<Self> {
        Ok(Self {
            should_quit: false,
            controller: Controller::new(host)?,
            theme: config.theme.clone(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            delete_confirm_popup: None,
            inbound,
        })
    }

    fn drain_inbound(&mut self) {
        loop {
            match self.inbound.try_recv() {
                Ok(envelope) => self.controller.receive(envelope),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Blocking alert swallows everything until dismissed
        if self.controller.state().alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.controller.act(|s| s.dismiss_alert());
            }
            return;
        }

        if self.delete_confirm_popup.is_some() {
            return self.handle_delete_confirm_key(key);
        }

        if matches!(self.controller.state().modal, ModalState::Editing(_)) {
            return self.handle_edit_key(key);
        }
        if matches!(self.controller.state().modal, ModalState::Viewing(_)) {
            return self.handle_view_key(key);
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key.code),
            InputMode::Search => self.handle_search_key(key.code),
            InputMode::Feedback => self.handle_feedback_key(key.code),
        }
    }

    fn handle_delete_confirm_key(&mut self, key: KeyEvent) {
        if let Some(popup) = self.delete_confirm_popup.clone() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.delete_confirm_popup = None;
                    self.controller.act(|s| s.request_delete(&popup.task));
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.delete_confirm_popup = None;
                }
                _ => {}
            }
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.controller.act(|s| s.close_modal()),
            KeyCode::Enter => self.controller.act(|s| s.save_edit()),
            KeyCode::Tab | KeyCode::Down => self.with_form(|form, _| form.focus_next()),
            KeyCode::BackTab | KeyCode::Up => self.with_form(|form, _| form.focus_prev()),
            KeyCode::Left | KeyCode::Right => self.with_form(|form, epics| form.cycle(epics)),
            KeyCode::Backspace => self.with_form(|form, _| form.backspace()),
            KeyCode::Char(c) => self.with_form(|form, epics| {
                if form.focus.is_choice() {
                    if c == ' ' {
                        form.cycle(epics);
                    }
                } else {
                    form.input_char(c);
                }
            }),
            _ => {}
        }
    }

    /// Edit the open form with the loaded epics at hand
    fn with_form(&mut self, f: impl FnOnce(&mut EditForm, &[crate::model::Epic])) {
        self.controller.act(|s| {
            let epics = s.dropdowns.epic_list().to_vec();
            if let Some(form) = s.modal.edit_form_mut() {
                f(form, &epics);
            }
        });
    }

    fn handle_view_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.controller.act(|s| s.close_modal());
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.controller.act(|s| s.select_tab(TaskType::Wip)),
            KeyCode::Char('2') => self.controller.act(|s| s.select_tab(TaskType::Running)),
            KeyCode::Char('3') => self.controller.act(|s| s.select_tab(TaskType::Archived)),
            KeyCode::Tab => {
                let next = match self.controller.state().board.active() {
                    TaskType::Wip => TaskType::Running,
                    TaskType::Running => TaskType::Archived,
                    TaskType::Archived => TaskType::Wip,
                };
                self.controller.act(|s| s.select_tab(next));
            }
            KeyCode::Char('j') | KeyCode::Down => self.controller.act(|s| s.board.current_mut().move_down()),
            KeyCode::Char('k') | KeyCode::Up => self.controller.act(|s| s.board.current_mut().move_up()),
            KeyCode::Char('n') | KeyCode::Right => self.controller.act(|s| s.next_page()),
            KeyCode::Char('p') | KeyCode::Left => self.controller.act(|s| s.previous_page()),
            KeyCode::Char('/') => {
                self.input_buffer = self.controller.state().board.current().search_term.clone();
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('c') => {
                if !self.controller.state().board.current().search_term.is_empty() {
                    self.controller.act(|s| s.clear_search());
                }
            }
            KeyCode::Char('v') | KeyCode::Enter => {
                self.controller.act(|s| s.view_selected());
            }
            KeyCode::Char('e') => {
                self.controller.act(|s| s.request_edit());
            }
            KeyCode::Char('x') => {
                let board = &self.controller.state().board;
                if board.active().can_delete() {
                    if let Some(task) = board.current().selected_task() {
                        self.delete_confirm_popup = Some(DeleteConfirmPopup { task: task.clone() });
                    }
                }
            }
            KeyCode::Char('a') => {
                self.controller.act(|s| s.request_cleanup());
            }
            KeyCode::Char('r') => {
                self.controller.act(|s| s.request_restore());
            }
            KeyCode::Char('C') => self.controller.act(|s| s.connect_aws()),
            KeyCode::Char('R') => self.controller.act(|s| s.refresh_aws()),
            KeyCode::Char('E') => self.controller.act(|s| s.refresh_estimation()),
            KeyCode::Char('f') => self.input_mode = InputMode::Feedback,
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input_buffer.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let term = std::mem::take(&mut self.input_buffer);
                self.input_mode = InputMode::Normal;
                self.controller.act(|s| s.search(&term));
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn handle_feedback_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => self.controller.act(|s| s.submit_feedback()),
            KeyCode::Tab => self.controller.act(|s| s.feedback.category = s.feedback.category.next()),
            KeyCode::Left | KeyCode::Right => self.controller.act(|s| s.dropdowns.cycle_initiative()),
            KeyCode::Backspace => self.controller.act(|s| {
                s.feedback.message.pop();
            }),
            KeyCode::Char(c) => self.controller.act(|s| s.feedback.message.push(c)),
            _ => {}
        }
    }
}

fn styled_lines(lines: &[StatusLine], theme: &ThemeConfig) -> Vec<Line<'static>> {
    lines
        .iter()
        .map(|l| Line::from(Span::styled(l.text.clone(), Style::default().fg(tone_color(l.tone, theme)))))
        .collect()
}

fn option_lines(options: &[DropdownOption], selected: Option<&str>, theme: &ThemeConfig) -> Vec<Line<'static>> {
    options
        .iter()
        .map(|o| {
            let is_selected = selected == Some(o.value.as_str()) && !o.disabled;
            let marker = if is_selected { "› " } else { "  " };
            let style = if o.disabled {
                Style::default().fg(hex_to_color(&theme.color_dimmed))
            } else if is_selected {
                Style::default().fg(hex_to_color(&theme.color_selected)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(hex_to_color(&theme.color_text))
            };
            Line::from(Span::styled(format!("{}{}", marker, o.label), style))
        })
        .collect()
}

fn draw_hub(state: &AppState, frame: &mut Frame, area: Rect) {
    let hub = state.controller.state();
    let theme = &state.theme;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(area);

    // Header: connection status
    let now = Utc::now();
    let header_lines = styled_lines(
        &[status::aws_status_line(&hub.aws, now), status::jira_status_line(hub.jira.as_ref())],
        theme,
    );
    let header = Paragraph::new(header_lines).block(
        Block::default()
            .title(" Spec Driven Development ")
            .title_style(Style::default().fg(hex_to_color(&theme.color_normal)).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL),
    );
    frame.render_widget(header, chunks[0]);

    // Tabs
    let titles: Vec<Line> = TaskType::tabs()
        .iter()
        .map(|t| Line::from(format!(" {} ", t.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(hub.board.active().index())
        .style(Style::default().fg(hex_to_color(&theme.color_dimmed)))
        .highlight_style(Style::default().fg(hex_to_color(&theme.color_selected)).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(tabs, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(chunks[2]);

    draw_task_list(state, frame, body[0]);
    draw_side_panel(state, frame, body[1]);

    let footer = Paragraph::new(build_footer_text(state.input_mode, &hub.modal, hub.board.active()))
        .style(Style::default().fg(hex_to_color(&theme.color_dimmed)))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[3]);

    match &hub.modal {
        ModalState::Editing(form) => draw_edit_popup(state, form, frame, area),
        ModalState::Viewing(details) => draw_view_popup(details, theme, frame, area),
        ModalState::Hidden => {}
    }

    if state.input_mode == InputMode::Search && hub.modal.is_hidden() {
        let popup_area = centered_rect(50, 15, area);
        frame.render_widget(Clear, popup_area);
        let input = Paragraph::new(format!("Search: {}█", state.input_buffer))
            .style(Style::default().fg(hex_to_color(&theme.color_text)))
            .block(
                Block::default()
                    .title(format!(" Search {} ", hub.board.active().title()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(hex_to_color(&theme.color_popup_border))),
            );
        frame.render_widget(input, popup_area);
    }

    if state.input_mode == InputMode::Feedback && hub.modal.is_hidden() {
        draw_feedback_popup(state, frame, area);
    }

    if let Some(ref popup) = state.delete_confirm_popup {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let main_block = Block::default()
            .title(" Delete Task? ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(hex_to_color(&theme.color_error)));
        frame.render_widget(main_block, popup_area);

        let inner = popup_area.inner(Margin { horizontal: 2, vertical: 2 });
        let text = format!(
            "Are you sure you want to delete:\n\n\"{}\"\n\n[y] Yes, delete    [n/Esc] Cancel",
            popup.task.display_name()
        );
        let content = Paragraph::new(text)
            .style(Style::default().fg(hex_to_color(&theme.color_text)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });
        frame.render_widget(content, inner);
    }

    if let Some(ref alert) = hub.alert {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);
        let content = Paragraph::new(format!("{}\n\n[Enter] OK", alert))
            .style(Style::default().fg(hex_to_color(&theme.color_text)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Cannot Save ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(hex_to_color(&theme.color_warning))),
            );
        frame.render_widget(content, popup_area);
    }
}

fn draw_task_list(state: &AppState, frame: &mut Frame, area: Rect) {
    let hub = state.controller.state();
    let theme = &state.theme;
    let view = hub.board.view();
    let current = hub.board.current();

    let mut title = format!(" {} tasks ", hub.board.active().title());
    if !current.search_term.is_empty() {
        title.push_str(&format!("· \"{}\" ", current.search_term));
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(hex_to_color(&theme.color_normal)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Rows
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Result banner
        ])
        .split(inner);

    if view.show_spinner {
        let loading = Paragraph::new("Loading tasks...")
            .style(Style::default().fg(hex_to_color(&theme.color_dimmed)))
            .alignment(Alignment::Center);
        frame.render_widget(loading, parts[0]);
    } else if view.show_empty {
        let empty = Paragraph::new(view.empty_message.clone())
            .style(Style::default().fg(hex_to_color(&theme.color_dimmed)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, parts[0]);
    } else if view.show_list {
        let visible = parts[0].height as usize;
        let selected = current.selected_row;
        let scroll_offset = if selected >= visible { selected + 1 - visible } else { 0 };

        let lines: Vec<Line> = view
            .items
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible)
            .map(|(i, (_, task))| {
                let is_selected = i == selected;
                let marker = if task.is_ai_adopted() { "● " } else { "○ " };
                let style = if is_selected {
                    Style::default()
                        .fg(hex_to_color(&theme.color_selected))
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(hex_to_color(&theme.color_text))
                };
                Line::from(Span::styled(format!("{}{}", marker, task_row_text(task)), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), parts[0]);
    }

    if let Some(page) = view.page.as_ref() {
        let page_line = Paragraph::new(build_page_line(page))
            .style(Style::default().fg(hex_to_color(&theme.color_dimmed)))
            .alignment(Alignment::Center);
        frame.render_widget(page_line, parts[1]);
    }

    if let Some(banner) = hub.banner.as_ref() {
        let color = if banner.success {
            hex_to_color(&theme.color_ok)
        } else {
            hex_to_color(&theme.color_error)
        };
        let mut text = banner.message.clone();
        if let Some(err) = banner.error.as_deref() {
            text.push_str(&format!(" ({})", err));
        }
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(color)), parts[2]);
    }
}

fn draw_side_panel(state: &AppState, frame: &mut Frame, area: Rect) {
    let hub = state.controller.state();
    let theme = &state.theme;

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30), // Credentials
            Constraint::Percentage(25), // Estimation
            Constraint::Percentage(45), // Dropdowns
        ])
        .split(area);

    let border = Style::default().fg(hex_to_color(&theme.color_normal));

    let credentials = Paragraph::new(styled_lines(
        &status::secret_validation(&hub.aws, hub.enhanced.as_ref()),
        theme,
    ))
    .wrap(Wrap { trim: true })
    .block(Block::default().title(" Credentials ").borders(Borders::ALL).border_style(border));
    frame.render_widget(credentials, sections[0]);

    let estimation = Paragraph::new(styled_lines(&status::estimation_lines(hub.estimation.as_ref()), theme))
        .block(Block::default().title(" Estimation ").borders(Borders::ALL).border_style(border));
    frame.render_widget(estimation, sections[1]);

    let selected_initiative = hub.dropdowns.selected_initiative().map(|i| i.id.as_str());
    let mut lines = vec![Line::from(Span::styled(
        "Initiatives",
        Style::default().fg(hex_to_color(&theme.color_normal)).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(option_lines(&hub.dropdowns.initiative_options(), selected_initiative, theme));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Epics",
        Style::default().fg(hex_to_color(&theme.color_normal)).add_modifier(Modifier::BOLD),
    )));
    lines.extend(option_lines(&hub.dropdowns.epic_options(), None, theme));

    let dropdowns = Paragraph::new(lines)
        .block(Block::default().title(" Context ").borders(Borders::ALL).border_style(border));
    frame.render_widget(dropdowns, sections[2]);
}

fn form_value(form: &EditForm, field: FormField, state: &AppState) -> String {
    match field {
        FormField::Description => form.description.clone(),
        FormField::Status => form.status.clone(),
        FormField::Type => form.task_type.clone(),
        FormField::JiraLink => form.jira_link.clone(),
        FormField::Priority => form.priority.clone(),
        FormField::AcceptanceCriteria => form.acceptance_criteria.clone(),
        FormField::EstimatedEffort => form.estimated_effort.clone(),
        FormField::EstimationUnit => form.estimation_unit.as_str().to_string(),
        FormField::Epic => {
            if form.epic.is_empty() {
                String::new()
            } else {
                state.controller.state().dropdowns.epic_label(&form.epic)
            }
        }
        FormField::AiAdopted => if form.ai_adopted { "yes" } else { "no" }.to_string(),
        FormField::DeploymentDate => form.deployment_date.clone(),
        FormField::ActualHours => form.actual_hours.clone(),
        FormField::Resolution => form.resolution.clone(),
    }
}

fn draw_edit_popup(state: &AppState, form: &EditForm, frame: &mut Frame, area: Rect) {
    let theme = &state.theme;
    let popup_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = Vec::new();
    for field in form.visible_fields() {
        let focused = field == form.focus;
        let required = if field.is_conditional() { " *" } else { "" };
        let mut value = form_value(form, field, state);
        if focused && !field.is_choice() {
            value.push('█');
        }
        let label_style = if focused {
            Style::default().fg(hex_to_color(&theme.color_selected)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(hex_to_color(&theme.color_dimmed))
        };
        let value_style = Style::default().fg(hex_to_color(&theme.color_text));
        let value = if field.is_choice() { format!("‹ {} ›", value) } else { value };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<22}", format!("{}{}:", field.label(), required)), label_style),
            Span::styled(value, value_style),
        ]));
    }
    if form.requires_resolution() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "* required when status is Done",
            Style::default().fg(hex_to_color(&theme.color_warning)),
        )));
    }

    let content = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" Edit: {} ", form.name()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(hex_to_color(&theme.color_popup_border))),
    );
    frame.render_widget(content, popup_area);
}

fn detail_lines(task: &Task) -> Vec<(&'static str, String)> {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let hours = |v: Option<f64>| v.map(|h| format!("{:.1}h", h)).unwrap_or_else(|| "-".to_string());
    vec![
        ("Status", text(&task.status)),
        ("Type", text(&task.task_type)),
        ("Priority", text(&task.priority)),
        ("Jira", text(&task.jira_link)),
        ("Epic", text(&task.epic)),
        ("Estimated", hours(task.estimated_hours)),
        ("Actual", hours(task.actual_hours)),
        ("AI Adopted", if task.is_ai_adopted() { "yes" } else { "no" }.to_string()),
        ("Deployment", text(&task.deployment_date)),
        ("Resolution", text(&task.resolution)),
        ("Description", text(&task.description)),
        ("Acceptance", text(&task.acceptance_criteria)),
    ]
}

fn draw_view_popup(details: &TaskDetails, theme: &ThemeConfig, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 75, area);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = detail_lines(&details.task)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<13}", label), Style::default().fg(hex_to_color(&theme.color_dimmed))),
                Span::styled(value, Style::default().fg(hex_to_color(&theme.color_text))),
            ])
        })
        .collect();

    let content = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" {} · {} ", details.task.display_name(), details.task_id))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(hex_to_color(&theme.color_popup_border))),
    );
    frame.render_widget(content, popup_area);
}

fn draw_feedback_popup(state: &AppState, frame: &mut Frame, area: Rect) {
    let hub = state.controller.state();
    let theme = &state.theme;
    let form = &hub.feedback;

    let popup_area = centered_rect(60, 45, area);
    frame.render_widget(Clear, popup_area);

    let initiative = hub
        .dropdowns
        .selected_initiative()
        .map(|i| i.name.clone())
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        Line::from(format!("Category:   ‹ {} ›", form.category.as_str())),
        Line::from(format!("Initiative: ‹ {} ›", initiative)),
        Line::from(""),
        Line::from(format!("{}█", form.message)),
        Line::from(""),
    ];
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(hex_to_color(&theme.color_dimmed)),
        )));
    } else if let Some(banner) = form.banner.as_ref() {
        let color = if banner.success {
            hex_to_color(&theme.color_ok)
        } else {
            hex_to_color(&theme.color_error)
        };
        lines.push(Line::from(Span::styled(banner.message.clone(), Style::default().fg(color))));
        if let Some(err) = banner.error.as_deref() {
            lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(color))));
        }
    }

    let content = Paragraph::new(lines)
        .style(Style::default().fg(hex_to_color(&theme.color_text)))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Feedback ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(hex_to_color(&theme.color_popup_border))),
        );
    frame.render_widget(content, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
