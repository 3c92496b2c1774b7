/// Input mode for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigating the task list
    #[default]
    Normal,
    /// Typing a search term for the active tab
    Search,
    /// Feedback form is open
    Feedback,
}
