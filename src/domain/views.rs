use super::enums::StatusFilter;
use super::filter::{CategoryFilter, Filters};
use super::task::Task;

/// Message shown when no task passes the filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// A category filter is active
    Category(String),
    /// Status filter is "completed"
    NoneCompleted,
    /// Status filter is "active"
    AllCompleted,
    /// Nothing filtered, list is empty
    GetStarted,
}

impl EmptyState {
    /// Pick the message by priority: category > completed > active > default
    pub fn for_filters(filters: &Filters) -> Self {
        match (&filters.category, filters.status) {
            (CategoryFilter::Only(category), _) => Self::Category(category.clone()),
            (CategoryFilter::All, StatusFilter::Completed) => Self::NoneCompleted,
            (CategoryFilter::All, StatusFilter::Active) => Self::AllCompleted,
            (CategoryFilter::All, StatusFilter::All) => Self::GetStarted,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Category(category) => format!("No tasks in the \"{}\" category.", category),
            Self::NoneCompleted => "No completed tasks yet.".to_string(),
            Self::AllCompleted => "All tasks completed! ✨".to_string(),
            Self::GetStarted => "Add a task to get started!".to_string(),
        }
    }
}

/// Everything the list display needs, derived from (tasks, filters) only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a> {
    /// Visible tasks in source order
    pub rows: Vec<&'a Task>,
    /// Set iff `rows` is empty
    pub empty: Option<EmptyState>,
    /// Incomplete tasks across the whole list
    pub remaining: usize,
    /// Whether the clear-completed control is shown
    pub show_clear_completed: bool,
}

impl ListView<'_> {
    pub fn remaining_text(&self) -> String {
        remaining_count_text(self.remaining)
    }
}

/// Build the view model for the current list and filters
pub fn render_view<'a>(tasks: &'a [Task], filters: &Filters) -> ListView<'a> {
    let rows = visible_tasks(tasks, filters);
    let empty = if rows.is_empty() {
        Some(EmptyState::for_filters(filters))
    } else {
        None
    };

    ListView {
        rows,
        empty,
        remaining: tasks.iter().filter(|t| !t.completed).count(),
        show_clear_completed: has_completed(tasks),
    }
}

/// Tasks passing both filter dimensions, keeping list order
pub fn visible_tasks<'a>(tasks: &'a [Task], filters: &Filters) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filters.matches(t)).collect()
}

pub fn has_completed(tasks: &[Task]) -> bool {
    tasks.iter().any(|t| t.completed)
}

/// "1 task left" / "N tasks left"
pub fn remaining_count_text(remaining: usize) -> String {
    let noun = if remaining == 1 { "task" } else { "tasks" };
    format!("{} {} left", remaining, noun)
}

/// Checkbox glyph for a row
pub fn checkbox_glyph(completed: bool, use_emoji: bool) -> &'static str {
    match (completed, use_emoji) {
        (true, true) => "☑",
        (false, true) => "☐",
        (true, false) => "[x]",
        (false, false) => "[ ]",
    }
}
