use crate::domain::{
    cycle_category, derive_category_options, reconcile_category, render_view, CategoryFilter, Filters,
    ListView, NewTask, Snapshot, StatusFilter, SyncStatus, Task, TaskId, TaskPatch, UiMode,
};
use std::collections::HashSet;
use tracing::debug;

/// Field of the add form receiving keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Text,
    Category,
}

/// Input form state for adding tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFormState {
    pub text: String,
    pub category: String,
    pub editing_field: FormField,
}

impl InputFormState {
    fn current_field_mut(&mut self) -> &mut String {
        match self.editing_field {
            FormField::Text => &mut self.text,
            FormField::Category => &mut self.category,
        }
    }
}

/// Mutation request handed to the sync layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Create(NewTask),
    Update { id: TaskId, patch: TaskPatch },
    Delete(TaskId),
    /// Delete every listed task concurrently and wait for all of them
    DeleteAll(Vec<TaskId>),
}

/// Store operation named in failure reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// Everything that can change the view state
#[derive(Debug)]
pub enum Msg {
    /// The subscription delivered a full collection snapshot
    SnapshotReceived(Snapshot),
    /// The subscription is gone and will not come back
    SubscriptionLost { reason: String },
    /// A store mutation failed (already logged by the sync layer)
    MutationFailed { kind: MutationKind, id: Option<TaskId> },

    SetStatusFilter(StatusFilter),
    SetCategoryFilter(CategoryFilter),
    CycleCategory { forward: bool },

    SelectNext,
    SelectPrev,

    OpenForm,
    CancelForm,
    FormInput(char),
    FormBackspace,
    FormNextField,
    Submit,

    ToggleTask(TaskId),
    DeleteTask(TaskId),
    ClearCompleted,
}

/// Main application state.
///
/// The task list is only ever replaced by snapshots; user actions that
/// change data come back out of `dispatch` as effects for the sync layer.
pub struct AppState {
    /// Replica of the latest snapshot, newest first
    pub tasks: Vec<Task>,
    pub filters: Filters,
    /// Categories offered by the selector, sorted (the "all" option is implicit)
    pub category_options: Vec<String>,
    /// Index into the visible rows
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    /// Rows with a pending delete or a toggle that moves them out of view
    pub removing: HashSet<TaskId>,
    pub sync_status: SyncStatus,
    pub use_emoji: bool,
}

impl AppState {
    pub fn new(use_emoji: bool) -> Self {
        Self {
            tasks: Vec::new(),
            filters: Filters::default(),
            category_options: Vec::new(),
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            removing: HashSet::new(),
            sync_status: SyncStatus::Connecting,
            use_emoji,
        }
    }

    /// View model for the current list and filters
    pub fn view(&self) -> ListView<'_> {
        render_view(&self.tasks, &self.filters)
    }

    /// The task under the cursor, if any row is visible
    pub fn selected_task(&self) -> Option<&Task> {
        self.view().rows.get(self.selected_index).copied()
    }

    pub fn is_removing(&self, id: &TaskId) -> bool {
        self.removing.contains(id)
    }

    /// Apply one message; returns the store mutations it requests
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::SnapshotReceived(snapshot) => {
                self.apply_snapshot(snapshot);
                Vec::new()
            }
            Msg::SubscriptionLost { reason } => {
                debug!(%reason, "marking list as stale");
                self.sync_status = SyncStatus::Offline;
                Vec::new()
            }
            Msg::MutationFailed { kind, id } => {
                debug!(?kind, ?id, "clearing removing hint after failed mutation");
                if let Some(id) = id {
                    self.removing.remove(&id);
                }
                Vec::new()
            }

            Msg::SetStatusFilter(status) => {
                self.filters.status = status;
                self.clamp_selection();
                Vec::new()
            }
            Msg::SetCategoryFilter(category) => {
                // Only observed categories are selectable
                self.filters.category = reconcile_category(&category, &self.category_options);
                self.clamp_selection();
                Vec::new()
            }
            Msg::CycleCategory { forward } => {
                self.filters.category = cycle_category(&self.filters.category, &self.category_options, forward);
                self.clamp_selection();
                Vec::new()
            }

            Msg::SelectNext => {
                let count = self.view().rows.len();
                if self.selected_index + 1 < count {
                    self.selected_index += 1;
                }
                Vec::new()
            }
            Msg::SelectPrev => {
                self.selected_index = self.selected_index.saturating_sub(1);
                Vec::new()
            }

            Msg::OpenForm => {
                self.input_form = Some(InputFormState::default());
                self.ui_mode = UiMode::AddingTask;
                Vec::new()
            }
            Msg::CancelForm => {
                self.input_form = None;
                self.ui_mode = UiMode::Normal;
                Vec::new()
            }
            Msg::FormInput(c) => {
                if let Some(form) = &mut self.input_form {
                    form.current_field_mut().push(c);
                }
                Vec::new()
            }
            Msg::FormBackspace => {
                if let Some(form) = &mut self.input_form {
                    form.current_field_mut().pop();
                }
                Vec::new()
            }
            Msg::FormNextField => {
                if let Some(form) = &mut self.input_form {
                    form.editing_field = match form.editing_field {
                        FormField::Text => FormField::Category,
                        FormField::Category => FormField::Text,
                    };
                }
                Vec::new()
            }
            Msg::Submit => self.submit(),

            Msg::ToggleTask(id) => self.toggle(id),
            Msg::DeleteTask(id) => self.delete(id),
            Msg::ClearCompleted => self.clear_completed(),
        }
    }

    /// Replace the whole list with the snapshot and rederive the category options
    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.tasks = snapshot.into_tasks();
        // The authoritative state has arrived; pending animation hints are moot
        self.removing.clear();
        self.category_options = derive_category_options(&self.tasks);
        self.filters.category = reconcile_category(&self.filters.category, &self.category_options);
        self.sync_status = SyncStatus::Live;
        self.clamp_selection();

        debug!(
            tasks = self.tasks.len(),
            categories = self.category_options.len(),
            "applied snapshot"
        );
    }

    fn clamp_selection(&mut self) {
        let count = self.view().rows.len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    /// Blank text is a silent no-op. Otherwise the form closes (clearing both
    /// fields) whether or not the create later succeeds.
    fn submit(&mut self) -> Vec<Effect> {
        let Some(form) = &self.input_form else {
            return Vec::new();
        };
        let Some(record) = NewTask::from_input(&form.text, &form.category) else {
            return Vec::new();
        };

        self.input_form = None;
        self.ui_mode = UiMode::Normal;
        vec![Effect::Create(record)]
    }

    fn toggle(&mut self, id: TaskId) -> Vec<Effect> {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            debug!(%id, "toggle for unknown task ignored");
            return Vec::new();
        };

        let completed = !task.completed;
        if !self.filters.status.admits(completed) {
            self.removing.insert(id.clone());
        }
        vec![Effect::Update {
            id,
            patch: TaskPatch::completed(completed),
        }]
    }

    fn delete(&mut self, id: TaskId) -> Vec<Effect> {
        if !self.tasks.iter().any(|t| t.id == id) {
            debug!(%id, "delete for unknown task ignored");
            return Vec::new();
        }
        self.removing.insert(id.clone());
        vec![Effect::Delete(id)]
    }

    fn clear_completed(&mut self) -> Vec<Effect> {
        let ids: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id.clone())
            .collect();

        if ids.is_empty() {
            return Vec::new();
        }
        vec![Effect::DeleteAll(ids)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::views::EmptyState;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn task(id: &str, text: &str, category: &str, completed: bool, minutes: i64) -> Task {
        Task {
            id: TaskId::new(id),
            text: text.to_string(),
            category: category.to_string(),
            completed,
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap() + Duration::minutes(minutes),
        }
    }

    fn app_with(tasks: Vec<Task>) -> AppState {
        let mut app = AppState::new(true);
        app.dispatch(Msg::SnapshotReceived(Snapshot::ordered(tasks)));
        app
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.dispatch(Msg::FormInput(c));
        }
    }

    #[test]
    fn test_new_state() {
        let app = AppState::new(false);
        assert!(app.tasks.is_empty());
        assert_eq!(app.filters, Filters::default());
        assert_eq!(app.sync_status, SyncStatus::Connecting);
        assert_eq!(app.view().empty, Some(EmptyState::GetStarted));
    }

    #[test]
    fn test_snapshot_replaces_list() {
        let mut app = app_with(vec![task("a", "A", "Work", false, 0)]);
        assert_eq!(app.sync_status, SyncStatus::Live);

        app.dispatch(Msg::SnapshotReceived(Snapshot::ordered(vec![
            task("b", "B", "Home", false, 1),
            task("c", "C", "Work", true, 2),
        ])));

        let ids: Vec<&str> = app.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert_eq!(app.category_options, vec!["Home".to_string(), "Work".to_string()]);
    }

    #[test]
    fn test_submit_creates_with_defaults_and_clears_form() {
        let mut app = AppState::new(true);
        app.dispatch(Msg::OpenForm);
        type_text(&mut app, "  Buy milk ");

        let effects = app.dispatch(Msg::Submit);
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Create(record) => {
                assert_eq!(record.text, "Buy milk");
                assert_eq!(record.category, "General");
                assert!(!record.completed);
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert!(app.input_form.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
        // The list waits for the snapshot
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn test_submit_with_category() {
        let mut app = AppState::new(true);
        app.dispatch(Msg::OpenForm);
        type_text(&mut app, "Deploy");
        app.dispatch(Msg::FormNextField);
        type_text(&mut app, " Work ");

        let effects = app.dispatch(Msg::Submit);
        assert!(matches!(&effects[..], [Effect::Create(r)] if r.category == "Work"));
    }

    #[test]
    fn test_submit_blank_text_is_noop() {
        let mut app = AppState::new(true);
        app.dispatch(Msg::OpenForm);
        type_text(&mut app, "   ");
        app.dispatch(Msg::FormNextField);
        type_text(&mut app, "Work");

        assert!(app.dispatch(Msg::Submit).is_empty());
        // Form left untouched
        let form = app.input_form.as_ref().unwrap();
        assert_eq!(form.text, "   ");
        assert_eq!(form.category, "Work");
        assert_eq!(app.ui_mode, UiMode::AddingTask);
    }

    #[test]
    fn test_submit_without_form_is_noop() {
        let mut app = AppState::new(true);
        assert!(app.dispatch(Msg::Submit).is_empty());
    }

    #[test]
    fn test_form_editing() {
        let mut app = AppState::new(true);
        app.dispatch(Msg::OpenForm);
        type_text(&mut app, "abc");
        app.dispatch(Msg::FormBackspace);
        app.dispatch(Msg::FormNextField);
        type_text(&mut app, "x");
        app.dispatch(Msg::FormNextField);
        type_text(&mut app, "d");

        let form = app.input_form.clone().unwrap();
        assert_eq!(form.text, "abd");
        assert_eq!(form.category, "x");

        app.dispatch(Msg::CancelForm);
        assert!(app.input_form.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_toggle_requests_update_only() {
        let mut app = app_with(vec![task("m", "Buy milk", "Shopping", false, 0)]);
        let effects = app.dispatch(Msg::ToggleTask(TaskId::new("m")));

        assert_eq!(
            effects,
            vec![Effect::Update {
                id: TaskId::new("m"),
                patch: TaskPatch::completed(true),
            }]
        );
        assert!(!app.tasks[0].completed);
        // Still visible under "all"
        assert!(!app.is_removing(&TaskId::new("m")));
    }

    #[test]
    fn test_toggle_marks_removing_when_filtered_out() {
        let mut app = app_with(vec![task("m", "Buy milk", "Shopping", false, 0)]);
        app.dispatch(Msg::SetStatusFilter(StatusFilter::Active));
        app.dispatch(Msg::ToggleTask(TaskId::new("m")));
        assert!(app.is_removing(&TaskId::new("m")));

        let mut app = app_with(vec![task("m", "Buy milk", "Shopping", true, 0)]);
        app.dispatch(Msg::SetStatusFilter(StatusFilter::Completed));
        app.dispatch(Msg::ToggleTask(TaskId::new("m")));
        assert!(app.is_removing(&TaskId::new("m")));
    }

    #[test]
    fn test_toggle_unknown_task_ignored() {
        let mut app = app_with(vec![task("m", "Buy milk", "Shopping", false, 0)]);
        assert!(app.dispatch(Msg::ToggleTask(TaskId::new("nope"))).is_empty());
        assert!(app.dispatch(Msg::DeleteTask(TaskId::new("nope"))).is_empty());
    }

    #[test]
    fn test_toggle_then_snapshot_under_active_filter() {
        let mut app = app_with(vec![task("m", "Buy milk", "Shopping", false, 0)]);
        {
            let view = app.view();
            assert_eq!(view.rows.len(), 1);
            assert_eq!(view.remaining_text(), "1 task left");
            assert!(!view.show_clear_completed);
        }

        app.dispatch(Msg::SetStatusFilter(StatusFilter::Active));
        app.dispatch(Msg::ToggleTask(TaskId::new("m")));
        app.dispatch(Msg::SnapshotReceived(Snapshot::ordered(vec![task(
            "m", "Buy milk", "Shopping", true, 0,
        )])));

        let view = app.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.empty, Some(EmptyState::AllCompleted));
        assert_eq!(view.empty.as_ref().unwrap().message(), "All tasks completed! ✨");
        assert!(view.show_clear_completed);
        assert!(app.removing.is_empty());
    }

    #[test]
    fn test_delete_marks_removing_until_snapshot() {
        let mut app = app_with(vec![task("a", "A", "", false, 0)]);
        let effects = app.dispatch(Msg::DeleteTask(TaskId::new("a")));
        assert_eq!(effects, vec![Effect::Delete(TaskId::new("a"))]);
        assert!(app.is_removing(&TaskId::new("a")));
        assert_eq!(app.tasks.len(), 1);

        app.dispatch(Msg::SnapshotReceived(Snapshot::ordered(Vec::new())));
        assert!(app.tasks.is_empty());
        assert!(app.removing.is_empty());
    }

    #[test]
    fn test_failed_mutation_clears_removing_hint() {
        let mut app = app_with(vec![task("a", "A", "", false, 0)]);
        app.dispatch(Msg::DeleteTask(TaskId::new("a")));
        app.dispatch(Msg::MutationFailed {
            kind: MutationKind::Delete,
            id: Some(TaskId::new("a")),
        });
        assert!(!app.is_removing(&TaskId::new("a")));
        assert_eq!(app.tasks.len(), 1);
    }

    #[test]
    fn test_clear_completed() {
        let mut app = app_with(vec![
            task("a", "A", "", true, 0),
            task("b", "B", "", false, 1),
            task("c", "C", "", true, 2),
        ]);
        let effects = app.dispatch(Msg::ClearCompleted);
        assert_eq!(effects, vec![Effect::DeleteAll(vec![TaskId::new("c"), TaskId::new("a")])]);

        let mut app = app_with(vec![task("b", "B", "", false, 1)]);
        assert!(app.dispatch(Msg::ClearCompleted).is_empty());
    }

    #[test]
    fn test_vanished_category_resets_filter() {
        let mut app = app_with(vec![task("w", "Deploy", "Work", false, 0), task("h", "Dishes", "Home", false, 1)]);
        app.dispatch(Msg::SetCategoryFilter(CategoryFilter::Only("Work".to_string())));
        assert_eq!(app.filters.category, CategoryFilter::Only("Work".to_string()));
        assert_eq!(app.view().rows.len(), 1);

        app.dispatch(Msg::SnapshotReceived(Snapshot::ordered(vec![task("h", "Dishes", "Home", false, 1)])));
        assert_eq!(app.filters.category, CategoryFilter::All);
        assert_eq!(app.view().rows.len(), 1);
    }

    #[test]
    fn test_present_category_survives_snapshot() {
        let mut app = app_with(vec![task("w", "Deploy", "Work", false, 0), task("h", "Dishes", "Home", false, 1)]);
        app.dispatch(Msg::SetCategoryFilter(CategoryFilter::Only("Work".to_string())));
        app.dispatch(Msg::SnapshotReceived(Snapshot::ordered(vec![
            task("w", "Deploy", "Work", true, 0),
            task("h", "Dishes", "Home", false, 1),
        ])));
        assert_eq!(app.filters.category, CategoryFilter::Only("Work".to_string()));
    }

    #[test]
    fn test_category_filter_shows_only_that_category() {
        for work_done in [false, true] {
            let mut app = app_with(vec![
                task("w", "Deploy", "Work", work_done, 0),
                task("h", "Dishes", "Home", !work_done, 1),
            ]);
            app.dispatch(Msg::SetCategoryFilter(CategoryFilter::Only("Work".to_string())));

            for status in StatusFilter::all() {
                app.dispatch(Msg::SetStatusFilter(*status));
                let view = app.view();
                assert!(view.rows.iter().all(|t| t.category == "Work"));

                let expected = usize::from(status.admits(work_done));
                assert_eq!(view.rows.len(), expected, "status {:?}, work done {}", status, work_done);
            }
        }
    }

    #[test]
    fn test_unknown_category_selection_falls_back_to_all() {
        let mut app = app_with(vec![task("w", "Deploy", "Work", false, 0)]);
        app.dispatch(Msg::SetCategoryFilter(CategoryFilter::Only("Nope".to_string())));
        assert_eq!(app.filters.category, CategoryFilter::All);
    }

    #[test]
    fn test_cycle_category() {
        let mut app = app_with(vec![task("w", "Deploy", "Work", false, 0), task("h", "Dishes", "Home", false, 1)]);
        app.dispatch(Msg::CycleCategory { forward: true });
        assert_eq!(app.filters.category, CategoryFilter::Only("Home".to_string()));
        app.dispatch(Msg::CycleCategory { forward: false });
        assert_eq!(app.filters.category, CategoryFilter::All);
    }

    #[test]
    fn test_selection_follows_visible_rows() {
        let mut app = app_with(vec![
            task("a", "A", "", false, 2),
            task("b", "B", "", true, 1),
            task("c", "C", "", false, 0),
        ]);
        assert_eq!(app.selected_task().unwrap().id.as_str(), "a");

        app.dispatch(Msg::SelectNext);
        app.dispatch(Msg::SelectNext);
        app.dispatch(Msg::SelectNext);
        assert_eq!(app.selected_index, 2);
        assert_eq!(app.selected_task().unwrap().id.as_str(), "c");

        // Two active rows remain; selection is clamped onto the last one
        app.dispatch(Msg::SetStatusFilter(StatusFilter::Active));
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.selected_task().unwrap().id.as_str(), "c");

        app.dispatch(Msg::SetStatusFilter(StatusFilter::Completed));
        assert_eq!(app.selected_task().unwrap().id.as_str(), "b");

        app.dispatch(Msg::SelectPrev);
        app.dispatch(Msg::SelectPrev);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_selection_on_empty_list() {
        let mut app = AppState::new(true);
        app.dispatch(Msg::SelectNext);
        assert_eq!(app.selected_index, 0);
        assert!(app.selected_task().is_none());
    }

    #[test]
    fn test_subscription_lost_keeps_stale_list() {
        let mut app = app_with(vec![task("a", "A", "", false, 0)]);
        app.dispatch(Msg::SubscriptionLost {
            reason: "subscription closed".to_string(),
        });
        assert_eq!(app.sync_status, SyncStatus::Offline);
        assert_eq!(app.tasks.len(), 1);
    }
}
