pub mod filter_bar;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod status_bar;
pub mod styles;

use crate::app::AppState;
use filter_bar::render_filter_bar;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use ratatui::Frame;
use status_bar::render_status_bar;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area, app.ui_mode);
    render_filter_bar(f, &app.filters, layout.filter_area);
    render_list_pane(f, app, layout.list_area);
    render_status_bar(f, &app.view(), layout.status_area);

    // Form draws over everything else
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Msg;
    use crate::domain::{Snapshot, StatusFilter, Task, TaskId};
    use chrono::{Duration, TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn task(id: &str, text: &str, completed: bool, minutes: i64) -> Task {
        Task {
            id: TaskId::new(id),
            text: text.to_string(),
            category: "Home".to_string(),
            completed,
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap() + Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_render_empty_list() {
        let app = AppState::new(true);
        let screen = draw(&app);
        assert!(screen.contains("Add a task to get started!"));
        assert!(screen.contains("0 tasks left"));
        assert!(!screen.contains("Clear completed"));
    }

    #[test]
    fn test_render_rows_and_clear_control() {
        let mut app = AppState::new(false);
        app.dispatch(Msg::SnapshotReceived(Snapshot::ordered(vec![
            task("a", "Water plants", false, 0),
            task("b", "Dishes", true, 1),
        ])));

        let screen = draw(&app);
        assert!(screen.contains("[ ] Water plants"));
        assert!(screen.contains("[x] Dishes"));
        assert!(screen.contains("[Home]"));
        assert!(screen.contains("1 task left"));
        assert!(screen.contains("Clear completed"));
    }

    #[test]
    fn test_render_filtered_empty_state() {
        let mut app = AppState::new(false);
        app.dispatch(Msg::SnapshotReceived(Snapshot::ordered(vec![task("a", "Water plants", false, 0)])));
        app.dispatch(Msg::SetStatusFilter(StatusFilter::Completed));

        let screen = draw(&app);
        assert!(screen.contains("No completed tasks yet."));
        assert!(!screen.contains("Water plants"));
    }

    #[test]
    fn test_render_form() {
        let mut app = AppState::new(true);
        app.dispatch(Msg::OpenForm);
        app.dispatch(Msg::FormInput('h'));
        app.dispatch(Msg::FormInput('i'));

        let screen = draw(&app);
        assert!(screen.contains("Add Task"));
        assert!(screen.contains("> hi"));
    }
}
