use crate::app::{AppState, Msg};
use crate::domain::{StatusFilter, UiMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the event loop to do
#[derive(Debug)]
pub enum KeyAction {
    Quit,
    Dispatch(Msg),
}

/// Map a key press to an action for the current mode
pub fn handle_key(app: &AppState, key: KeyEvent) -> Option<KeyAction> {
    // Ctrl-C always quits, even mid-form
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyAction::Quit);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask => handle_input_form_mode(key).map(KeyAction::Dispatch),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &AppState, key: KeyEvent) -> Option<KeyAction> {
    let msg = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyAction::Quit),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Msg::SelectPrev,
        KeyCode::Down | KeyCode::Char('j') => Msg::SelectNext,

        // Toggle completion of the selected row
        KeyCode::Char(' ') | KeyCode::Enter => Msg::ToggleTask(app.selected_task()?.id.clone()),

        // Delete the selected row
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            Msg::DeleteTask(app.selected_task()?.id.clone())
        }

        // Add task
        KeyCode::Char('a') | KeyCode::Char('A') => Msg::OpenForm,

        // Status filter buttons
        KeyCode::Char('1') => Msg::SetStatusFilter(StatusFilter::All),
        KeyCode::Char('2') => Msg::SetStatusFilter(StatusFilter::Active),
        KeyCode::Char('3') => Msg::SetStatusFilter(StatusFilter::Completed),

        // Category selector
        KeyCode::Char('c') | KeyCode::Right => Msg::CycleCategory { forward: true },
        KeyCode::Char('C') | KeyCode::Left => Msg::CycleCategory { forward: false },

        // Clear completed is only reachable while the control is shown
        KeyCode::Char('x') | KeyCode::Char('X') => {
            if !app.view().show_clear_completed {
                return None;
            }
            Msg::ClearCompleted
        }

        _ => return None,
    };

    Some(KeyAction::Dispatch(msg))
}

/// Handle keys while the add form is open
fn handle_input_form_mode(key: KeyEvent) -> Option<Msg> {
    match key.code {
        KeyCode::Esc => Some(Msg::CancelForm),
        KeyCode::Enter => Some(Msg::Submit),
        KeyCode::Tab | KeyCode::BackTab => Some(Msg::FormNextField),
        KeyCode::Backspace => Some(Msg::FormBackspace),
        KeyCode::Char(c) => Some(Msg::FormInput(c)),
        _ => None,
    }
}
