use crate::app::AppState;
use crate::domain::{checkbox_glyph, SyncStatus, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, empty_state_style, error_style, hint_style, removing_style,
    selected_style, tag_style, title_style,
};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let view = app.view();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(list_title(app.sync_status));

    if let Some(empty) = &view.empty {
        let paragraph = Paragraph::new(vec![Line::raw(""), Line::raw(empty.message())])
            .style(empty_state_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = view
        .rows
        .iter()
        .map(|task| {
            let removing = app.is_removing(&task.id);
            let line = create_task_line(task, app.use_emoji, removing);
            let style = if removing { removing_style() } else { default_style() };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(selected_style());

    // Keeps the selected row scrolled into view
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    f.render_stateful_widget(list, area, &mut state);
}

fn list_title(status: SyncStatus) -> Line<'static> {
    let status_style = match status {
        SyncStatus::Offline => error_style(),
        _ => hint_style(),
    };
    Line::from(vec![
        Span::styled(" Tasks ", title_style()),
        Span::styled(format!("({}) ", status.label()), status_style),
    ])
}

/// Create a single row
/// Format: ☐ Buy milk  [Shopping]  ✕
fn create_task_line(task: &Task, use_emoji: bool, removing: bool) -> Line<'static> {
    let mut spans = Vec::new();

    spans.push(Span::raw(format!("{} ", checkbox_glyph(task.completed, use_emoji))));

    if task.completed && !removing {
        spans.push(Span::styled(task.text.clone(), done_style()));
    } else {
        spans.push(Span::raw(task.text.clone()));
    }

    if task.has_category() {
        spans.push(Span::raw("  ".to_string()));
        spans.push(Span::styled(format!("[{}]", task.category), tag_style()));
    }

    // Delete control
    spans.push(Span::styled("  ✕".to_string(), hint_style()));

    Line::from(spans)
}
