use crate::app::{AppState, FormField};
use crate::domain::DEFAULT_CATEGORY;
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the add-task form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.input_form else {
        return;
    };
    let modal_area = create_modal_area(area);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.extend(field_lines("Task", &form.text, form.editing_field == FormField::Text));
    lines.push(Line::raw(""));
    lines.extend(field_lines(
        &format!("Category (blank = {})", DEFAULT_CATEGORY),
        &form.category,
        form.editing_field == FormField::Category,
    ));
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Tab to switch fields  ·  Enter to add  ·  Esc to cancel",
        hint_style(),
    ));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Add Task ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

fn field_lines(label: &str, value: &str, editing: bool) -> [Line<'static>; 2] {
    let label = if editing {
        format!("{}: (editing)", label)
    } else {
        format!("{}:", label)
    };

    let mut spans = vec![
        Span::raw("> "),
        Span::styled(value.to_string(), modal_title_style()),
    ];
    if editing {
        spans.push(Span::styled("█", modal_title_style())); // Cursor
    }

    [Line::raw(label), Line::from(spans)]
}
