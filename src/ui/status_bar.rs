use crate::domain::ListView;
use crate::ui::styles::{border_style, default_style, hint_style};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the remaining count and, when there is something to clear, the clear-completed control
pub fn render_status_bar(f: &mut Frame, view: &ListView<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let count = Paragraph::new(Line::from(Span::styled(
        format!(" {}", view.remaining_text()),
        default_style(),
    )));
    f.render_widget(count, chunks[0]);

    if view.show_clear_completed {
        let clear = Paragraph::new(Line::from(Span::styled("x Clear completed ", hint_style())))
            .alignment(Alignment::Right);
        f.render_widget(clear, chunks[1]);
    }
}
