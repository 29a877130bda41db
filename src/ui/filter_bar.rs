use crate::domain::{Filters, StatusFilter};
use crate::ui::styles::{active_filter_style, border_style, default_style, hint_style, tag_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status buttons and the category selector
pub fn render_filter_bar(f: &mut Frame, filters: &Filters, area: Rect) {
    let paragraph = Paragraph::new(filter_line(filters)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style()),
    );
    f.render_widget(paragraph, area);
}

fn filter_line(filters: &Filters) -> Line<'static> {
    let mut spans = vec![Span::raw(" ".to_string())];

    for (idx, status) in StatusFilter::all().iter().enumerate() {
        let style = if *status == filters.status {
            active_filter_style()
        } else {
            default_style()
        };
        spans.push(Span::styled(format!(" {} {} ", idx + 1, status.label()), style));
        spans.push(Span::raw(" ".to_string()));
    }

    spans.push(Span::styled("│ Category: ".to_string(), hint_style()));
    spans.push(Span::styled(format!("◂ {} ▸", filters.category.label()), tag_style()));

    Line::from(spans)
}
