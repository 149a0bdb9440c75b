use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use api_types::Category;

use crate::{
    app::{AddField, App},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();
    let state = &app.expenses.state;

    let block = Block::default()
        .title(" Add New Expense ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Amount error
            Constraint::Length(1), // Category
            Constraint::Length(1), // Description
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let focus = app.ui.add_focus;
    render_input(
        frame,
        rows[0],
        "Amount ($)",
        &state.amount_input,
        focus == AddField::Amount,
        &theme,
    );
    if let Some(message) = &state.amount_error {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{:<14}{message}", ""),
                Style::default().fg(theme.error),
            )),
            rows[1],
        );
    }
    render_category(
        frame,
        rows[2],
        state.category_input,
        focus == AddField::Category,
        &theme,
    );
    render_input(
        frame,
        rows[3],
        "Description",
        &state.description_input,
        focus == AddField::Description,
        &theme,
    );
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.dim)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label:<14}"), Style::default().fg(theme.dim)),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_category(
    frame: &mut Frame<'_>,
    area: Rect,
    category: Category,
    focused: bool,
    theme: &Theme,
) {
    let arrow_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.dim)
    };

    let line = Line::from(vec![
        Span::styled(format!("{:<14}", "Category"), Style::default().fg(theme.dim)),
        Span::styled("◀ ", arrow_style),
        Span::styled(category.as_str(), Style::default().fg(theme.text)),
        Span::styled(" ▶", arrow_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
