use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{App, EditField},
    ui::theme::Theme,
};

/// Calculates a centered rect for the dialog
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Renders the modal editor over the dashboard while a draft is staged.
pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(draft) = &app.expenses.state.editing else {
        return;
    };
    let theme = Theme::default();

    let card_area = centered_box(46, 8, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" Edit Expense ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Amount error
            Constraint::Length(1), // Category
            Constraint::Length(1), // Description
        ])
        .margin(1)
        .split(inner);

    let focus = app.ui.edit_focus;

    render_row(
        frame,
        rows[0],
        "Amount",
        &draft.amount_input,
        focus == EditField::Amount,
        &theme,
    );
    if let Some(message) = &draft.amount_error {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{:<13}{message}", ""),
                Style::default().fg(theme.error),
            )),
            rows[1],
        );
    }

    let arrow_style = if focus == EditField::Category {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.dim)
    };
    let category_line = Line::from(vec![
        Span::styled(format!("{:<13}", "Category"), Style::default().fg(theme.dim)),
        Span::styled("◀ ", arrow_style),
        Span::styled(draft.category.as_str(), Style::default().fg(theme.text)),
        Span::styled(" ▶", arrow_style),
    ]);
    frame.render_widget(Paragraph::new(category_line), rows[2]);

    render_row(
        frame,
        rows[3],
        "Description",
        &draft.description,
        focus == EditField::Description,
        &theme,
    );
}

fn render_row(
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
        Span::styled(format!("{label:<13}"), Style::default().fg(theme.dim)),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
