use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use engine::MoneyCents;

use crate::{app::App, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary cards
            Constraint::Length(1), // Filter line
            Constraint::Min(0),    // Expense table
        ])
        .split(area);

    render_summary_cards(frame, layout[0], app, &theme);
    render_filter_line(frame, layout[1], app, &theme);
    render_table(frame, layout[2], app, &theme);
}

fn render_summary_cards(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let last = app
        .expenses
        .last_expense_date()
        .map(|dt| {
            dt.with_timezone(&app.ui.timezone)
                .format("%d %b %Y")
                .to_string()
        })
        .unwrap_or_else(|| "N/A".to_string());

    render_card(
        frame,
        cols[0],
        "Total Expenses",
        &app.expenses.total().to_string(),
        theme,
    );
    render_card(
        frame,
        cols[1],
        "Number of Expenses",
        &app.expenses.count().to_string(),
        theme,
    );
    render_card(frame, cols[2], "Last Expense Date", &last, theme);
}

fn render_card(frame: &mut Frame<'_>, area: Rect, title: &str, value: &str, theme: &Theme) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            value.to_string(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        inner,
    );
}

fn render_filter_line(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled("Filter", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}   ", app.expenses.state.filter.label())),
        Span::styled("f", Style::default().fg(theme.accent)),
        Span::raw(" cycles category"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let timezone = app.ui.timezone;

    let items = app
        .expenses
        .filtered()
        .iter()
        .map(|record| {
            let amount = MoneyCents::new(record.fields.amount_cents).to_string();
            let date = record
                .fields
                .created_at
                .with_timezone(&timezone)
                .format("%d %b %Y %H:%M")
                .to_string();
            let description = if record.fields.description.is_empty() {
                "N/A"
            } else {
                record.fields.description.as_str()
            };

            let text = format!(
                "{amount:>12}  {:<14} {date}  {description}",
                record.fields.category.as_str()
            );
            ListItem::new(Line::from(text))
        })
        .collect::<Vec<_>>();

    let empty = items.is_empty();
    let mut list_state = ListState::default();
    if !empty {
        list_state.select(Some(app.ui.selected));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Expense List "))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);

    if empty {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No expenses yet. Press 'a' to add one.",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            Rect {
                x: area.x,
                y: area.y + area.height / 2,
                width: area.width,
                height: 1,
            },
        );
    }
}
