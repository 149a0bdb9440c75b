pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use engine::AuthView;

use crate::app::{App, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    match app.auth.view() {
        AuthView::Form(_) => screens::auth::render(frame, area, app),
        AuthView::Authenticated { greeting } => render_shell(frame, area, app, &greeting),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, app: &App, greeting: &str) {
    let theme = Theme::default();

    // Main layout: info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], app, greeting, &theme);
    components::tabs::render_tabs(frame, layout[1], app.ui.section, &theme);

    match app.ui.section {
        Section::Dashboard => screens::dashboard::render(frame, layout[2], app),
        Section::Add => screens::add_expense::render(frame, layout[2], app),
    }

    render_bottom_bar(frame, layout[3], app, &theme);
    components::edit_dialog::render(frame, area, app);
}

fn render_info_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App,
    greeting: &str,
    theme: &Theme,
) {
    let mut line = vec![Span::styled(
        greeting.to_string(),
        Style::default().fg(theme.text),
    )];

    if let Some(status) = &app.ui.status {
        line.push(Span::raw("   "));
        line.push(Span::styled(
            status.clone(),
            Style::default().fg(theme.error),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let mut parts = vec![
        Span::styled("a", Style::default().fg(theme.accent)),
        Span::raw(" add  "),
        Span::styled("Esc", Style::default().fg(theme.accent)),
        Span::raw(" dashboard"),
    ];

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.extend(context_hints(app, theme));

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("o", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" sign out  "));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Context-specific keyboard hints for the current section/mode.
fn context_hints(app: &App, theme: &Theme) -> Vec<Span<'static>> {
    if app.expenses.state.editing.is_some() {
        return vec![
            Span::styled("Tab", Style::default().fg(theme.accent)),
            Span::raw(" next  "),
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::raw(" save  "),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::raw(" cancel"),
        ];
    }

    match app.ui.section {
        Section::Dashboard => vec![
            Span::styled("j/k", Style::default().fg(theme.accent)),
            Span::raw(" select  "),
            Span::styled("e", Style::default().fg(theme.accent)),
            Span::raw(" edit  "),
            Span::styled("x", Style::default().fg(theme.accent)),
            Span::raw(" delete  "),
            Span::styled("f", Style::default().fg(theme.accent)),
            Span::raw(" filter  "),
            Span::styled("r", Style::default().fg(theme.accent)),
            Span::raw(" refresh"),
        ],
        Section::Add => vec![
            Span::styled("Tab", Style::default().fg(theme.accent)),
            Span::raw(" next  "),
            Span::styled("◀/▶", Style::default().fg(theme.accent)),
            Span::raw(" category  "),
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::raw(" add"),
        ],
    }
}
