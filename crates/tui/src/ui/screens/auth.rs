use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use engine::AuthMode;

use crate::{
    app::{App, AuthField},
    ui::theme::Theme,
};

/// Calculates a centered rect for the auth card
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

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();
    let state = &app.auth.state;
    let sign_up = state.mode == AuthMode::SignUp;

    let box_width = 44;
    let box_height = if sign_up { 10 } else { 8 };
    let card_area = centered_box(box_width, box_height, area);

    // Clear the area behind the form
    frame.render_widget(Clear, card_area);

    let title = if sign_up { " Sign Up " } else { " Sign In " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let mut constraints = vec![
        Constraint::Length(1), // Email
        Constraint::Length(1), // Email error
        Constraint::Length(1), // Password
        Constraint::Length(1), // Password error
    ];
    if sign_up {
        constraints.push(Constraint::Length(1)); // Confirm password
        constraints.push(Constraint::Length(1)); // Confirm error
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let focus = app.ui.auth_focus;
    render_input(
        frame,
        rows[0],
        "Email",
        &state.email,
        false,
        focus == AuthField::Email,
        &theme,
    );
    render_error(frame, rows[1], state.email_error.as_deref(), &theme);
    render_input(
        frame,
        rows[2],
        "Password",
        &state.password,
        true,
        focus == AuthField::Password,
        &theme,
    );
    render_error(frame, rows[3], state.password_error.as_deref(), &theme);
    if sign_up {
        render_input(
            frame,
            rows[4],
            "Confirm",
            &state.confirm_password,
            true,
            focus == AuthField::ConfirmPassword,
            &theme,
        );
        render_error(
            frame,
            rows[5],
            state.confirm_password_error.as_deref(),
            &theme,
        );
    }

    // Operation error banner below the card
    if let Some(message) = &state.error {
        let banner_area = Rect {
            x: card_area.x,
            y: card_area.y + card_area.height,
            width: card_area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            ))
            .alignment(Alignment::Center),
            banner_area,
        );
    }

    let toggle = if sign_up { "back to sign in" } else { "sign up" };
    let hints_area = Rect {
        x: area.x,
        y: card_area.y + card_area.height + 1,
        width: area.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::raw(" submit  "),
            Span::styled("Tab", Style::default().fg(theme.accent)),
            Span::raw(" next  "),
            Span::styled("Ctrl+S", Style::default().fg(theme.accent)),
            Span::raw(format!(" {toggle}  ")),
            Span::styled("Ctrl+F", Style::default().fg(theme.accent)),
            Span::raw(" sign in with google"),
        ]))
        .alignment(Alignment::Center),
        hints_area,
    );
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    is_password: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };

    let shown = if is_password {
        mask_password(value)
    } else {
        value.to_string()
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.dim)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
        Span::styled(format!("{shown}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_error(frame: &mut Frame<'_>, area: Rect, error: Option<&str>, theme: &Theme) {
    if let Some(message) = error {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{:<10}{message}", ""),
                Style::default().fg(theme.error),
            )),
            area,
        );
    }
}

/// Masks a password with bullets, one per character
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}
