//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::{EXPORT_SHORTCUT, NEXT_STEP_SHORTCUT, PREV_STEP_SHORTCUT, SAVE_SHORTCUT};
use crate::state::{Step, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header with the view title and signed-in user
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " Admissions Portal ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            app.state.current_view.title(),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(session) = &app.state.session {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("{} ({})", session.user.name, session.role().label()),
            Style::default().fg(Color::Green),
        ));
    } else {
        spans.push(Span::styled(
            " | not signed in",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(" ")];

    let hints = get_view_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    match app.state.current_view {
        View::Home => "j/k:nav  Enter:select  a:apply  q:quit".to_string(),
        View::Login | View::Register | View::StudentEdit => {
            format!(
                "Tab:next  ←/→:choose  ^U:clear  Enter/{}:submit  Esc:cancel",
                SAVE_SHORTCUT
            )
        }
        View::Apply if app.state.wizard.step() == Step::Review => format!(
            "Enter/{}:submit  {}/Esc:back",
            SAVE_SHORTCUT, PREV_STEP_SHORTCUT
        ),
        View::Apply => format!(
            "Tab:next  ←/→:choose  ^U:clear  Enter:attach  Del:remove file  {}:next  {}/Esc:back",
            NEXT_STEP_SHORTCUT, PREV_STEP_SHORTCUT
        ),
        View::StudentDashboard => "a:apply  r:refresh  l:logout  Esc:home".to_string(),
        View::AdminDashboard if app.state.search_active => {
            "type to search  Enter/Esc:done".to_string()
        }
        View::AdminDashboard => format!(
            "j/k:nav  /:search  f:filter  a/r/p:status  e:edit  n:new  d:delete  R:refresh  {}:export  l:logout",
            EXPORT_SHORTCUT
        ),
    }
}
