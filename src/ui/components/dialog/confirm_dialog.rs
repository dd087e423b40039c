//! Confirmation dialog for destructive actions

use super::base::{render_dialog, DialogConfig};
use crate::state::PendingConfirm;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render the y/n prompt for a pending action
pub fn render_confirm_dialog(frame: &mut Frame, action: &PendingConfirm) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::styled("y", key_style),
        Span::styled("/", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", key_style),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("n", key_style),
        Span::styled("/", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", key_style),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ];

    let title = match action {
        PendingConfirm::DeleteStudent { .. } => "Confirm Delete",
    };
    let message = action.message();

    render_dialog(
        frame,
        DialogConfig {
            title,
            title_color: Color::Red,
            border_color: Color::Red,
            message: &message,
            hint: Some(hint),
            max_width: 50,
        },
    );
}
