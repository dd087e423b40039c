//! Reusable UI widget helpers

use crate::api::ApplicationStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    widgets::{List, ListState},
    Frame,
};

/// Render a list that keeps the selected item scrolled into view
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn status_color(status: ApplicationStatus) -> Color {
    match status {
        ApplicationStatus::Approved => Color::Green,
        ApplicationStatus::Rejected => Color::Red,
        ApplicationStatus::Pending => Color::Yellow,
        ApplicationStatus::Unknown => Color::DarkGray,
    }
}

/// Center a box of at most `width` x `height` inside `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}
