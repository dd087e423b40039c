//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod home;
mod layout;
mod widgets;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

pub(crate) use widgets::{centered_rect, render_scrollable_list, status_color};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    match app.state.current_view {
        View::Home => home::draw(frame, main_area, app),
        View::Login => forms::draw_login(frame, main_area, app),
        View::Register => forms::draw_register(frame, main_area, app),
        View::Apply => forms::draw_application(frame, main_area, app),
        View::StudentDashboard => dashboard::draw_student(frame, main_area, app),
        View::AdminDashboard => dashboard::draw_admin(frame, main_area, app),
        View::StudentEdit => forms::draw_student_edit(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Modal overlays, errors on top
    if let Some(action) = &app.state.confirm {
        components::render_confirm_dialog(frame, action);
    }
    if let Some(message) = app.state.current_error() {
        components::render_error_dialog(frame, message, app.state.error_count());
    }
}
