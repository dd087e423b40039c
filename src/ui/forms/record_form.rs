//! Login, registration and student record forms

use super::field_renderer::{draw_field, draw_form_error, draw_help_text, field_height};
use crate::app::App;
use crate::state::{FieldForm, FormState};
use crate::ui::centered_rect;
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

pub fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    if let FormState::Login(form) = &app.state.form {
        draw_record_form(
            frame,
            area,
            " Log In ",
            form,
            form.error.as_deref(),
            "Log In",
            "Choose Student or Admin with ←/→ on the role field.",
        );
    }
}

pub fn draw_register(frame: &mut Frame, area: Rect, app: &App) {
    if let FormState::Register(form) = &app.state.form {
        draw_record_form(
            frame,
            area,
            " Create an Account ",
            form,
            form.error.as_deref(),
            "Register",
            "Registered accounts sign in as students.",
        );
    }
}

pub fn draw_student_edit(frame: &mut Frame, area: Rect, app: &App) {
    if let FormState::StudentEdit(form) = &app.state.form {
        let (title, submit) = if form.is_new() {
            (" Add Student ", "Add Student")
        } else {
            (" Edit Student ", "Save Changes")
        };
        draw_record_form(
            frame,
            area,
            title,
            form,
            form.error.as_deref(),
            submit,
            "Percentage is 0-100; ranking is a whole number.",
        );
    }
}

fn draw_record_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &dyn FieldForm,
    error: Option<&str>,
    submit_label: &str,
    help: &str,
) {
    let fields = form.fields();
    let active = form.active_field();

    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height(false)))
        .collect();
    constraints.push(Constraint::Length(2)); // Error
    constraints.push(Constraint::Length(BUTTON_HEIGHT)); // Submit
    constraints.push(Constraint::Length(1)); // Help
    constraints.push(Constraint::Min(0));

    let form_height: u16 = field_height(false) * fields.len() as u16
        + 2
        + BUTTON_HEIGHT
        + 1
        + 2; // borders
    let boxed = centered_rect(area, 60, form_height + 2);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(boxed);
    frame.render_widget(block, boxed);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    for (idx, field) in fields.iter().enumerate() {
        draw_field(frame, chunks[idx], field, idx == active);
    }

    let n = fields.len();
    draw_form_error(frame, chunks[n], error);

    let button_area = centered_rect(chunks[n + 1], 24, BUTTON_HEIGHT);
    render_button(
        frame,
        button_area,
        submit_label,
        form.is_submit_row_active(),
        true,
        Some(Color::Green),
    );

    draw_help_text(frame, chunks[n + 2], help);
}
