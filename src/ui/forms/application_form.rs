//! Multi-step application form

use super::field_renderer::{draw_field_with_value, field_height, FieldBox};
use super::review::draw_review;
use crate::app::App;
use crate::state::{ApplicationWizard, DraftField, FieldKind, Step, WizardButton};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_application(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.state.wizard;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Step indicator
            Constraint::Min(0),                // Step content
            Constraint::Length(BUTTON_HEIGHT), // Back / Next
        ])
        .split(area);

    draw_step_indicator(frame, chunks[0], wizard.step());

    let block = Block::default()
        .title(format!(
            " Step {} of {}: {} ",
            wizard.step().number(),
            Step::ALL.len(),
            wizard.step().title()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if wizard.is_buttons_row_active() {
            Color::DarkGray
        } else {
            Color::Cyan
        }));
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    if wizard.step() == Step::Review {
        draw_review(frame, inner, wizard.draft());
    } else {
        draw_step_fields(frame, inner, wizard);
    }

    draw_buttons(frame, chunks[2], wizard);
}

fn draw_step_indicator(frame: &mut Frame, area: Rect, current: Step) {
    let mut spans = vec![Span::raw(" ")];
    for (idx, step) in Step::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" ─ ", Style::default().fg(Color::DarkGray)));
        }
        let style = if *step == current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if *step < current {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let marker = if *step < current { "✓" } else { "●" };
        spans.push(Span::styled(
            format!("{} {}", marker, step.title()),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Index of the first field to draw so the active one fits in `height`
fn first_visible(heights: &[u16], active: usize, height: u16) -> usize {
    let active = active.min(heights.len().saturating_sub(1));
    let mut used = 0u16;
    let mut first = active + 1;
    while first > 0 {
        let next = used.saturating_add(heights[first - 1]);
        if next > height {
            break;
        }
        used = next;
        first -= 1;
    }
    first.min(active)
}

fn draw_step_fields(frame: &mut Frame, area: Rect, wizard: &ApplicationWizard) {
    let fields = wizard.fields();
    if fields.is_empty() {
        return;
    }
    let heights: Vec<u16> = fields
        .iter()
        .map(|f| field_height(f.kind() == FieldKind::Multiline))
        .collect();

    let first = first_visible(&heights, wizard.active_field_index, area.height);
    let mut y = area.y;
    for (idx, field) in fields.iter().enumerate().skip(first) {
        let height = heights[idx];
        if y + height > area.y + area.height {
            break;
        }
        let field_area = Rect {
            x: area.x + 1,
            y,
            width: area.width.saturating_sub(2),
            height,
        };
        draw_draft_field(frame, field_area, wizard, *field, idx == wizard.active_field_index);
        y += height;
    }
}

fn draw_draft_field(
    frame: &mut Frame,
    area: Rect,
    wizard: &ApplicationWizard,
    field: DraftField,
    is_active: bool,
) {
    let draft = wizard.draft();
    let required = if field.is_required() { " *" } else { "" };
    let label = format!("{}{}", field.label(), required);

    let (value, placeholder) = match field.kind() {
        FieldKind::Choice(_) => {
            let current = draft.text(field);
            if current.is_empty() {
                (
                    if is_active { "◀ select ▶".to_string() } else { String::new() },
                    "(select)",
                )
            } else {
                (format!("◀ {} ▶", current), "")
            }
        }
        FieldKind::File(allowed) => {
            let value = match draft.attachment(field) {
                Some(file) if !is_active => format!("📎 {}", file.display()),
                _ => wizard.file_input(field).to_string(),
            };
            let hint = if allowed.contains(&"pdf") {
                "(path to .pdf, .doc or .docx)"
            } else {
                "(path to .jpg, .jpeg or .png)"
            };
            (value, hint)
        }
        FieldKind::Date => (draft.text(field).to_string(), "(YYYY-MM-DD)"),
        FieldKind::Text | FieldKind::Multiline => (draft.text(field).to_string(), "(empty)"),
    };

    draw_field_with_value(
        frame,
        area,
        FieldBox {
            label: &label,
            value: &value,
            placeholder,
            is_active,
            is_multiline: field.kind() == FieldKind::Multiline,
            error: wizard.errors().get(field),
        },
    );
}

fn draw_buttons(frame: &mut Frame, area: Rect, wizard: &ApplicationWizard) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(0),
            Constraint::Length(20),
        ])
        .split(area);

    let on_buttons = wizard.is_buttons_row_active();
    let back_label = if wizard.can_go_back() { "Back" } else { "Leave" };
    render_button(
        frame,
        chunks[0],
        back_label,
        on_buttons && wizard.selected_button() == WizardButton::Back,
        true,
        None,
    );

    let next_label = if wizard.step() == Step::Review {
        "Submit"
    } else {
        "Next"
    };
    render_button(
        frame,
        chunks[2],
        next_label,
        on_buttons && wizard.selected_button() == WizardButton::Next,
        true,
        Some(Color::Green),
    );

    if !wizard.errors().is_empty() {
        let count = wizard.errors().len();
        let notice = Paragraph::new(Span::styled(
            format!(
                "{} field{} need{} attention",
                count,
                if count == 1 { "" } else { "s" },
                if count == 1 { "s" } else { "" }
            ),
            Style::default().fg(Color::Red),
        ))
        .alignment(ratatui::layout::Alignment::Center);
        let middle = Rect {
            y: chunks[1].y + 1,
            height: 1,
            ..chunks[1]
        };
        frame.render_widget(notice, middle);
    }
}
