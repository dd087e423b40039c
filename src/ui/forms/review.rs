//! Read-only summary of the draft before submission

use crate::state::{ApplicationDraft, DraftField, Step};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Longest value shown in full; longer text is cut with an ellipsis
const PREVIEW_CHARS: usize = 120;

pub fn draw_review(frame: &mut Frame, area: Rect, draft: &ApplicationDraft) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .horizontal_margin(1)
        .spacing(2)
        .split(area);

    let mut left = section(draft, Step::Personal);
    left.push(Line::from(""));
    left.extend(section(draft, Step::Academic));

    let mut right = section(draft, Step::Additional);
    right.push(Line::from(""));
    right.push(Line::from(Span::styled(
        "Check everything above, then press Enter on Submit.",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(left).wrap(Wrap { trim: false }), columns[0]);
    frame.render_widget(Paragraph::new(right).wrap(Wrap { trim: false }), columns[1]);
}

fn section(draft: &ApplicationDraft, step: Step) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        step.title(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.extend(step.fields().iter().map(|field| review_line(draft, *field)));
    lines
}

fn review_line(draft: &ApplicationDraft, field: DraftField) -> Line<'static> {
    let value = preview(&draft.display_value(field));
    let value_style = if draft.has_value(field) {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(
            format!("{}: ", field.label()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(value, value_style),
    ])
}

/// Single-line preview of a possibly long, multi-line value
fn preview(value: &str) -> String {
    let flat = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut.trim_end())
    }
}
