//! Field rendering utilities for forms

use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows a field box takes, borders included
pub fn field_height(is_multiline: bool) -> u16 {
    if is_multiline {
        6
    } else {
        3
    }
}

/// Draw a single-line record form field
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let display = field.display_value();
    draw_field_with_value(
        frame,
        area,
        FieldBox {
            label: &field.label,
            value: &display,
            placeholder: "(empty)",
            is_active,
            is_multiline: false,
            error: None,
        },
    );
}

/// What to draw for one field box
pub struct FieldBox<'a> {
    pub label: &'a str,
    pub value: &'a str,
    /// Shown dimmed when the value is empty and the field is inactive
    pub placeholder: &'a str,
    pub is_active: bool,
    pub is_multiline: bool,
    /// Validation message shown in the bottom border
    pub error: Option<&'a str>,
}

/// Draw a field box with an explicit display value
pub fn draw_field_with_value(frame: &mut Frame, area: Rect, field: FieldBox) {
    let border_style = if field.error.is_some() {
        Style::default().fg(Color::Red)
    } else if field.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let value_style = if field.is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let cursor = Span::styled(
        if field.is_active { "▌" } else { "" },
        Style::default().fg(Color::Cyan),
    );

    let content = if field.value.is_empty() && !field.is_active {
        Paragraph::new(Span::styled(
            field.placeholder,
            Style::default().fg(Color::DarkGray),
        ))
    } else if field.is_multiline {
        let mut lines: Vec<Line> = field
            .value
            .split('\n')
            .map(|l| Line::from(Span::styled(l, value_style)))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans.push(cursor);
        }
        // Keep the cursor line visible
        let inner_height = area.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(inner_height) as u16;
        Paragraph::new(lines).scroll((scroll, 0))
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(field.value, value_style),
            cursor,
        ]))
    };

    let mut block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(error) = field.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::Red),
        )));
    }

    let content = if field.is_multiline {
        content.wrap(Wrap { trim: false })
    } else {
        content
    };
    frame.render_widget(content.block(block), area);
}

/// Draw a single line of dimmed help text
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

/// Draw a form-level error line
pub fn draw_form_error(frame: &mut Frame, area: Rect, error: Option<&str>) {
    if let Some(error) = error {
        let line = Paragraph::new(Span::styled(error, Style::default().fg(Color::Red)))
            .wrap(Wrap { trim: true });
        frame.render_widget(line, area);
    }
}
