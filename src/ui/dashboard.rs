//! Student and admin dashboards

use super::{render_scrollable_list, status_color};
use crate::api::{ApplicationStatus, Student};
use crate::app::App;
use crate::state::{DraftField, Step};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the signed-in student's application summary
pub fn draw_student(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let name = app
        .state
        .session
        .as_ref()
        .map(|s| s.user.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("student");
    let greeting = Paragraph::new(Line::from(Span::styled(
        format!(" Welcome, {}!", name),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(greeting, chunks[0]);
    let area = chunks[1];

    let block = Block::default()
        .title(" My Application ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(record) = &app.state.my_application else {
        let message = if app.state.application_loaded {
            "You have not submitted an application yet.\nPress 'a' to start one."
        } else {
            "Loading your application..."
        };
        let content = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    };

    let status = record.status();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                status.label().to_uppercase(),
                Style::default()
                    .fg(status_color(status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Submitted: ", Style::default().fg(Color::DarkGray)),
            Span::raw(record.created_at.as_deref().unwrap_or("N/A")),
        ]),
    ];
    if let Some(updated) = &record.updated_at {
        lines.push(Line::from(vec![
            Span::styled("Last updated: ", Style::default().fg(Color::DarkGray)),
            Span::raw(updated.as_str()),
        ]));
    }

    for step in [Step::Personal, Step::Academic, Step::Additional] {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            step.title(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for field in step.fields() {
            lines.push(summary_line(*field, record.field(field.name())));
        }
    }

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(content, area);
}

fn summary_line(field: DraftField, value: Option<String>) -> Line<'static> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "N/A".to_string());
    Line::from(vec![
        Span::styled(
            format!("  {}: ", field.label()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

/// Draw the admin dashboard: stats, filters, student list and detail
pub fn draw_admin(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Length(1), // Search and filter
            Constraint::Min(0),    // List and detail
        ])
        .split(area);

    draw_stats(frame, chunks[0], app);
    draw_filter_line(frame, chunks[1], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(40)])
        .split(chunks[2]);

    draw_student_list(frame, body[0], app);
    draw_student_detail(frame, body[1], app);
}

fn draw_stats(frame: &mut Frame, area: Rect, app: &App) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let (total, counts) = match &app.state.stats {
        Some(stats) => (
            stats.total_students,
            [
                stats.count(ApplicationStatus::Pending),
                stats.count(ApplicationStatus::Approved),
                stats.count(ApplicationStatus::Rejected),
            ],
        ),
        None => (app.state.students.len() as u64, [0, 0, 0]),
    };

    let tiles = [
        ("Total", total, Color::Cyan),
        ("Pending", counts[0], status_color(ApplicationStatus::Pending)),
        ("Approved", counts[1], status_color(ApplicationStatus::Approved)),
        ("Rejected", counts[2], status_color(ApplicationStatus::Rejected)),
    ];
    for (cell, (label, value, color)) in cells.iter().zip(tiles) {
        let tile = Paragraph::new(Line::from(vec![
            Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", label), Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(tile, *cell);
    }
}

fn draw_filter_line(frame: &mut Frame, area: Rect, app: &App) {
    let search_style = if app.state.search_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if app.state.search_active { "▌" } else { "" };

    let line = Line::from(vec![
        Span::styled(" Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.state.search_term.as_str(), search_style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
        Span::styled("  [/]", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.state.status_filter.label(),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("  [f]cycle", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_student_list(frame: &mut Frame, area: Rect, app: &App) {
    let students = app.state.filtered_students();
    let block = Block::default()
        .title(format!(
            " Students ({} of {}) ",
            students.len(),
            app.state.students.len()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if students.is_empty() {
        let message = if app.state.students.is_empty() {
            "No students yet.\nPress 'n' to add one."
        } else {
            "No students match the current search and filter."
        };
        let content = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = students
        .iter()
        .enumerate()
        .map(|(idx, student)| student_row(student, idx == app.state.selected_index))
        .collect();

    let list = List::new(items).block(block);
    render_scrollable_list(frame, area, list, app.state.selected_index);
}

fn student_row(student: &Student, is_selected: bool) -> ListItem<'_> {
    let prefix = if is_selected { "▸" } else { " " };
    let style = if is_selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let status = format!("[{}]", student.status.label());

    ListItem::new(Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(
            format!("{:<10}", status),
            Style::default().fg(status_color(student.status)),
        ),
        Span::styled(format!(" {:<24}", student.name), style),
        Span::styled(
            format!(" {}", student.email),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn draw_student_detail(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(student) = app.state.selected_student() else {
        frame.render_widget(block, area);
        return;
    };

    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
            Span::raw(value),
        ])
    };
    let or_na = |value: &str| {
        if value.trim().is_empty() {
            "N/A".to_string()
        } else {
            value.to_string()
        }
    };

    let lines = vec![
        Line::from(Span::styled(
            student.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        row("ID", student.id.to_string()),
        row("Email", or_na(&student.email)),
        row("University", or_na(&student.university)),
        row(
            "BE Percentage",
            student
                .be_percentage
                .map(|p| format!("{p}%"))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        row(
            "BE Ranking",
            student
                .be_ranking
                .map(|r| r.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        row("Location", or_na(&student.location)),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                student.status.label(),
                Style::default()
                    .fg(status_color(student.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(content, area);
}
