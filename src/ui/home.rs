//! Landing page with the main menu

use super::{centered_rect, render_scrollable_list};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

const INTRO: &str = "Apply for graduate admission in three short steps: personal details, \
academic background and your statement of purpose. Attach your transcript, CV and photo \
along the way, then review everything before you submit.";

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let items = app.state.home_items();
    let boxed = centered_rect(area, 64, 10 + items.len() as u16);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),                       // Intro
            Constraint::Length(items.len() as u16 + 2), // Menu
            Constraint::Min(0),
        ])
        .split(boxed);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Student Admissions",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(INTRO),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, chunks[0]);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let is_selected = idx == app.state.home_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}", prefix, item.label()),
                style,
            )))
        })
        .collect();

    let list = List::new(list_items).block(
        Block::default()
            .title(" Menu ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, chunks[1], list, app.state.home_index);
}
