//! UI rendering for the TUI

use crate::app::App;
use crate::views::{render_gutter, render_link_map, render_pane, render_pane_title};
use chunklink_core::TextDirection;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// One column of the body, left to right on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Pane(usize),
    Gutter(usize),
    LinkMap(usize),
}

/// Screen order of panes, gutters and link maps
///
/// Between panes p and p+1 sit the gutter acting p→p+1, the link map, and
/// the gutter acting p+1→p. Right-to-left layouts mirror the whole row.
pub fn layout_elements(pane_count: usize, text_direction: TextDirection) -> Vec<Element> {
    let mut elements = Vec::new();
    for pane in 0..pane_count {
        elements.push(Element::Pane(pane));
        if pane + 1 < pane_count {
            elements.push(Element::Gutter(2 * pane));
            elements.push(Element::LinkMap(pane));
            elements.push(Element::Gutter(2 * pane + 1));
        }
    }
    if text_direction == TextDirection::Rtl {
        elements.reverse();
    }
    elements
}

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Top bar
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    app.hit_areas.clear();
    draw_top_bar(frame, app, chunks[0]);
    draw_body(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.pending_copy.is_some() {
        draw_copy_popup(frame);
    }
}

fn draw_body(frame: &mut Frame, app: &mut App, area: Rect) {
    let elements = layout_elements(app.pane_count(), app.text_direction);
    let constraints: Vec<Constraint> = elements
        .iter()
        .map(|element| match element {
            Element::Pane(_) => Constraint::Fill(1),
            Element::Gutter(_) => Constraint::Length(2),
            Element::LinkMap(_) => Constraint::Length(app.link_map_width),
        })
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    // First row holds pane titles
    app.viewport_rows = area.height.saturating_sub(1) as usize;

    for (element, column) in elements.into_iter().zip(columns.iter()) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(*column);
        match element {
            Element::Pane(pane) => {
                render_pane_title(frame, app, pane, rows[0]);
                render_pane(frame, app, pane, rows[1]);
            }
            Element::Gutter(gutter) => render_gutter(frame, app, gutter, rows[1]),
            Element::LinkMap(index) => render_link_map(frame, app, index, rows[1]),
        }
    }
}

fn draw_top_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunk = match app.cursor_chunk {
        Some(c) => format!("chunk {}/{}", c + 1, app.differ.chunks().len()),
        None => "no changes".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.mode.name()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  pane {} → {}  {}",
            app.focus_pane,
            app.target_pane(),
            chunk
        )),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.status.clone().unwrap_or_else(|| {
        "j/k chunk  h/l pane  Tab target  m mode  Enter apply  ^s save  q quit".to_string()
    });
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn draw_copy_popup(frame: &mut Frame) {
    let area = centered_rect(30, 5, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Copy chunk ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let text = vec![
        Line::from("[u] copy above"),
        Line::from("[d] copy below"),
        Line::from("[Esc] cancel"),
    ];
    frame.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Left),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
