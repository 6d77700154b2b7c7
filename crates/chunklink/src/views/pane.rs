//! Text pane and its chunk action gutter

use crate::app::{App, HitTarget};
use chunklink_core::{ActionIcon, ChangeKind, DiffChunk, Rgba};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Width of the line number column
const LINE_NUMBER_WIDTH: usize = 5; // "1234 "

/// Render the visible lines of `pane`
pub fn render_pane(frame: &mut Frame, app: &App, pane: usize, area: Rect) {
    let Some(text) = app.document.panes.get(pane) else {
        return;
    };
    let scroll = app.scroll[pane];
    let rows = area.height as usize;
    let kinds = line_kinds(app, pane, scroll, rows);

    let lines: Vec<Line> = text
        .lines
        .iter()
        .skip(scroll)
        .take(rows)
        .zip(kinds)
        .enumerate()
        .map(|(row, (content, kind))| {
            let number = format!("{:>4} ", scroll + row + 1);
            let mut content_style = Style::default();
            if let Some((kind, is_cursor)) = kind {
                content_style = content_style.bg(rgb(app.colors.fill(kind))).fg(Color::Black);
                if is_cursor {
                    content_style = content_style.add_modifier(Modifier::BOLD);
                }
            }
            Line::from(vec![
                Span::styled(number, Style::default().fg(Color::DarkGray)),
                Span::styled(content.clone(), content_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Title row above a pane
pub fn render_pane_title(frame: &mut Frame, app: &App, pane: usize, area: Rect) {
    let Some(text) = app.document.panes.get(pane) else {
        return;
    };
    let mut title = format!("{:width$}", "", width = LINE_NUMBER_WIDTH);
    title.push_str(&text.label);
    if text.dirty {
        title.push_str(" *");
    }
    if !text.editable {
        title.push_str(" [read-only]");
    }

    let mut style = Style::default().fg(Color::Gray);
    if app.focus_pane == pane {
        style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
    }
    frame.render_widget(Paragraph::new(Line::from(Span::styled(title, style))), area);
}

/// Kind to display for each visible line, and whether it is in the cursor chunk
fn line_kinds(app: &App, pane: usize, scroll: usize, rows: usize) -> Vec<Option<(ChangeKind, bool)>> {
    let mut kinds = vec![None; rows];
    for (index, chunk) in app.differ.chunks().iter().enumerate() {
        let Some(kind) = pane_kind(chunk, pane) else {
            continue;
        };
        let range = &chunk.ranges[pane];
        let is_cursor = app.cursor_chunk == Some(index);
        for line in range.start.max(scroll)..range.end.min(scroll + rows) {
            kinds[line - scroll] = Some((kind, is_cursor));
        }
    }
    kinds
}

/// Kind of a chunk as seen from one pane; conflicts win over plain changes
fn pane_kind(chunk: &DiffChunk, pane: usize) -> Option<ChangeKind> {
    let left = pane
        .checked_sub(1)
        .and_then(|p| chunk.kinds.get(p).copied().flatten());
    let right = chunk.kinds.get(pane).copied().flatten();
    if left == Some(ChangeKind::Conflict) || right == Some(ChangeKind::Conflict) {
        return Some(ChangeKind::Conflict);
    }
    right.or(left)
}

fn icon_glyph(icon: ActionIcon) -> &'static str {
    match icon {
        ActionIcon::ApplyRight => "→",
        ActionIcon::ApplyLeft => "←",
        ActionIcon::Delete => "✕",
        ActionIcon::Copy => "+",
    }
}

/// Render chunk action icons for `gutter`
pub fn render_gutter(frame: &mut Frame, app: &mut App, gutter: usize, area: Rect) {
    let from = app.gutters[gutter].from_pane();
    let scroll = app.scroll[from];
    let lines: Vec<Line> = (0..area.height as usize)
        .map(|row| match app.gutter_icon(gutter, scroll + row) {
            Some((icon, kind)) => Line::from(Span::styled(
                icon_glyph(icon),
                Style::default()
                    .fg(rgb(app.colors.line(kind)))
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(""),
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).centered(), area);
    app.hit_areas.push((area, HitTarget::Gutter(gutter)));
}

fn rgb(color: Rgba) -> Color {
    let (r, g, b) = color.to_rgb8();
    Color::Rgb(r, g, b)
}
