//! Link map rendering: connector paths rasterised onto terminal cells

use crate::app::{App, HitTarget, CELL_WIDTH, LINE_HEIGHT};
use chunklink_core::{Canvas, Connector, LinkMapFrame, PathCommand, PaneView, Rgba};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget, Frame};
use std::f64::consts::TAU;

/// Segments per cubic curve
const CURVE_STEPS: usize = 16;
/// Segments per arc
const ARC_STEPS: usize = 8;

/// Colour fills are composited over
const BACKGROUND: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

/// Paints a [`LinkMapFrame`] by sampling each cell centre against the
/// connector outlines
pub struct LinkMapWidget<'a> {
    frame: &'a LinkMapFrame,
    cell_width: f64,
    line_height: f64,
}

impl<'a> LinkMapWidget<'a> {
    pub fn new(frame: &'a LinkMapFrame) -> Self {
        Self {
            frame,
            cell_width: CELL_WIDTH,
            line_height: LINE_HEIGHT,
        }
    }
}

impl Widget for LinkMapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let outlines: Vec<(Vec<(f64, f64)>, &Connector)> = self
            .frame
            .connectors
            .iter()
            .map(|c| (flatten(&c.path), c))
            .collect();

        for row in 0..area.height {
            let y = (row as f64 + 0.5) * self.line_height;
            if y > self.frame.clip_height {
                break;
            }
            for col in 0..area.width {
                let x = (col as f64 + 0.5) * self.cell_width;
                // Later connectors paint over earlier ones
                let color = outlines
                    .iter()
                    .rev()
                    .find(|(outline, _)| contains(outline, x, y))
                    .map(|(_, connector)| cell_color(connector));
                if let Some(color) = color {
                    buf[(area.x + col, area.y + row)].set_bg(color);
                }
            }
        }
    }
}

fn cell_color(connector: &Connector) -> Color {
    let mut color = connector.fill.over(BACKGROUND);
    if let Some(highlight) = connector.highlight {
        color = highlight.over(color);
    }
    let (r, g, b) = color.to_rgb8();
    Color::Rgb(r, g, b)
}

/// Approximate a path outline with a polygon
pub fn flatten(path: &[PathCommand]) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = Vec::new();
    for command in path {
        match *command {
            PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => points.push((x, y)),
            PathCommand::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => {
                let Some(&(x0, y0)) = points.last() else {
                    points.push((x3, y3));
                    continue;
                };
                for step in 1..=CURVE_STEPS {
                    let t = step as f64 / CURVE_STEPS as f64;
                    let mt = 1.0 - t;
                    let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
                    points.push((
                        a * x0 + b * x1 + c * x2 + d * x3,
                        a * y0 + b * y1 + c * y2 + d * y3,
                    ));
                }
            }
            PathCommand::Arc {
                xc,
                yc,
                radius,
                angle1,
                angle2,
            } => {
                let mut end = angle2;
                while end < angle1 {
                    end += TAU;
                }
                push_arc(&mut points, xc, yc, radius, angle1, end);
            }
            PathCommand::ArcNegative {
                xc,
                yc,
                radius,
                angle1,
                angle2,
            } => {
                let mut end = angle2;
                while end > angle1 {
                    end -= TAU;
                }
                push_arc(&mut points, xc, yc, radius, angle1, end);
            }
            PathCommand::ClosePath => {}
        }
    }
    points
}

fn push_arc(points: &mut Vec<(f64, f64)>, xc: f64, yc: f64, radius: f64, start: f64, end: f64) {
    for step in 0..=ARC_STEPS {
        let angle = start + (end - start) * step as f64 / ARC_STEPS as f64;
        points.push((xc + radius * angle.cos(), yc + radius * angle.sin()));
    }
}

/// Even-odd point in polygon test
pub fn contains(outline: &[(f64, f64)], x: f64, y: f64) -> bool {
    if outline.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = outline.len() - 1;
    for i in 0..outline.len() {
        let (xi, yi) = outline[i];
        let (xj, yj) = outline[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Render link map `index` between its two panes
pub fn render_link_map(frame: &mut Frame, app: &mut App, index: usize, area: Rect) {
    let views = app.views();
    let refs: Vec<&dyn PaneView> = views.iter().map(|v| v as &dyn PaneView).collect();
    let canvas = Canvas {
        width: area.width as f64 * CELL_WIDTH,
        height: area.height as f64 * LINE_HEIGHT,
    };
    let link_frame = app.link_maps[index].draw(
        &app.differ,
        &refs,
        canvas,
        app.cursor_chunk,
        &app.colors,
    );
    frame.render_widget(LinkMapWidget::new(&link_frame), area);
    app.hit_areas.push((area, HitTarget::LinkMap(index)));
}
