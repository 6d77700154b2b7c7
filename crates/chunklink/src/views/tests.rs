use crate::app::{App, Document, HitTarget};
use crate::ui::{self, layout_elements, Element};
use super::linkmap::{contains, flatten, LinkMapWidget};
use chunklink_core::{
    ChangeKind, Connector, ConnectorShape, LinkMapFrame, Mode, PathCommand, Rgba, TextDirection,
};
use ratatui::{
    backend::TestBackend,
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
    Terminal,
};

fn make_app(texts: &[&str]) -> App {
    App::new(Document::from_texts(texts), TextDirection::Ltr).expect("app")
}

fn render_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| ui::draw(frame, app)).expect("draw");
    terminal.backend().buffer().clone()
}

fn buffer_text(buf: &Buffer) -> Vec<String> {
    let mut lines = Vec::new();
    for y in 0..buf.area.height {
        let mut line = String::new();
        for x in 0..buf.area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line);
    }
    lines
}

fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<PathCommand> {
    vec![
        PathCommand::MoveTo { x: x0, y: y0 },
        PathCommand::LineTo { x: x1, y: y0 },
        PathCommand::LineTo { x: x1, y: y1 },
        PathCommand::LineTo { x: x0, y: y1 },
        PathCommand::ClosePath,
    ]
}

fn connector(path: Vec<PathCommand>, fill: Rgba, highlight: Option<Rgba>) -> Connector {
    Connector {
        chunk: 0,
        kind: ChangeKind::Replace,
        shape: ConnectorShape::Band,
        path,
        fill,
        highlight,
        stroke: fill,
    }
}

#[test]
fn test_contains_even_odd() {
    let square = flatten(&rectangle(0.0, 0.0, 10.0, 10.0));
    assert_eq!(square.len(), 4);
    assert!(contains(&square, 5.0, 5.0));
    assert!(!contains(&square, 15.0, 5.0));
    assert!(!contains(&square, 5.0, -1.0));
    assert!(!contains(&square[..2], 5.0, 5.0));
}

#[test]
fn test_flatten_curve_ends_on_control_point() {
    let path = vec![
        PathCommand::MoveTo { x: 0.0, y: 0.0 },
        PathCommand::CurveTo {
            x1: 10.0,
            y1: 0.0,
            x2: 20.0,
            y2: 30.0,
            x3: 30.0,
            y3: 30.0,
        },
    ];
    let points = flatten(&path);
    assert_eq!(points.len(), 17);
    let (x, y) = points[points.len() - 1];
    assert!((x - 30.0).abs() < 1e-9 && (y - 30.0).abs() < 1e-9);
    // Monotone in y for this control polygon
    assert!(points.windows(2).all(|w| w[1].1 >= w[0].1));
}

#[test]
fn test_flatten_arc_stays_on_radius() {
    let path = vec![PathCommand::Arc {
        xc: 5.0,
        yc: 5.0,
        radius: 3.0,
        angle1: std::f64::consts::FRAC_PI_2,
        angle2: -std::f64::consts::FRAC_PI_2,
    }];
    let points = flatten(&path);
    assert_eq!(points.len(), 9);
    for (x, y) in points {
        let r = ((x - 5.0).powi(2) + (y - 5.0).powi(2)).sqrt();
        assert!((r - 3.0).abs() < 1e-9);
        // Positive sweep from the bottom through the left side
        assert!(x <= 5.0 + 1e-9);
    }
}

#[test]
fn test_link_map_widget_paints_band_rows() {
    // Lines 0 and 1 of a 16px line height
    let frame = LinkMapFrame {
        clip_height: 200.0,
        connectors: vec![connector(
            rectangle(-0.5, 0.0, 32.5, 32.0),
            Rgba::new(1.0, 0.0, 0.0, 1.0),
            None,
        )],
    };
    let area = Rect::new(0, 0, 8, 4);
    let mut buf = Buffer::empty(area);
    LinkMapWidget::new(&frame).render(area, &mut buf);

    for x in 0..8 {
        assert_eq!(buf[(x, 0)].bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(x, 1)].bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(x, 2)].bg, Color::Reset);
    }
}

#[test]
fn test_link_map_widget_highlight_and_clip() {
    let frame = LinkMapFrame {
        clip_height: 20.0,
        connectors: vec![connector(
            rectangle(-0.5, 0.0, 32.5, 64.0),
            Rgba::new(0.0, 0.0, 1.0, 1.0),
            Some(Rgba::new(1.0, 1.0, 1.0, 0.5)),
        )],
    };
    let area = Rect::new(2, 1, 4, 4);
    let mut buf = Buffer::empty(Rect::new(0, 0, 8, 6));
    LinkMapWidget::new(&frame).render(area, &mut buf);

    // Half white over blue
    assert_eq!(buf[(2, 1)].bg, Color::Rgb(128, 128, 255));
    // Outside the area
    assert_eq!(buf[(0, 1)].bg, Color::Reset);
    // Below the clip height
    assert_eq!(buf[(2, 2)].bg, Color::Reset);
}

#[test]
fn test_layout_elements_mirror_for_rtl() {
    assert_eq!(
        layout_elements(2, TextDirection::Ltr),
        vec![
            Element::Pane(0),
            Element::Gutter(0),
            Element::LinkMap(0),
            Element::Gutter(1),
            Element::Pane(1),
        ]
    );
    assert_eq!(
        layout_elements(2, TextDirection::Rtl),
        vec![
            Element::Pane(1),
            Element::Gutter(1),
            Element::LinkMap(0),
            Element::Gutter(0),
            Element::Pane(0),
        ]
    );
    assert_eq!(layout_elements(3, TextDirection::Ltr).len(), 11);
    assert_eq!(layout_elements(1, TextDirection::Ltr), vec![Element::Pane(0)]);
}

#[test]
fn test_full_draw_shows_icons_and_connector() {
    let mut app = make_app(&["a\nb\nc\n", "a\nB\nc\n"]);
    let buf = render_buffer(&mut app, 60, 12);
    let text = buffer_text(&buf).join("\n");

    assert!(text.contains("←"), "right gutter should offer apply-left");
    assert!(text.matches('→').count() >= 2, "left gutter should offer apply-right");
    assert!(text.contains("pane 1"));
    assert_eq!(app.viewport_rows, 9);

    let (link_area, _) = app
        .hit_areas
        .iter()
        .copied()
        .find(|(_, target)| *target == HitTarget::LinkMap(0))
        .expect("link map hit area");
    // Chunk covers line 1 of both panes: the second body row
    let row = link_area.y + 1;
    let painted = (link_area.x..link_area.right()).filter(|&x| buf[(x, row)].bg != Color::Reset);
    assert_eq!(painted.count(), link_area.width as usize);
    assert_eq!(buf[(link_area.x, link_area.y)].bg, Color::Reset);
}

#[test]
fn test_copy_prompt_popup() {
    let mut app = make_app(&["a\nb\nc\n", "a\nB\nc\n"]);
    app.set_mode(Mode::Insert);
    app.activate_current().unwrap();
    let text = buffer_text(&render_buffer(&mut app, 60, 12)).join("\n");
    assert!(text.contains("Copy chunk"));
    assert!(text.contains("copy below"));
}

#[test]
fn test_read_only_title() {
    let mut document = Document::from_texts(&["a\n", "b\n"]);
    document.panes[0].editable = false;
    let mut app = App::new(document, TextDirection::Ltr).unwrap();
    let text = buffer_text(&render_buffer(&mut app, 80, 6)).join("\n");
    assert!(text.contains("[read-only]"));
}
