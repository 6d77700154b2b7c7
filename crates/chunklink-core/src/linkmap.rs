//! Link map geometry connecting corresponding chunks of two panes
//!
//! Each visible chunk becomes a closed band between the panes: two cubic
//! curves with control points at a third and two thirds of the canvas width,
//! joined by verticals at either edge. When one side of a chunk is entirely
//! off-screen the band is culled to a small rounded tab against the edge of
//! the side that is still visible.

use crate::action::TextDirection;
use crate::chunk::{ChangeKind, PairedChange};
use crate::color::{ColorScheme, Rgba};
use crate::differ::DiffSource;
use crate::pane::PaneView;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::{debug, trace};

/// Corner radius of culled chunk tabs
pub const RADIUS: f64 = 3.0;

/// Extra rows below the tallest pane kept inside the clip
const CLIP_MARGIN: f64 = 2.0;

/// Drawing area between two panes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

/// One step of a connector outline, in cairo terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    /// Clockwise arc
    Arc {
        xc: f64,
        yc: f64,
        radius: f64,
        angle1: f64,
        angle2: f64,
    },
    /// Counter-clockwise arc
    ArcNegative {
        xc: f64,
        yc: f64,
        radius: f64,
        angle1: f64,
        angle2: f64,
    },
    ClosePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorShape {
    /// Full band from one pane to the other
    Band,
    /// "To" side off-screen; tab against the "from" edge
    FromEdgeArc,
    /// "From" side off-screen; tab against the "to" edge
    ToEdgeArc,
}

/// Renderable geometry for one chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub chunk: usize,
    pub kind: ChangeKind,
    pub shape: ConnectorShape,
    pub path: Vec<PathCommand>,
    pub fill: Rgba,
    /// Drawn over `fill` for the chunk under the cursor
    pub highlight: Option<Rgba>,
    pub stroke: Rgba,
}

/// Everything a backend needs to paint a link map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkMapFrame {
    pub clip_height: f64,
    pub connectors: Vec<Connector>,
}

/// Map changes to connector geometry.
///
/// `panes` are the "from" and "to" views of `changes`, in that order.
pub fn map_regions(
    changes: &[PairedChange],
    panes: [&dyn PaneView; 2],
    canvas: Canvas,
    cursor_chunk: Option<usize>,
    colors: &ColorScheme,
) -> Vec<Connector> {
    let pix_start = [panes[0].visible_rect().y, panes[1].visible_rect().y];
    let offset_y = |side: usize, line: usize| {
        panes[side].y_for_line(line) - pix_start[side] + panes[side].y_offset()
    };
    let height = canvas.height;
    let off_screen = |a: f64, b: f64| (a < 0.0 && b < 0.0) || (a > height && b > height);

    let x_steps = [
        -0.5,
        canvas.width / 3.0,
        canvas.width * 2.0 / 3.0,
        canvas.width + 0.5,
    ];

    changes
        .iter()
        .filter_map(|paired| {
            let c = &paired.change;
            let (f0, f1) = (offset_y(0, c.from_start), offset_y(0, c.from_end));
            let (t0, t1) = (offset_y(1, c.to_start), offset_y(1, c.to_end));

            let (shape, path) = if off_screen(t0, t1) {
                if f0 == f1 {
                    debug!(chunk = paired.index, "culled chunk has no height");
                    return None;
                }
                let path = vec![
                    PathCommand::Arc {
                        xc: x_steps[0],
                        yc: f0 - 0.5 + RADIUS,
                        radius: RADIUS,
                        angle1: -FRAC_PI_2,
                        angle2: 0.0,
                    },
                    PathCommand::Arc {
                        xc: x_steps[0],
                        yc: f1 - 0.5 - RADIUS,
                        radius: RADIUS,
                        angle1: 0.0,
                        angle2: FRAC_PI_2,
                    },
                    PathCommand::ClosePath,
                ];
                (ConnectorShape::FromEdgeArc, path)
            } else if off_screen(f0, f1) {
                if t0 == t1 {
                    debug!(chunk = paired.index, "culled chunk has no height");
                    return None;
                }
                let path = vec![
                    PathCommand::ArcNegative {
                        xc: x_steps[3],
                        yc: t0 - 0.5 + RADIUS,
                        radius: RADIUS,
                        angle1: -FRAC_PI_2,
                        angle2: PI,
                    },
                    PathCommand::ArcNegative {
                        xc: x_steps[3],
                        yc: t1 - 0.5 - RADIUS,
                        radius: RADIUS,
                        angle1: PI,
                        angle2: FRAC_PI_2,
                    },
                    PathCommand::ClosePath,
                ];
                (ConnectorShape::ToEdgeArc, path)
            } else {
                let path = vec![
                    PathCommand::MoveTo {
                        x: x_steps[0],
                        y: f0 - 0.5,
                    },
                    PathCommand::CurveTo {
                        x1: x_steps[1],
                        y1: f0 - 0.5,
                        x2: x_steps[2],
                        y2: t0 - 0.5,
                        x3: x_steps[3],
                        y3: t0 - 0.5,
                    },
                    PathCommand::LineTo {
                        x: x_steps[3],
                        y: t1 - 0.5,
                    },
                    PathCommand::CurveTo {
                        x1: x_steps[2],
                        y1: t1 - 0.5,
                        x2: x_steps[1],
                        y2: f1 - 0.5,
                        x3: x_steps[0],
                        y3: f1 - 0.5,
                    },
                    PathCommand::ClosePath,
                ];
                (ConnectorShape::Band, path)
            };

            trace!(chunk = paired.index, ?shape, f0, f1, t0, t1, "mapped chunk");
            Some(Connector {
                chunk: paired.index,
                kind: c.kind,
                shape,
                path,
                fill: colors.fill(c.kind),
                highlight: (cursor_chunk == Some(paired.index))
                    .then_some(colors.current_chunk_highlight),
                stroke: colors.line(c.kind),
            })
        })
        .collect()
}

/// Direction of a scroll gesture over a link map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Moves the cursor between chunks
pub trait ChunkNavigator {
    /// Step to the previous (`Up`) or next (`Down`) chunk.
    /// Returns false when there is nowhere to go.
    fn next_diff(&mut self, direction: ScrollDirection) -> bool;
}

/// Link map between two panes
#[derive(Debug, Clone, Default)]
pub struct LinkMap {
    text_direction: TextDirection,
    panes: Option<[usize; 2]>,
}

impl LinkMap {
    pub fn new(text_direction: TextDirection) -> Self {
        Self {
            text_direction,
            panes: None,
        }
    }

    /// Attach to two panes, given in on-screen left/right order
    pub fn associate(&mut self, left_pane: usize, right_pane: usize) {
        let mut panes = [left_pane, right_pane];
        if self.text_direction == TextDirection::Rtl {
            panes.reverse();
        }
        self.panes = Some(panes);
    }

    pub fn is_associated(&self) -> bool {
        self.panes.is_some()
    }

    /// Associated panes as (from, to)
    pub fn panes(&self) -> Option<[usize; 2]> {
        self.panes
    }

    /// Build the frame for the current scroll state.
    ///
    /// `views` is indexed by pane number.
    pub fn draw(
        &self,
        diff: &dyn DiffSource,
        views: &[&dyn PaneView],
        canvas: Canvas,
        cursor_chunk: Option<usize>,
        colors: &ColorScheme,
    ) -> LinkMapFrame {
        let Some([left, right]) = self.panes else {
            return LinkMapFrame::default();
        };
        let (Some(&from_view), Some(&to_view)) = (views.get(left), views.get(right)) else {
            return LinkMapFrame::default();
        };

        let from_rect = from_view.visible_rect();
        let to_rect = to_view.visible_rect();
        let clip_height = from_rect.height.max(to_rect.height) + CLIP_MARGIN;

        let visible = [
            from_view.line_for_y(from_rect.y),
            from_view.line_for_y(from_rect.y + canvas.height),
            to_view.line_for_y(to_rect.y),
            to_view.line_for_y(to_rect.y + canvas.height),
        ];
        let changes = diff.pair_changes(left, right, visible);

        LinkMapFrame {
            clip_height,
            connectors: map_regions(&changes, [from_view, to_view], canvas, cursor_chunk, colors),
        }
    }

    /// Forward a scroll gesture to chunk navigation
    pub fn scroll(&self, direction: ScrollDirection, navigator: &mut dyn ChunkNavigator) -> bool {
        if !self.is_associated() {
            return false;
        }
        navigator.next_diff(direction)
    }
}

/// Scroll target that only navigates between chunks
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollLinkMap {
    associated: bool,
}

impl ScrollLinkMap {
    pub fn associate(&mut self) {
        self.associated = true;
    }

    pub fn scroll(&self, direction: ScrollDirection, navigator: &mut dyn ChunkNavigator) -> bool {
        self.associated && navigator.next_diff(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChangeRecord;
    use crate::differ::LineDiffer;
    use crate::pane::UniformPane;

    const CANVAS: Canvas = Canvas {
        width: 30.0,
        height: 100.0,
    };

    fn paired(index: usize, kind: ChangeKind, f: (usize, usize), t: (usize, usize)) -> PairedChange {
        PairedChange {
            index,
            change: ChangeRecord::new(kind, f.0, f.1, t.0, t.1),
        }
    }

    fn panes(from_scroll: usize, to_scroll: usize) -> (UniformPane, UniformPane) {
        (
            UniformPane::new(200, 100.0).with_line_height(10.0).with_scroll(from_scroll),
            UniformPane::new(200, 100.0).with_line_height(10.0).with_scroll(to_scroll),
        )
    }

    #[test]
    fn test_full_band_geometry() {
        let (from, to) = panes(0, 0);
        let changes = [paired(0, ChangeKind::Replace, (0, 2), (0, 3))];
        let connectors = map_regions(&changes, [&from, &to], CANVAS, None, &ColorScheme::default());
        assert_eq!(connectors.len(), 1);
        let band = &connectors[0];
        assert_eq!(band.shape, ConnectorShape::Band);
        assert_eq!(band.path[0], PathCommand::MoveTo { x: -0.5, y: -0.5 });
        assert_eq!(
            band.path[1],
            PathCommand::CurveTo {
                x1: 10.0,
                y1: -0.5,
                x2: 20.0,
                y2: -0.5,
                x3: 30.5,
                y3: -0.5,
            }
        );
        assert_eq!(band.path[2], PathCommand::LineTo { x: 30.5, y: 29.5 });
        assert_eq!(band.path.last(), Some(&PathCommand::ClosePath));
        assert_eq!(band.fill, ColorScheme::default().fill(ChangeKind::Replace));
        assert_eq!(band.highlight, None);
    }

    #[test]
    fn test_to_side_above_culls_to_from_edge_arc() {
        // "To" pane scrolled well past the change
        let (from, to) = panes(0, 20);
        let changes = [paired(0, ChangeKind::Replace, (2, 5), (0, 2))];
        let connectors = map_regions(&changes, [&from, &to], CANVAS, None, &ColorScheme::default());
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].shape, ConnectorShape::FromEdgeArc);
        assert_eq!(
            connectors[0].path[0],
            PathCommand::Arc {
                xc: -0.5,
                yc: 19.5 + RADIUS,
                radius: RADIUS,
                angle1: -FRAC_PI_2,
                angle2: 0.0,
            }
        );
    }

    #[test]
    fn test_from_side_below_culls_to_to_edge_arc() {
        let (from, to) = panes(0, 0);
        let changes = [paired(3, ChangeKind::Delete, (40, 45), (2, 4))];
        let connectors = map_regions(&changes, [&from, &to], CANVAS, None, &ColorScheme::default());
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].shape, ConnectorShape::ToEdgeArc);
        assert!(matches!(
            connectors[0].path[0],
            PathCommand::ArcNegative { xc, .. } if xc == 30.5
        ));
    }

    #[test]
    fn test_to_side_below_culls_to_from_edge_arc() {
        let (from, to) = panes(0, 0);
        let changes = [paired(0, ChangeKind::Replace, (2, 5), (40, 45))];
        let connectors = map_regions(&changes, [&from, &to], CANVAS, None, &ColorScheme::default());
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].shape, ConnectorShape::FromEdgeArc);
        assert_eq!(
            connectors[0].path[0],
            PathCommand::Arc {
                xc: -0.5,
                yc: 19.5 + RADIUS,
                radius: RADIUS,
                angle1: -FRAC_PI_2,
                angle2: 0.0,
            }
        );
    }

    #[test]
    fn test_from_side_above_culls_to_to_edge_arc() {
        // "From" pane scrolled past the change
        let (from, to) = panes(20, 0);
        let changes = [paired(0, ChangeKind::Replace, (2, 5), (1, 3))];
        let connectors = map_regions(&changes, [&from, &to], CANVAS, None, &ColorScheme::default());
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].shape, ConnectorShape::ToEdgeArc);
        assert_eq!(
            connectors[0].path[0],
            PathCommand::ArcNegative {
                xc: 30.5,
                yc: 9.5 + RADIUS,
                radius: RADIUS,
                angle1: -FRAC_PI_2,
                angle2: PI,
            }
        );
    }

    #[test]
    fn test_zero_height_culled_changes_are_skipped() {
        let (from, to) = panes(0, 20);
        let changes = [
            // "To" off-screen, "from" side empty
            paired(0, ChangeKind::Insert, (3, 3), (0, 2)),
            // "From" off-screen, "to" side empty
            paired(1, ChangeKind::Delete, (50, 52), (25, 25)),
        ];
        let connectors = map_regions(&changes, [&from, &to], CANVAS, None, &ColorScheme::default());
        assert!(connectors.is_empty());
    }

    #[test]
    fn test_only_cursor_chunk_is_highlighted() {
        let (from, to) = panes(0, 0);
        let changes = [
            paired(0, ChangeKind::Replace, (0, 1), (0, 1)),
            paired(1, ChangeKind::Insert, (3, 3), (3, 5)),
            paired(2, ChangeKind::Conflict, (6, 7), (8, 9)),
        ];
        let colors = ColorScheme::default();
        let connectors = map_regions(&changes, [&from, &to], CANVAS, Some(1), &colors);
        let highlighted: Vec<usize> = connectors
            .iter()
            .filter(|c| c.highlight.is_some())
            .map(|c| c.chunk)
            .collect();
        assert_eq!(highlighted, vec![1]);
        assert_eq!(connectors[1].highlight, Some(colors.current_chunk_highlight));
        assert_eq!(connectors[2].fill, colors.fill(ChangeKind::Conflict));
    }

    #[test]
    fn test_map_regions_is_idempotent() {
        let (from, to) = panes(3, 7);
        let changes = [
            paired(0, ChangeKind::Replace, (0, 2), (0, 3)),
            paired(1, ChangeKind::Delete, (5, 9), (9, 9)),
            paired(2, ChangeKind::Insert, (30, 30), (12, 40)),
        ];
        let colors = ColorScheme::default();
        let first = map_regions(&changes, [&from, &to], CANVAS, Some(2), &colors);
        let second = map_regions(&changes, [&from, &to], CANVAS, Some(2), &colors);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_y_offset_shifts_pane_space() {
        let from = UniformPane::new(50, 100.0).with_line_height(10.0).with_y_offset(4.0);
        let to = UniformPane::new(50, 100.0).with_line_height(10.0);
        let changes = [paired(0, ChangeKind::Replace, (1, 2), (1, 2))];
        let connectors = map_regions(&changes, [&from, &to], CANVAS, None, &ColorScheme::default());
        assert_eq!(connectors[0].path[0], PathCommand::MoveTo { x: -0.5, y: 13.5 });
    }

    #[test]
    fn test_unassociated_link_map_draws_nothing() {
        let differ = LineDiffer::new(&["a\n", "b\n"]).unwrap();
        let (from, to) = panes(0, 0);
        let views: [&dyn PaneView; 2] = [&from, &to];
        let link_map = LinkMap::new(TextDirection::Ltr);
        let frame = link_map.draw(&differ, &views, CANVAS, None, &ColorScheme::default());
        assert_eq!(frame, LinkMapFrame::default());
    }

    #[test]
    fn test_draw_end_to_end() {
        let differ = LineDiffer::new(&["a\nb\nc\nd\n", "x\ny\nz\nc\nd\n"]).unwrap();
        let from = UniformPane::new(4, 100.0).with_line_height(10.0);
        let to = UniformPane::new(5, 80.0).with_line_height(10.0);
        let views: [&dyn PaneView; 2] = [&from, &to];
        let mut link_map = LinkMap::new(TextDirection::Ltr);
        link_map.associate(0, 1);

        let frame = link_map.draw(&differ, &views, CANVAS, Some(0), &ColorScheme::default());
        assert_eq!(frame.clip_height, 102.0);
        assert_eq!(frame.connectors.len(), 1);
        let connector = &frame.connectors[0];
        assert_eq!(connector.shape, ConnectorShape::Band);
        assert_eq!(connector.kind, ChangeKind::Replace);
        assert!(connector.highlight.is_some());
        assert_eq!(connector.path[0], PathCommand::MoveTo { x: -0.5, y: -0.5 });
        assert_eq!(connector.path[2], PathCommand::LineTo { x: 30.5, y: 29.5 });
    }

    #[test]
    fn test_rtl_association_reverses_panes() {
        let mut link_map = LinkMap::new(TextDirection::Rtl);
        link_map.associate(0, 1);
        assert_eq!(link_map.panes(), Some([1, 0]));
    }

    struct Steps(Vec<ScrollDirection>);

    impl ChunkNavigator for Steps {
        fn next_diff(&mut self, direction: ScrollDirection) -> bool {
            self.0.push(direction);
            true
        }
    }

    #[test]
    fn test_scroll_requires_association() {
        let mut steps = Steps(Vec::new());
        let mut link_map = LinkMap::new(TextDirection::Ltr);
        assert!(!link_map.scroll(ScrollDirection::Down, &mut steps));
        link_map.associate(0, 1);
        assert!(link_map.scroll(ScrollDirection::Down, &mut steps));

        let mut scroll_map = ScrollLinkMap::default();
        assert!(!scroll_map.scroll(ScrollDirection::Up, &mut steps));
        scroll_map.associate();
        assert!(scroll_map.scroll(ScrollDirection::Up, &mut steps));
        assert_eq!(steps.0, vec![ScrollDirection::Down, ScrollDirection::Up]);
    }
}
