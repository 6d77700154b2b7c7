//! Machine-readable snapshot of chunks, gutter actions and link map geometry

use super::{App, CELL_WIDTH, LINE_HEIGHT};
use chunklink_core::{Canvas, ChangeKind, LinkMapFrame, Mode, PaneView};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Dump {
    pub mode: Mode,
    pub panes: Vec<DumpPane>,
    pub chunks: Vec<DumpChunk>,
    pub gutters: Vec<DumpGutter>,
    pub link_maps: Vec<LinkMapFrame>,
}

#[derive(Debug, Serialize)]
pub struct DumpPane {
    pub label: String,
    pub lines: usize,
    pub editable: bool,
}

#[derive(Debug, Serialize)]
pub struct DumpChunk {
    pub index: usize,
    /// Half-open `[start, end]` per pane
    pub ranges: Vec<[usize; 2]>,
    pub kinds: Vec<Option<ChangeKind>>,
}

#[derive(Debug, Serialize)]
pub struct DumpGutter {
    pub from: usize,
    pub to: usize,
    pub icons: Vec<DumpIcon>,
}

#[derive(Debug, Serialize)]
pub struct DumpIcon {
    pub line: usize,
    pub icon: &'static str,
    pub kind: ChangeKind,
}

impl Dump {
    pub fn new(app: &App) -> Self {
        let panes = app
            .document
            .panes
            .iter()
            .map(|p| DumpPane {
                label: p.label.clone(),
                lines: p.lines.len(),
                editable: p.editable,
            })
            .collect();

        let chunks = app
            .differ
            .chunks()
            .iter()
            .enumerate()
            .map(|(index, chunk)| DumpChunk {
                index,
                ranges: chunk.ranges.iter().map(|r| [r.start, r.end]).collect(),
                kinds: chunk.kinds.clone(),
            })
            .collect();

        let gutters = app
            .gutters
            .iter()
            .enumerate()
            .map(|(index, gutter)| {
                let from = gutter.from_pane();
                let icons = app
                    .differ
                    .chunks()
                    .iter()
                    .filter_map(|chunk| {
                        let line = chunk.ranges[from].start;
                        let (icon, kind) = app.gutter_icon(index, line)?;
                        Some(DumpIcon {
                            line,
                            icon: icon.name(),
                            kind,
                        })
                    })
                    .collect();
                DumpGutter {
                    from,
                    to: gutter.to_pane(),
                    icons,
                }
            })
            .collect();

        let views = app.views();
        let refs: Vec<&dyn PaneView> = views.iter().map(|v| v as &dyn PaneView).collect();
        let canvas = Canvas {
            width: app.link_map_width as f64 * CELL_WIDTH,
            height: app.viewport_rows as f64 * LINE_HEIGHT,
        };
        let link_maps = app
            .link_maps
            .iter()
            .map(|map| map.draw(&app.differ, &refs, canvas, app.cursor_chunk, &app.colors))
            .collect();

        Self {
            mode: app.mode,
            panes,
            chunks,
            gutters,
            link_maps,
        }
    }
}
