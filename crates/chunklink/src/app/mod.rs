//! Application state and logic

use anyhow::Result;
use chunklink_core::{
    Activation, ActionIcon, ChangeKind, ChunkActionGutter, ChunkNavigator, ColorScheme,
    CopyPlacement, DiffSource, LineDiffer, LinkMap, Mode, PaneView, ScrollDirection,
    TextDirection, UniformPane,
};
use ratatui::layout::{Position, Rect};
use tracing::{debug, info};

mod document;
mod dump;

pub use document::Document;
pub use dump::Dump;

/// Virtual pixel height of one terminal row
pub const LINE_HEIGHT: f64 = 16.0;
/// Virtual pixel width of one terminal column
pub const CELL_WIDTH: f64 = 4.0;

/// Screen element a mouse event can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Gutter(usize),
    LinkMap(usize),
}

/// A copy waiting for the user to pick up or down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCopy {
    pub gutter: usize,
    pub chunk: chunklink_core::ChangeRecord,
}

/// The main application state
pub struct App {
    pub document: Document,
    pub differ: LineDiffer,
    /// Default action for gutter clicks
    pub mode: Mode,
    pub text_direction: TextDirection,
    /// Two per neighbouring pane pair: `2p` is p→p+1, `2p+1` is p+1→p
    pub gutters: Vec<ChunkActionGutter>,
    /// One per neighbouring pane pair
    pub link_maps: Vec<LinkMap>,
    pub colors: ColorScheme,
    /// Chunk under the cursor
    pub cursor_chunk: Option<usize>,
    /// Pane whose gutter Enter activates
    pub focus_pane: usize,
    /// Whether Enter targets the pane to the right of the focus
    pub target_right: bool,
    /// First visible line of each pane
    pub scroll: Vec<usize>,
    /// Rows available to the panes (computed during render)
    pub viewport_rows: usize,
    /// Link map width in columns
    pub link_map_width: u16,
    pub pending_copy: Option<PendingCopy>,
    pub status: Option<String>,
    pub should_quit: bool,
    quit_requested: bool,
    /// Mouse targets recorded by the last render
    pub hit_areas: Vec<(Rect, HitTarget)>,
}

impl App {
    pub fn new(document: Document, text_direction: TextDirection) -> Result<Self> {
        let differ = LineDiffer::from_lines(document.lines())?;
        let pane_count = document.panes.len();

        let mut gutters = Vec::new();
        let mut link_maps = Vec::new();
        for pane in 0..pane_count.saturating_sub(1) {
            gutters.push(ChunkActionGutter::new(pane, pane + 1, text_direction));
            gutters.push(ChunkActionGutter::new(pane + 1, pane, text_direction));
            let mut link_map = LinkMap::new(text_direction);
            link_map.associate(pane, pane + 1);
            link_maps.push(link_map);
        }

        let mut app = Self {
            document,
            differ,
            mode: Mode::default(),
            text_direction,
            gutters,
            link_maps,
            colors: ColorScheme::default(),
            cursor_chunk: None,
            focus_pane: 0,
            target_right: true,
            scroll: vec![0; pane_count],
            viewport_rows: 24,
            link_map_width: 8,
            pending_copy: None,
            status: None,
            should_quit: false,
            quit_requested: false,
            hit_areas: Vec::new(),
        };
        app.next_diff(ScrollDirection::Down);
        Ok(app)
    }

    pub fn pane_count(&self) -> usize {
        self.document.panes.len()
    }

    /// Gutter index for clicks in `from` acting on `to`
    pub fn gutter_index(from: usize, to: usize) -> Option<usize> {
        if to == from + 1 {
            Some(2 * from)
        } else if from == to + 1 {
            Some(2 * to + 1)
        } else {
            None
        }
    }

    /// Current view state of every pane
    pub fn views(&self) -> Vec<UniformPane> {
        self.document
            .panes
            .iter()
            .zip(&self.scroll)
            .map(|(pane, &scroll)| UniformPane {
                line_height: LINE_HEIGHT,
                line_count: pane.lines.len(),
                scroll_line: scroll,
                visible_height: self.viewport_rows as f64 * LINE_HEIGHT,
                y_offset: 0.0,
                editable: pane.editable,
                text_direction: self.text_direction,
            })
            .collect()
    }

    /// Recompute chunks after an edit
    pub fn rediff(&mut self) -> Result<()> {
        self.differ = LineDiffer::from_lines(self.document.lines())?;
        let count = self.differ.chunk_count();
        // New edits need a fresh quit confirmation
        self.quit_requested = false;
        self.cursor_chunk = match (self.cursor_chunk, count) {
            (_, 0) => None,
            (Some(c), _) => Some(c.min(count - 1)),
            (None, _) => Some(0),
        };
        debug!(chunks = count, "rediffed");
        Ok(())
    }

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        self.mode = mode;
        let mut redraw = false;
        for gutter in &mut self.gutters {
            redraw |= gutter.on_mode_changed(mode);
        }
        redraw
    }

    pub fn cycle_mode(&mut self) {
        self.set_mode(self.mode.next());
        self.status = Some(format!("Mode: {}", self.mode));
    }

    pub fn focus_left(&mut self) {
        self.focus_pane = self.focus_pane.saturating_sub(1);
    }

    pub fn focus_right(&mut self) {
        if self.focus_pane + 1 < self.pane_count() {
            self.focus_pane += 1;
        }
    }

    pub fn toggle_target(&mut self) {
        self.target_right = !self.target_right;
    }

    /// Pane Enter acts on from the focused pane
    pub fn target_pane(&self) -> usize {
        let last = self.pane_count().saturating_sub(1);
        if self.focus_pane == 0 {
            1.min(last)
        } else if self.focus_pane == last || !self.target_right {
            self.focus_pane - 1
        } else {
            self.focus_pane + 1
        }
    }

    pub fn scroll_by(&mut self, delta: isize) {
        for (pane, scroll) in self.document.panes.iter().zip(self.scroll.iter_mut()) {
            let max = pane.lines.len().saturating_sub(1);
            *scroll = scroll.saturating_add_signed(delta).min(max);
        }
    }

    /// Scroll every pane so the cursor chunk sits a third of the way down
    fn scroll_to_cursor(&mut self) {
        let Some(chunk) = self.cursor_chunk.and_then(|c| self.differ.chunks().get(c)) else {
            return;
        };
        let lead = self.viewport_rows / 3;
        for (scroll, range) in self.scroll.iter_mut().zip(&chunk.ranges) {
            *scroll = range.start.saturating_sub(lead);
        }
    }

    /// Icon and raw change kind shown by `gutter` at `line`
    pub fn gutter_icon(&self, gutter: usize, line: usize) -> Option<(ActionIcon, ChangeKind)> {
        let gutter = self.gutters.get(gutter)?;
        let views = self.views();
        let refs: Vec<&dyn PaneView> = views.iter().map(|v| v as &dyn PaneView).collect();
        let icon = gutter.query_icon(line, &self.differ, &refs)?;
        let index = self.differ.locate_chunk(gutter.from_pane(), line).index?;
        let change = self
            .differ
            .get_chunk(index, gutter.from_pane(), Some(gutter.to_pane()))?;
        Some((icon, change.kind))
    }

    /// Activate the focused gutter on the cursor chunk
    pub fn activate_current(&mut self) -> Result<()> {
        let Some(chunk) = self.cursor_chunk.and_then(|c| self.differ.chunks().get(c)) else {
            self.status = Some("No chunk selected".to_string());
            return Ok(());
        };
        let from = self.focus_pane;
        let line = chunk.ranges[from].start;
        self.activate_at(from, self.target_pane(), line)
    }

    /// Click `line` in the gutter of `from` acting on `to`
    pub fn activate_at(&mut self, from: usize, to: usize, line: usize) -> Result<()> {
        let Some(index) = Self::gutter_index(from, to) else {
            return Ok(());
        };
        let views = self.views();
        let refs: Vec<&dyn PaneView> = views.iter().map(|v| v as &dyn PaneView).collect();
        let activation = self.gutters[index].activate(line, &self.differ, &refs, &mut self.document);

        match activation {
            Activation::Inert => {
                self.status = Some("Nothing to do here".to_string());
            }
            Activation::Deleted => {
                self.status = Some(format!("Deleted chunk in pane {}", from));
                self.rediff()?;
            }
            Activation::Replaced => {
                self.status = Some(format!("Applied chunk to pane {}", to));
                self.rediff()?;
            }
            Activation::CopyOffered(chunk) => {
                self.pending_copy = Some(PendingCopy {
                    gutter: index,
                    chunk,
                });
                self.status = Some("Copy: [u]p or [d]own".to_string());
            }
        }
        Ok(())
    }

    /// Finish a pending copy
    pub fn answer_copy(&mut self, placement: CopyPlacement) -> Result<()> {
        let Some(pending) = self.pending_copy.take() else {
            return Ok(());
        };
        self.gutters[pending.gutter].copy(&pending.chunk, placement, &mut self.document);
        self.status = Some(match placement {
            CopyPlacement::Up => "Copied chunk above".to_string(),
            CopyPlacement::Down => "Copied chunk below".to_string(),
        });
        self.rediff()
    }

    pub fn cancel_copy(&mut self) {
        if self.pending_copy.take().is_some() {
            self.status = None;
        }
    }

    pub fn save(&mut self) -> Result<()> {
        let written = self.document.save()?;
        info!(written, "saved document");
        self.status = Some(format!("Saved {} file(s)", written));
        Ok(())
    }

    /// Quit, asking once for confirmation when there are unsaved edits
    pub fn request_quit(&mut self) {
        if self.document.is_dirty() && !self.quit_requested {
            self.quit_requested = true;
            self.status = Some("Unsaved changes: q again to quit, Ctrl-s to save".to_string());
            return;
        }
        self.should_quit = true;
    }

    /// Forget a pending quit confirmation
    pub fn cancel_quit(&mut self) {
        self.quit_requested = false;
    }

    fn hit(&self, column: u16, row: u16) -> Option<(Rect, HitTarget)> {
        let position = Position::new(column, row);
        self.hit_areas
            .iter()
            .find(|(area, _)| area.contains(position))
            .copied()
    }

    pub fn handle_click(&mut self, column: u16, row: u16) -> Result<()> {
        let Some((area, HitTarget::Gutter(index))) = self.hit(column, row) else {
            return Ok(());
        };
        let gutter = &self.gutters[index];
        let (from, to) = (gutter.from_pane(), gutter.to_pane());
        let line = self.scroll[from] + (row - area.y) as usize;
        if !gutter.query_activatable(line, &self.differ) {
            return Ok(());
        }
        self.activate_at(from, to, line)
    }

    pub fn handle_scroll(&mut self, column: u16, row: u16, direction: ScrollDirection) {
        if let Some((_, HitTarget::LinkMap(index))) = self.hit(column, row) {
            let link_map = self.link_maps[index].clone();
            link_map.scroll(direction, self);
            return;
        }
        match direction {
            ScrollDirection::Up => self.scroll_by(-3),
            ScrollDirection::Down => self.scroll_by(3),
        }
    }

    pub fn dump(&self) -> Dump {
        Dump::new(self)
    }
}

impl ChunkNavigator for App {
    fn next_diff(&mut self, direction: ScrollDirection) -> bool {
        let count = self.differ.chunk_count();
        let target = match (self.cursor_chunk, direction) {
            (_, _) if count == 0 => None,
            (None, _) => Some(0),
            (Some(c), ScrollDirection::Down) => (c + 1 < count).then_some(c + 1),
            (Some(c), ScrollDirection::Up) => c.checked_sub(1),
        };
        let Some(target) = target else {
            return false;
        };
        self.cursor_chunk = Some(target);
        self.scroll_to_cursor();
        true
    }
}
