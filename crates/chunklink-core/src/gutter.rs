//! Per-line chunk action gutter
//!
//! A gutter sits beside the "from" pane and offers one action per chunk
//! towards the "to" pane. Only the first line of a chunk carries an icon.

use crate::action::{classify, Action, ActionIcon, Direction, Mode, TextDirection};
use crate::chunk::ChangeRecord;
use crate::differ::DiffSource;
use crate::pane::PaneView;
use tracing::debug;

/// Edits a gutter click can trigger
pub trait ChunkEditor {
    fn delete_chunk(&mut self, pane: usize, chunk: &ChangeRecord);

    /// Overwrite the chunk's lines in `to_pane` with those from `from_pane`
    fn replace_chunk(&mut self, from_pane: usize, to_pane: usize, chunk: &ChangeRecord);

    /// Insert the chunk's `from_pane` lines above (`copy_up`) or below the
    /// chunk in `to_pane`
    fn copy_chunk(&mut self, from_pane: usize, to_pane: usize, chunk: &ChangeRecord, copy_up: bool);
}

/// Where a copied chunk lands relative to the target chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPlacement {
    Up,
    Down,
}

/// Outcome of clicking a gutter line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Nothing to do at this line
    Inert,
    Deleted,
    Replaced,
    /// Copy needs a placement; finish with [`ChunkActionGutter::copy`]
    CopyOffered(ChangeRecord),
}

#[derive(Debug, Clone)]
pub struct ChunkActionGutter {
    from_pane: usize,
    to_pane: usize,
    mode: Mode,
    direction: Direction,
}

impl ChunkActionGutter {
    pub fn new(from_pane: usize, to_pane: usize, text_direction: TextDirection) -> Self {
        Self {
            from_pane,
            to_pane,
            mode: Mode::default(),
            direction: Direction::resolve(from_pane, to_pane, text_direction),
        }
    }

    pub fn from_pane(&self) -> usize {
        self.from_pane
    }

    pub fn to_pane(&self) -> usize {
        self.to_pane
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Container changed the default action. Returns true when the gutter
    /// needs a redraw.
    pub fn on_mode_changed(&mut self, mode: Mode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Chunk starting at `line`, as a change towards the target pane
    fn chunk_at(&self, line: usize, diff: &dyn DiffSource) -> Option<(usize, ChangeRecord)> {
        let index = diff.locate_chunk(self.from_pane, line).index?;
        let chunk = diff.get_chunk(index, self.from_pane, Some(self.to_pane))?;
        (chunk.from_start == line).then_some((index, chunk))
    }

    fn action_for(&self, chunk: &ChangeRecord, views: &[&dyn PaneView]) -> Option<Action> {
        let editable = |pane: usize| views.get(pane).is_some_and(|v| v.editable());
        classify(chunk, self.mode, editable(self.from_pane), editable(self.to_pane))
    }

    /// Icon for `line`, if the line starts an actionable chunk
    pub fn query_icon(
        &self,
        line: usize,
        diff: &dyn DiffSource,
        views: &[&dyn PaneView],
    ) -> Option<ActionIcon> {
        let (_, chunk) = self.chunk_at(line, diff)?;
        let action = self.action_for(&chunk, views)?;
        Some(ActionIcon::for_action(self.direction, action))
    }

    /// Whether `line` starts any chunk of the "from" pane, whichever pane
    /// it pairs with
    pub fn query_activatable(&self, line: usize, diff: &dyn DiffSource) -> bool {
        diff.locate_chunk(self.from_pane, line)
            .index
            .and_then(|index| diff.get_chunk(index, self.from_pane, None))
            .is_some_and(|chunk| chunk.from_start == line)
    }

    /// Handle a click on `line`
    pub fn activate(
        &self,
        line: usize,
        diff: &dyn DiffSource,
        views: &[&dyn PaneView],
        editor: &mut dyn ChunkEditor,
    ) -> Activation {
        let Some((index, chunk)) = self.chunk_at(line, diff) else {
            return Activation::Inert;
        };
        let Some(action) = self.action_for(&chunk, views) else {
            return Activation::Inert;
        };
        // Deleting or copying an empty range changes nothing
        if action != Mode::Replace && chunk.from_is_empty() {
            debug!(chunk = index, %action, "no lines to act on");
            return Activation::Inert;
        }

        debug!(
            chunk = index,
            from = self.from_pane,
            to = self.to_pane,
            %action,
            "gutter activated"
        );
        match action {
            Mode::Delete => {
                editor.delete_chunk(self.from_pane, &chunk);
                Activation::Deleted
            }
            Mode::Insert => Activation::CopyOffered(chunk),
            Mode::Replace => {
                editor.replace_chunk(self.from_pane, self.to_pane, &chunk);
                Activation::Replaced
            }
        }
    }

    /// Finish a copy offered by [`activate`](Self::activate)
    pub fn copy(&self, chunk: &ChangeRecord, placement: CopyPlacement, editor: &mut dyn ChunkEditor) {
        editor.copy_chunk(
            self.from_pane,
            self.to_pane,
            chunk,
            placement == CopyPlacement::Up,
        );
    }
}
