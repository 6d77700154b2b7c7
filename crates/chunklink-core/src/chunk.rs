//! Change records produced by a differ and consumed by gutters and link maps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a change between two panes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Lines present only in the "to" pane
    Insert,
    /// Lines present only in the "from" pane
    Delete,
    /// Lines differ on both sides
    Replace,
    /// Both sides of a three-way merge changed the same base lines
    Conflict,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 4] = [
        ChangeKind::Insert,
        ChangeKind::Delete,
        ChangeKind::Replace,
        ChangeKind::Conflict,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Delete => "delete",
            ChangeKind::Replace => "replace",
            ChangeKind::Conflict => "conflict",
        }
    }

    /// Kind implied by which sides of a change are empty
    pub fn from_ranges(from_empty: bool, to_empty: bool) -> Self {
        match (from_empty, to_empty) {
            (true, _) => ChangeKind::Insert,
            (false, true) => ChangeKind::Delete,
            (false, false) => ChangeKind::Replace,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One contiguous diff region between a "from" pane and a "to" pane.
///
/// Both line ranges are half-open. An empty range (`start == end`) marks the
/// position where the other side's lines would go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub from_start: usize,
    pub from_end: usize,
    pub to_start: usize,
    pub to_end: usize,
}

impl ChangeRecord {
    pub fn new(
        kind: ChangeKind,
        from_start: usize,
        from_end: usize,
        to_start: usize,
        to_end: usize,
    ) -> Self {
        Self {
            kind,
            from_start,
            from_end,
            to_start,
            to_end,
        }
    }

    pub fn from_is_empty(&self) -> bool {
        self.from_start == self.from_end
    }

    pub fn to_is_empty(&self) -> bool {
        self.to_start == self.to_end
    }

    /// Kind used for choosing an action.
    ///
    /// Conflicts act like the two-way change their ranges describe; the raw
    /// `kind` stays available for display.
    pub fn action_kind(&self) -> ChangeKind {
        match self.kind {
            ChangeKind::Conflict => ChangeKind::from_ranges(self.from_is_empty(), self.to_is_empty()),
            kind => kind,
        }
    }

    /// Same change seen from the other pane
    pub fn reversed(&self) -> Self {
        let kind = match self.kind {
            ChangeKind::Insert => ChangeKind::Delete,
            ChangeKind::Delete => ChangeKind::Insert,
            kind => kind,
        };
        Self {
            kind,
            from_start: self.to_start,
            from_end: self.to_end,
            to_start: self.from_start,
            to_end: self.from_end,
        }
    }

    /// Whether `line` of the "from" pane falls inside this change.
    /// An empty range contains only its anchor line.
    pub fn contains_from_line(&self, line: usize) -> bool {
        range_contains(self.from_start, self.from_end, line)
    }
}

pub(crate) fn range_contains(start: usize, end: usize, line: usize) -> bool {
    if start == end {
        line == start
    } else {
        start <= line && line < end
    }
}

/// A change record together with the index of the chunk it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedChange {
    pub index: usize,
    pub change: ChangeRecord,
}

/// Result of looking up the chunk at a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkLocation {
    /// Chunk containing the line, if any
    pub index: Option<usize>,
    /// Closest chunk strictly before the line
    pub prev: Option<usize>,
    /// Closest chunk strictly after the line
    pub next: Option<usize>,
}
