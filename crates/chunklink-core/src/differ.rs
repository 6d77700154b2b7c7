//! Line differ over two or three panes
//!
//! Produces chunks spanning every pane. Two panes give one change per hunk.
//! Three panes are read as left / base / right: the base→left and base→right
//! hunks are merged where they touch the same base lines, and a merged chunk
//! changed differently on both sides becomes a conflict.

use crate::chunk::{range_contains, ChangeKind, ChangeRecord, ChunkLocation, PairedChange};
use imara_diff::{Algorithm, Diff, InternedInput};
use std::ops::Range;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiffError {
    #[error("expected 2 or 3 panes, got {0}")]
    PaneCount(usize),
}

/// Source of chunks for gutters and link maps
pub trait DiffSource {
    /// Chunk containing `line` of `pane`, plus its neighbours
    fn locate_chunk(&self, pane: usize, line: usize) -> ChunkLocation;

    /// Chunk `index` as a change from `from` to `to`. Without `to`, any
    /// neighbouring pane that the chunk changes is used.
    fn get_chunk(&self, index: usize, from: usize, to: Option<usize>) -> Option<ChangeRecord>;

    /// Changes between `a` and `b` overlapping either visible window.
    /// `visible` is `[a_first, a_last, b_first, b_last]`, inclusive.
    fn pair_changes(&self, a: usize, b: usize, visible: [usize; 4]) -> Vec<PairedChange>;

    fn chunk_count(&self) -> usize;
}

/// Chunk spanning all panes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffChunk {
    /// Line range on each pane
    pub ranges: Vec<Range<usize>>,
    /// Kind between pane `i` and pane `i + 1`, `None` where they agree
    pub kinds: Vec<Option<ChangeKind>>,
}

impl DiffChunk {
    fn pair(&self, pair: usize) -> Option<ChangeRecord> {
        let kind = (*self.kinds.get(pair)?)?;
        let from = &self.ranges[pair];
        let to = &self.ranges[pair + 1];
        Some(ChangeRecord::new(kind, from.start, from.end, to.start, to.end))
    }

    fn touches(&self, pane: usize) -> bool {
        let left = pane.checked_sub(1).and_then(|p| self.kinds.get(p).copied().flatten());
        let right = self.kinds.get(pane).copied().flatten();
        left.is_some() || right.is_some()
    }
}

/// Differ over the lines of 2 or 3 texts
#[derive(Debug, Clone)]
pub struct LineDiffer {
    lines: Vec<Vec<String>>,
    chunks: Vec<DiffChunk>,
}

impl LineDiffer {
    pub fn new(texts: &[&str]) -> Result<Self, DiffError> {
        let lines: Vec<Vec<String>> = texts
            .iter()
            .map(|text| text.lines().map(str::to_string).collect())
            .collect();
        Self::from_lines(lines)
    }

    pub fn from_lines(lines: Vec<Vec<String>>) -> Result<Self, DiffError> {
        let chunks = match lines.len() {
            2 => two_way(&lines[0], &lines[1]),
            3 => three_way(&lines[0], &lines[1], &lines[2]),
            n => return Err(DiffError::PaneCount(n)),
        };
        debug!(panes = lines.len(), chunks = chunks.len(), "computed line diff");
        Ok(Self { lines, chunks })
    }

    pub fn pane_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self, pane: usize) -> &[String] {
        self.lines.get(pane).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn chunks(&self) -> &[DiffChunk] {
        &self.chunks
    }
}

impl DiffSource for LineDiffer {
    fn locate_chunk(&self, pane: usize, line: usize) -> ChunkLocation {
        let mut location = ChunkLocation::default();
        for (index, chunk) in self.chunks.iter().enumerate() {
            if !chunk.touches(pane) {
                continue;
            }
            let range = &chunk.ranges[pane];
            if location.index.is_none() && range_contains(range.start, range.end, line) {
                location.index = Some(index);
            } else if range.start > line {
                location.next = Some(index);
                break;
            } else if location.index.is_none() {
                location.prev = Some(index);
            }
        }
        location
    }

    fn get_chunk(&self, index: usize, from: usize, to: Option<usize>) -> Option<ChangeRecord> {
        let chunk = self.chunks.get(index)?;
        let to = match to {
            Some(to) => to,
            None => {
                let right = from + 1;
                if chunk.kinds.get(from).copied().flatten().is_some() {
                    right
                } else {
                    from.checked_sub(1)?
                }
            }
        };
        if from.abs_diff(to) != 1 {
            return None;
        }
        let record = chunk.pair(from.min(to))?;
        Some(if from < to { record } else { record.reversed() })
    }

    fn pair_changes(&self, a: usize, b: usize, visible: [usize; 4]) -> Vec<PairedChange> {
        (0..self.chunks.len())
            .filter_map(|index| {
                let change = self.get_chunk(index, a, Some(b))?;
                let a_visible = change.from_end >= visible[0] && change.from_start <= visible[1];
                let b_visible = change.to_end >= visible[2] && change.to_start <= visible[3];
                (a_visible || b_visible).then_some(PairedChange { index, change })
            })
            .collect()
    }

    fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

struct Hunk {
    before: Range<usize>,
    after: Range<usize>,
}

fn line_hunks(before: &[String], after: &[String]) -> Vec<Hunk> {
    let before_text = join_lines(before);
    let after_text = join_lines(after);
    let input = InternedInput::new(before_text.as_str(), after_text.as_str());
    let mut diff = Diff::compute(Algorithm::Histogram, &input);
    diff.postprocess_lines(&input);
    diff.hunks()
        .map(|hunk| Hunk {
            before: hunk.before.start as usize..hunk.before.end as usize,
            after: hunk.after.start as usize..hunk.after.end as usize,
        })
        .collect()
}

/// Every line newline-terminated, so a missing final newline is not a change
fn join_lines(lines: &[String]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

fn two_way(from: &[String], to: &[String]) -> Vec<DiffChunk> {
    line_hunks(from, to)
        .into_iter()
        .map(|hunk| DiffChunk {
            kinds: vec![Some(ChangeKind::from_ranges(
                hunk.before.is_empty(),
                hunk.after.is_empty(),
            ))],
            ranges: vec![hunk.before, hunk.after],
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn three_way(left: &[String], base: &[String], right: &[String]) -> Vec<DiffChunk> {
    let left_hunks = line_hunks(base, left);
    let right_hunks = line_hunks(base, right);

    let mut tagged: Vec<(Side, &Hunk)> = left_hunks
        .iter()
        .map(|h| (Side::Left, h))
        .chain(right_hunks.iter().map(|h| (Side::Right, h)))
        .collect();
    tagged.sort_by_key(|(side, h)| (h.before.start, h.before.end, *side == Side::Right));

    let mut chunks = Vec::new();
    let mut left_delta: isize = 0;
    let mut right_delta: isize = 0;
    let mut i = 0;
    while i < tagged.len() {
        let mut base_range = tagged[i].1.before.clone();
        let mut j = i + 1;
        while j < tagged.len() && tagged[j].1.before.start <= base_range.end {
            base_range.end = base_range.end.max(tagged[j].1.before.end);
            j += 1;
        }
        let group = &tagged[i..j];

        let left_range = side_range(group, Side::Left, &base_range, left_delta);
        let right_range = side_range(group, Side::Right, &base_range, right_delta);
        let left_changed = group.iter().any(|(s, _)| *s == Side::Left);
        let right_changed = group.iter().any(|(s, _)| *s == Side::Right);

        let conflict = left_changed
            && right_changed
            && left[left_range.clone()] != right[right_range.clone()];

        let left_kind = left_changed.then(|| {
            if conflict {
                ChangeKind::Conflict
            } else {
                ChangeKind::from_ranges(left_range.is_empty(), base_range.is_empty())
            }
        });
        let right_kind = right_changed.then(|| {
            if conflict {
                ChangeKind::Conflict
            } else {
                ChangeKind::from_ranges(base_range.is_empty(), right_range.is_empty())
            }
        });

        for (side, hunk) in group {
            let delta = hunk.after.len() as isize - hunk.before.len() as isize;
            match side {
                Side::Left => left_delta += delta,
                Side::Right => right_delta += delta,
            }
        }

        chunks.push(DiffChunk {
            ranges: vec![left_range, base_range, right_range],
            kinds: vec![left_kind, right_kind],
        });
        i = j;
    }
    chunks
}

/// Range on one side covering `base` for a merged group
fn side_range(
    group: &[(Side, &Hunk)],
    side: Side,
    base: &Range<usize>,
    delta: isize,
) -> Range<usize> {
    let mut hunks = group.iter().filter(|(s, _)| *s == side).map(|(_, h)| *h);
    let first = hunks.next();
    let last = hunks.last().or(first);
    match (first, last) {
        (Some(first), Some(last)) => {
            let start = first.after.start - (first.before.start - base.start);
            let end = last.after.end + (base.end - last.before.end);
            start..end
        }
        _ => {
            let start = (base.start as isize + delta) as usize;
            let end = (base.end as isize + delta) as usize;
            start..end
        }
    }
}
